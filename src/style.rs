//! Terminal styling for outbound text
//!
//! Everything the board sends is plain text for a terminal on the other
//! end; this module adds the italics, screen clearing and coloured tiles.

use colored::Colorize;

use crate::wordle::score::{ScoredGuess, Verdict};

/// Clear the screen and move the cursor to the bottom
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[50B";

/// Italic notice line
pub fn notice(text: &str) -> String {
    format!("{}\n", text.italic())
}

/// One letter tile coloured by its verdict
pub fn tile(letter: char, verdict: Verdict) -> String {
    let face = format!(" {letter} ");
    let tile = match verdict {
        Verdict::Green => face.as_str().black().bold().on_green(),
        Verdict::Yellow => face.as_str().black().bold().on_yellow(),
        Verdict::Grey => face.as_str().white().bold().on_black(),
    };
    tile.to_string()
}

/// A full row of tiles, newline terminated
pub fn row(guess: &ScoredGuess) -> String {
    let mut out: String = guess.letters().map(|(c, v)| tile(c, v)).collect();
    out.push_str(" \n");
    out
}
