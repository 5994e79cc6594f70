//! Wordle for one player
//!
//! - `score`: two-pass verdicts for a guess
//! - `words`: candidate word lists and their sources
//! - `game`: pure per-game state
//! - `session`: the task that runs one game against a guess channel

pub mod game;
pub mod score;
pub mod session;
pub mod words;

pub use game::{Game, GuessOutcome};
pub use score::{score, ScoredGuess, Verdict};
pub use session::GameHandle;
pub use words::{WordList, WordSource};

/// Letters per word
pub const WORD_LENGTH: usize = 5;

/// Scored guesses allowed per game
pub const MAX_ATTEMPTS: usize = 6;

/// Always accepted as a correct guess
pub const BYPASS_WORD: &str = "SCION";

/// Input that leaves a game or the Chat room
pub const LOBBY_COMMAND: &str = "/lobby";

/// Guesses that may queue up before the coordinator reports the game busy
pub const GUESS_BUFFER: usize = 8;
