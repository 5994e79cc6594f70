//! Wordle game state
//!
//! Pure per-game state: no channels, no I/O. The session task feeds it one
//! line at a time and turns the outcome into text.

use super::score::ScoredGuess;
use super::words::WordList;
use super::{BYPASS_WORD, LOBBY_COMMAND, MAX_ATTEMPTS};

/// Result of feeding one line of input to a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess was right; the game is over
    Won,
    /// The player asked to go back to the Lobby; the game is over
    Aborted,
    /// Not a word from the list; no attempt was used
    Rejected,
    /// Scored, attempts remain
    Scored(ScoredGuess),
    /// Scored, and it was the last attempt
    Lost(ScoredGuess),
}

impl GuessOutcome {
    /// Check if the game ends with this outcome
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Won | Self::Aborted | Self::Lost(_))
    }
}

/// One game of Wordle
#[derive(Debug)]
pub struct Game {
    target: String,
    words: WordList,
    history: Vec<ScoredGuess>,
}

impl Game {
    /// Start a game with a known target word (uppercase)
    pub fn new(words: WordList, target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            words,
            history: Vec::with_capacity(MAX_ATTEMPTS),
        }
    }

    /// The word to guess
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Guesses made so far, winning row included
    pub fn history(&self) -> &[ScoredGuess] {
        &self.history
    }

    /// Number of scored attempts used
    pub fn attempts(&self) -> usize {
        self.history.len()
    }

    /// One-based number of the attempt being asked for
    pub fn next_attempt(&self) -> usize {
        self.history.len() + 1
    }

    /// Feed one line of player input
    pub fn guess(&mut self, input: &str) -> GuessOutcome {
        let input = input.trim();
        if input == LOBBY_COMMAND {
            return GuessOutcome::Aborted;
        }

        let guess = input.to_ascii_uppercase();
        if guess == BYPASS_WORD || guess == self.target {
            self.history.push(ScoredGuess::solved(&guess));
            return GuessOutcome::Won;
        }

        if !self.words.contains(&guess) {
            return GuessOutcome::Rejected;
        }

        let scored = ScoredGuess::new(&guess, &self.target);
        self.history.push(scored.clone());

        if self.history.len() >= MAX_ATTEMPTS {
            GuessOutcome::Lost(scored)
        } else {
            GuessOutcome::Scored(scored)
        }
    }
}
