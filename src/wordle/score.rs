//! Guess scoring
//!
//! Two passes over the guess. Exact matches are taken first and claim their
//! target position; every other letter then takes the leftmost unclaimed
//! target position holding the same letter. A target letter therefore backs
//! at most one Green or Yellow, however often the guess repeats it.

/// Per-letter verdict of a scored guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Letter not in the word (or all its occurrences already credited)
    Grey,
    /// Letter in the word at another position
    Yellow,
    /// Letter in the correct position
    Green,
}

/// A guess together with its verdicts, one per letter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredGuess {
    word: String,
    verdicts: Vec<Verdict>,
}

impl ScoredGuess {
    /// Score `guess` against `target`
    pub fn new(guess: &str, target: &str) -> Self {
        Self {
            word: guess.to_string(),
            verdicts: score(guess, target),
        }
    }

    /// A guess marked Green everywhere
    pub fn solved(word: &str) -> Self {
        Self {
            word: word.to_string(),
            verdicts: vec![Verdict::Green; word.chars().count()],
        }
    }

    /// The guessed word
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Letter/verdict pairs in position order
    pub fn letters(&self) -> impl Iterator<Item = (char, Verdict)> + '_ {
        self.word.chars().zip(self.verdicts.iter().copied())
    }
}

/// Score a guess against the target word
///
/// Both words are compared character by character; callers normalize case
/// beforehand. Positions past the end of the shorter word are Grey.
pub fn score(guess: &str, target: &str) -> Vec<Verdict> {
    let guess: Vec<char> = guess.chars().collect();
    let target: Vec<char> = target.chars().collect();

    let mut verdicts = vec![Verdict::Grey; guess.len()];
    let mut claimed = vec![false; target.len()];

    for (i, letter) in guess.iter().enumerate() {
        if target.get(i) == Some(letter) {
            verdicts[i] = Verdict::Green;
            claimed[i] = true;
        }
    }

    for (i, letter) in guess.iter().enumerate() {
        if verdicts[i] == Verdict::Green {
            continue;
        }
        let unclaimed = target
            .iter()
            .enumerate()
            .position(|(k, t)| t == letter && !claimed[k]);
        if let Some(k) = unclaimed {
            verdicts[i] = Verdict::Yellow;
            claimed[k] = true;
        }
    }

    verdicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use Verdict::{Green, Grey, Yellow};

    fn credits(guess: &str, target: &str, letter: char) -> usize {
        guess
            .chars()
            .zip(score(guess, target))
            .filter(|(c, v)| *c == letter && *v != Grey)
            .count()
    }

    #[test]
    fn test_crane_trace() {
        assert_eq!(
            score("TRACE", "CRANE"),
            vec![Grey, Green, Yellow, Yellow, Green]
        );
    }

    #[test]
    fn test_duplicate_letters_credited_once() {
        let verdicts = score("LOLLY", "ALLOY");
        assert_eq!(verdicts, vec![Yellow, Yellow, Green, Grey, Green]);

        for letter in "LOLLY".chars() {
            let in_target = "ALLOY".chars().filter(|c| *c == letter).count();
            assert!(credits("LOLLY", "ALLOY", letter) <= in_target);
        }
    }

    #[test]
    fn test_green_takes_priority_over_earlier_yellow() {
        // The E at position 4 is exact, so the leading E must not claim it.
        assert_eq!(score("EERIE", "THREE"), vec![Yellow, Grey, Green, Grey, Green]);
        assert_eq!(score("SPEED", "ABIDE"), vec![Grey, Grey, Yellow, Grey, Yellow]);
    }

    #[test]
    fn test_exact_guess_all_green() {
        for word in ["CRANE", "ALLOY", "EERIE", "MAMMA"] {
            assert!(score(word, word).iter().all(|v| *v == Green));
            assert!(ScoredGuess::new(word, word).letters().all(|(_, v)| v == Green));
        }
    }

    #[test]
    fn test_absent_letters_grey() {
        assert_eq!(score("FUZZY", "CRANE"), vec![Grey; 5]);
    }

    #[test]
    fn test_scored_guess_letters() {
        let scored = ScoredGuess::new("TRACE", "CRANE");
        let pairs: Vec<_> = scored.letters().collect();
        assert_eq!(pairs[0], ('T', Grey));
        assert_eq!(pairs[4], ('E', Green));
        assert_eq!(scored.word(), "TRACE");
        assert!(ScoredGuess::solved("SCION").letters().all(|(_, v)| v == Green));
    }
}
