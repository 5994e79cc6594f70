//! Word lists and where they come from
//!
//! A `WordList` is the normalized candidate set for one game: uppercase,
//! alphabetic, fixed length, sorted and deduplicated so membership checks
//! are a binary search.

use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use crate::error::WordSourceError;

/// English word list used when nothing else is configured
pub const DEFAULT_WORDS_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/master/words_alpha.txt";

/// Sorted, deduplicated list of candidate words of one length
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Build a list from raw words, keeping only alphabetic words of `length`
    pub fn from_words<I, S>(words: I, length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| w.len() == length && w.bytes().all(|b| b.is_ascii_alphabetic()))
            .collect();
        words.sort_unstable();
        words.dedup();
        Self { words }
    }

    /// Parse a newline separated list (`\n` or `\r\n`)
    pub fn parse(text: &str, length: usize) -> Self {
        Self::from_words(text.lines(), length)
    }

    /// Check membership of an already uppercased word
    pub fn contains(&self, word: &str) -> bool {
        self.words
            .binary_search_by(|w| w.as_str().cmp(word))
            .is_ok()
    }

    /// Pick a word uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }

    /// Number of candidate words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if there are no candidate words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Where a game gets its candidate words from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WordSource {
    /// Plain-text list downloaded over HTTP(S)
    Http { url: String },
    /// Plain-text list on local disk
    File { path: PathBuf },
    /// Fixed in-memory list
    Inline { words: Vec<String> },
}

impl Default for WordSource {
    fn default() -> Self {
        Self::Http {
            url: DEFAULT_WORDS_URL.to_string(),
        }
    }
}

impl WordSource {
    /// Shorthand for an in-memory source
    pub fn inline<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Inline {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Fetch all words of `length`
    ///
    /// Fails with `WordSourceError::Empty` when nothing usable is left after
    /// normalization.
    pub async fn fetch(&self, length: usize) -> Result<WordList, WordSourceError> {
        let list = match self {
            Self::Http { url } => {
                let body = reqwest::get(url).await?.error_for_status()?.text().await?;
                WordList::parse(&body, length)
            }
            Self::File { path } => {
                let body = tokio::fs::read_to_string(path).await?;
                WordList::parse(&body, length)
            }
            Self::Inline { words } => WordList::from_words(words, length),
        };

        if list.is_empty() {
            return Err(WordSourceError::Empty(length));
        }

        debug!("Fetched {} candidate words", list.len());
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_list_normalizes() {
        let list = WordList::parse("crane\r\nSlate\nabc\ntoolong\ncrane\nab-cd\n", 5);
        assert_eq!(list.len(), 2);
        assert!(list.contains("CRANE"));
        assert!(list.contains("SLATE"));
        assert!(!list.contains("crane"));
        assert!(!list.contains("AB-CD"));
    }

    #[test]
    fn test_word_list_choose() {
        let list = WordList::from_words(["alloy"], 5);
        let mut rng = rand::thread_rng();
        assert_eq!(list.choose(&mut rng), Some("ALLOY"));
        assert_eq!(WordList::default().choose(&mut rng), None);
    }

    #[tokio::test]
    async fn test_inline_source_fetch() {
        let source = WordSource::inline(["crane", "trace", "cranes"]);
        let list = source.fetch(5).await.unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_source_fails() {
        let source = WordSource::inline(["cat", "dog"]);
        assert!(matches!(source.fetch(5).await, Err(WordSourceError::Empty(5))));
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let source = WordSource::File {
            path: PathBuf::from("/nonexistent/wordboard/words.txt"),
        };
        assert!(matches!(source.fetch(5).await, Err(WordSourceError::Io(_))));
    }

    #[test]
    fn test_source_deserialize() {
        let json = r#"{"kind": "file", "path": "words.txt"}"#;
        let source: WordSource = serde_json::from_str(json).unwrap();
        assert_eq!(
            source,
            WordSource::File {
                path: PathBuf::from("words.txt")
            }
        );
    }
}
