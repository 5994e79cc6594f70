//! Server configuration
//!
//! Defaults, then an optional JSON file named by `WORDBOARD_CONFIG`, then
//! environment overrides, then the bind address from the command line.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;
use crate::wordle::WordSource;

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV: &str = "WORDBOARD_CONFIG";
/// Overrides `addr`
pub const ADDR_ENV: &str = "WORDBOARD_ADDR";
/// Overrides the word source with an HTTP list
pub const WORDS_URL_ENV: &str = "WORDBOARD_WORDS_URL";
/// Overrides the word source with a local file (wins over the URL)
pub const WORDS_FILE_ENV: &str = "WORDBOARD_WORDS_FILE";

/// Default server address
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Channel buffer size for server commands
const DEFAULT_COMMAND_BUFFER: usize = 256;

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the WebSocket listener binds to
    pub addr: String,
    /// Where games get their words
    pub word_source: WordSource,
    /// Capacity of the coordinator's command channel
    pub command_buffer: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            word_source: WordSource::default(),
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl Settings {
    /// Load settings from the process environment and arguments
    pub fn load() -> Result<Self, AppError> {
        let mut settings = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        settings.apply_overrides(|key| env::var(key).ok());
        if let Some(addr) = env::args().nth(1) {
            settings.addr = addr;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Read a JSON settings file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        debug!("Reading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse JSON settings; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `WORDBOARD_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ADDR_ENV) {
            self.addr = addr;
        }
        if let Some(url) = lookup(WORDS_URL_ENV) {
            self.word_source = WordSource::Http { url };
        }
        if let Some(path) = lookup(WORDS_FILE_ENV) {
            self.word_source = WordSource::File {
                path: PathBuf::from(path),
            };
        }
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<(), AppError> {
        if self.command_buffer == 0 {
            return Err(AppError::Config("command_buffer must be positive".to_string()));
        }
        if self.addr.trim().is_empty() {
            return Err(AppError::Config("addr must not be empty".to_string()));
        }
        Ok(())
    }
}
