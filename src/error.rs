//! Error types for the board server
//!
//! Defines connection-level errors, channel send errors and word source
//! errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// All of these end one connection (or, for configuration, the startup);
/// none of them reach the coordinator.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON deserialization error (configuration file)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - coordinator gone)
    #[error("Channel send error")]
    ChannelSend,

    /// The peer hung up before giving a display name
    #[error("Connection closed before a name was entered")]
    ClosedBeforeName,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Message send errors
///
/// Occurs when attempting to send through a closed or saturated channel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The bounded channel has no free slot
    #[error("Channel full")]
    ChannelFull,
}

/// Word list retrieval errors
///
/// Always recoverable: the game that asked for the list ends early.
#[derive(Debug, Error)]
pub enum WordSourceError {
    /// Download failed or returned an error status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Word file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source had no usable words of the requested length
    #[error("No words of length {0}")]
    Empty(usize),
}
