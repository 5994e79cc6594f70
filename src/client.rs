//! Client struct definition
//!
//! Represents a connected client with their state and communication channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::room::{Activity, Room};
use crate::types::ClientId;

/// Connected client information
///
/// Holds all state related to a connected client including their
/// unique ID, display name, outbound text channel and current activity.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Display name, fixed at connect time
    name: String,
    /// Coordinator → client text channel
    sender: mpsc::UnboundedSender<String>,
    /// What the client is doing right now
    pub activity: Activity,
}

impl Client {
    /// Create a new client in the Lobby
    pub fn new(id: ClientId, name: String, sender: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id,
            name,
            sender,
            activity: Activity::Idle,
        }
    }

    /// Send text to this client
    ///
    /// Never waits. Returns an error if the channel is closed (client disconnected).
    pub fn send(&self, text: impl Into<String>) -> Result<(), SendError> {
        self.sender
            .send(text.into())
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Get the display name for this client
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the room the client is in
    pub fn room(&self) -> Room {
        self.activity.room()
    }
}
