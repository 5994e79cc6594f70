//! Rooms and what a client is doing in them
//!
//! `Room` is the coarse state used for routing; `Activity` is what the
//! coordinator actually stores, carrying the game handle while in Wordle.

use crate::wordle::GameHandle;

/// Coarse client state deciding how input is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    Lobby,
    Chat,
    Wordle,
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Room::Lobby => "Lobby",
            Room::Chat => "Chat",
            Room::Wordle => "Wordle",
        };
        f.write_str(name)
    }
}

/// Current activity of a client
///
/// A game handle exists exactly while the client is in Wordle.
#[derive(Debug, Default)]
pub enum Activity {
    /// In the Lobby
    #[default]
    Idle,
    /// In the Chat room
    Chatting,
    /// Playing a game
    Playing(GameHandle),
}

impl Activity {
    /// Room this activity belongs to
    pub fn room(&self) -> Room {
        match self {
            Activity::Idle => Room::Lobby,
            Activity::Chatting => Room::Chat,
            Activity::Playing(_) => Room::Wordle,
        }
    }

    /// The running game, if any
    pub fn game(&self) -> Option<&GameHandle> {
        match self {
            Activity::Playing(game) => Some(game),
            _ => None,
        }
    }
}
