//! Messages exchanged with the coordinator and the text sent to clients
//!
//! Game sessions report back through `GameEvent`; the user-facing strings
//! for the Lobby and the Chat room live here too so tests can match on them.

use colored::Colorize;

use crate::style;

/// Output of a running game, relayed by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Text to forward verbatim to the player
    Output(String),
    /// The game is over; the player goes back to the Lobby
    Finished,
}

/// First line a new connection sees
pub const GREETING: &str = "Welcome to the word board!\n";

/// Prompt repeated until a name is entered
pub const NAME_PROMPT: &str = "Please enter your name: ";

/// Lobby menu, sent on arrival and whenever a client returns to the Lobby
pub fn lobby_welcome() -> String {
    format!(
        "\nYou are in the Lobby. Type\n\
         * {} to enter the Chat\n\
         * {} to play Wordle\n\
         You can type {} anytime to come back.\n",
        "chat".italic(),
        "wordle".italic(),
        "/lobby".italic(),
    )
}

/// Chat line from a member
pub fn chat_line(name: &str, text: &str) -> String {
    format!("{name}: {text}\n")
}

/// Notice for a client entering the Chat room
pub fn chat_joined(name: &str) -> String {
    style::notice(&format!("{name} has joined the chat!"))
}

/// Notice for a client going back to the Lobby from Chat
pub fn chat_left(name: &str) -> String {
    style::notice(&format!("{name} has left the chat!"))
}

/// Notice for a client leaving the board
pub fn disconnected(name: &str) -> String {
    style::notice(&format!("{name} disconnected!"))
}

/// Sent when a game is requested while the server is shutting down
pub const GAMES_CLOSED: &str = "Wordle is not available right now.\n";

/// Sent when a guess arrives while the previous ones are still queued
pub const GUESS_BUSY: &str = "Still working on your last guess, try again.\n";
