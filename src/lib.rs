//! Word Board Server Library
//!
//! A multi-user text board over WebSocket. Clients pick a name and move
//! between a Lobby, a broadcast Chat room and a single-player Wordle game.
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `BoardServer` is the central actor owning every client and its room
//! - Each connection has a `handler` task forwarding lines to the server
//! - Each Wordle game runs in its own task and reports back as commands
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use wordboard::{handle_connection, BoardServer, WordSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (server, cmd_tx) = BoardServer::channel(256, WordSource::default());
//!
//!     tokio::spawn(server.run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod room;
pub mod server;
pub mod style;
pub mod types;
pub mod wordle;

// Re-export main types for convenience
pub use client::Client;
pub use config::Settings;
pub use error::{AppError, SendError, WordSourceError};
pub use handler::handle_connection;
pub use message::GameEvent;
pub use room::{Activity, Room};
pub use server::{BoardServer, ServerCommand};
pub use types::{ClientId, GameId};
pub use wordle::{Verdict, WordList, WordSource};
