//! BoardServer Actor implementation
//!
//! The central actor that owns every connected client and its room.
//! Connection handlers and game sessions talk to it only through
//! `ServerCommand`s; it processes one command at a time and never waits on
//! anything but the next command.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::SendError;
use crate::message::{self, GameEvent};
use crate::room::{Activity, Room};
use crate::style;
use crate::types::{ClientId, GameId};
use crate::wordle::{GameHandle, WordSource, LOBBY_COMMAND};

/// Commands sent to the BoardServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected and named
    Connect {
        client_id: ClientId,
        name: String,
        sender: mpsc::UnboundedSender<String>,
    },
    /// Client disconnected
    Disconnect {
        client_id: ClientId,
    },
    /// One line of input from a client
    Input {
        client_id: ClientId,
        text: String,
    },
    /// Output or completion of a client's game
    Game {
        client_id: ClientId,
        game_id: GameId,
        event: GameEvent,
    },
}

/// The main BoardServer actor
///
/// Only this actor reads or writes the client table, so no locks are needed.
pub struct BoardServer {
    /// All connected clients: ClientId -> Client
    clients: HashMap<ClientId, Client>,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
    /// Handed to game sessions; weak so the loop still ends when all
    /// connections are gone
    handle: mpsc::WeakSender<ServerCommand>,
    /// Where games fetch their word lists
    words: Arc<WordSource>,
    /// Counter for game ids
    next_game: u64,
}

impl BoardServer {
    /// Create a new BoardServer reading from `receiver`
    ///
    /// `handle` must belong to the same channel; games report back through it.
    pub fn new(
        receiver: mpsc::Receiver<ServerCommand>,
        handle: mpsc::WeakSender<ServerCommand>,
        words: WordSource,
    ) -> Self {
        Self {
            clients: HashMap::new(),
            receiver,
            handle,
            words: Arc::new(words),
            next_game: 0,
        }
    }

    /// Create a server together with the sender of its command channel
    pub fn channel(buffer: usize, words: WordSource) -> (Self, mpsc::Sender<ServerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(buffer);
        let server = Self::new(cmd_rx, cmd_tx.downgrade(), words);
        (server, cmd_tx)
    }

    /// Run the BoardServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("BoardServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("BoardServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect {
                client_id,
                name,
                sender,
            } => {
                self.handle_connect(client_id, name, sender);
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
            ServerCommand::Input { client_id, text } => {
                self.handle_input(client_id, text);
            }
            ServerCommand::Game {
                client_id,
                game_id,
                event,
            } => {
                self.handle_game_event(client_id, game_id, event);
            }
        }
    }

    /// Handle new client connection
    fn handle_connect(
        &mut self,
        client_id: ClientId,
        name: String,
        sender: mpsc::UnboundedSender<String>,
    ) {
        info!("Client {} connected as '{}'", client_id, name);
        let client = Client::new(client_id, name, sender);
        let _ = client.send(message::lobby_welcome());
        self.clients.insert(client_id, client);
        debug!("Total clients: {}", self.clients.len());
    }

    /// Handle client disconnection
    fn handle_disconnect(&mut self, client_id: ClientId) {
        let Some(client) = self.clients.remove(&client_id) else {
            debug!("Disconnect for unknown client {}", client_id);
            return;
        };

        info!("Client {} ('{}') disconnected", client_id, client.name());
        self.broadcast(&message::disconnected(client.name()));

        if let Activity::Playing(game) = client.activity {
            debug!("Aborting {} of client {}", game.id(), client_id);
            game.abort();
        }

        debug!("Total clients: {}", self.clients.len());
    }

    /// Handle one line of input, routed by the client's room
    fn handle_input(&mut self, client_id: ClientId, text: String) {
        let Some(client) = self.clients.get(&client_id) else {
            debug!("Input from unknown client {}", client_id);
            return;
        };

        match client.room() {
            Room::Lobby => self.lobby_input(client_id, &text),
            Room::Chat => self.chat_input(client_id, text),
            Room::Wordle => self.wordle_input(client_id, text),
        }
    }

    /// Handle Lobby input: room selection or the menu again
    fn lobby_input(&mut self, client_id: ClientId, text: &str) {
        match text.trim() {
            "chat" => {
                let Some(client) = self.clients.get_mut(&client_id) else {
                    return;
                };
                client.activity = Activity::Chatting;
                let _ = client.send(style::CLEAR_SCREEN);
                let name = client.name().to_string();
                info!("Client {} moved to {}", client_id, client.room());

                self.broadcast(&message::chat_joined(&name));
            }
            "wordle" => self.start_game(client_id),
            _ => self.send_lobby_welcome(client_id),
        }
    }

    /// Handle Chat input: leave on `/lobby`, otherwise broadcast
    fn chat_input(&mut self, client_id: ClientId, text: String) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };
        let name = client.name().to_string();

        if text.trim() == LOBBY_COMMAND {
            client.activity = Activity::Idle;
            info!("Client {} moved to {}", client_id, client.room());

            self.broadcast(&message::chat_left(&name));
            self.send_lobby_welcome(client_id);
        } else {
            self.broadcast(&message::chat_line(&name, &text));
        }
    }

    /// Handle Wordle input: hand it to the running game
    fn wordle_input(&mut self, client_id: ClientId, text: String) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };
        let Some(game) = client.activity.game() else {
            return;
        };

        match game.forward(text) {
            Ok(()) => {}
            Err(SendError::ChannelFull) => {
                let _ = client.send(message::GUESS_BUSY);
            }
            Err(SendError::ChannelClosed) => {
                // The game task is gone without reporting back
                warn!("{} of client {} ended unexpectedly", game.id(), client_id);
                client.activity = Activity::Idle;
                info!("Client {} moved to {}", client_id, client.room());
                self.send_lobby_welcome(client_id);
            }
        }
    }

    /// Move a Lobby client into a new game
    fn start_game(&mut self, client_id: ClientId) {
        let Some(events) = self.handle.upgrade() else {
            warn!("Cannot start a game while shutting down");
            if let Some(client) = self.clients.get(&client_id) {
                let _ = client.send(message::GAMES_CLOSED);
            }
            return;
        };
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        let game_id = GameId(self.next_game);
        self.next_game += 1;

        let game = GameHandle::spawn(client_id, game_id, Arc::clone(&self.words), events);
        client.activity = Activity::Playing(game);
        info!("Client {} moved to {} ({})", client_id, client.room(), game_id);
    }

    /// Handle output from a game session
    fn handle_game_event(&mut self, client_id: ClientId, game_id: GameId, event: GameEvent) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            debug!("{} output for unknown client {}", game_id, client_id);
            return;
        };
        if client.activity.game().map(GameHandle::id) != Some(game_id) {
            debug!("Stale {} output for client {}", game_id, client_id);
            return;
        }

        match event {
            GameEvent::Output(text) => {
                let _ = client.send(text);
            }
            GameEvent::Finished => {
                client.activity = Activity::Idle;
                info!("Client {} finished {}, moved to {}", client_id, game_id, client.room());
                self.send_lobby_welcome(client_id);
            }
        }
    }

    /// Send text to every client currently in the Chat room
    fn broadcast(&self, text: &str) {
        for client in self.clients.values() {
            if client.room() == Room::Chat && client.send(text).is_err() {
                debug!("Broadcast to {} dropped", client.id);
            }
        }
    }

    /// Send the Lobby menu to one client
    fn send_lobby_welcome(&self, client_id: ClientId) {
        if let Some(client) = self.clients.get(&client_id) {
            let _ = client.send(message::lobby_welcome());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tokio::net::TcpListener;
    use tokio::time::{sleep, timeout};

    use crate::wordle::GUESS_BUFFER;

    fn server(words: &[&str]) -> (BoardServer, mpsc::Sender<ServerCommand>) {
        BoardServer::channel(64, WordSource::inline(words.iter().copied()))
    }

    fn connect(server: &mut BoardServer, name: &str) -> (ClientId, mpsc::UnboundedReceiver<String>) {
        let client_id = ClientId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        server.handle_command(ServerCommand::Connect {
            client_id,
            name: name.to_string(),
            sender: tx,
        });
        (client_id, rx)
    }

    fn input(server: &mut BoardServer, client_id: ClientId, text: &str) {
        server.handle_command(ServerCommand::Input {
            client_id,
            text: text.to_string(),
        });
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        let mut out = String::new();
        while let Ok(text) = rx.try_recv() {
            out.push_str(&text);
        }
        out
    }

    fn room(server: &BoardServer, client_id: ClientId) -> Option<Room> {
        server.clients.get(&client_id).map(Client::room)
    }

    /// Read from a client until `needle` shows up
    async fn recv_until(rx: &mut mpsc::UnboundedReceiver<String>, needle: &str) -> String {
        let mut out = String::new();
        while !out.contains(needle) {
            let text = timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out")
                .expect("channel closed");
            out.push_str(&text);
        }
        out
    }

    #[test]
    fn test_connect_lands_in_lobby() {
        let (mut server, _tx) = server(&[]);
        let (alice, mut rx) = connect(&mut server, "Alice");

        assert_eq!(room(&server, alice), Some(Room::Lobby));
        assert!(drain(&mut rx).contains("You are in the Lobby"));
    }

    #[test]
    fn test_lobby_unknown_input_resends_welcome() {
        let (mut server, _tx) = server(&[]);
        let (alice, mut rx) = connect(&mut server, "Alice");
        drain(&mut rx);

        input(&mut server, alice, "dance");
        assert_eq!(room(&server, alice), Some(Room::Lobby));
        assert!(drain(&mut rx).contains("You are in the Lobby"));
    }

    #[test]
    fn test_chat_broadcast_reaches_only_chat_members() {
        let (mut server, _tx) = server(&[]);
        let (alice, mut alice_rx) = connect(&mut server, "Alice");
        let (bob, mut bob_rx) = connect(&mut server, "Bob");
        let (carol, mut carol_rx) = connect(&mut server, "Carol");

        input(&mut server, alice, "chat");
        input(&mut server, bob, " chat ");
        assert_eq!(room(&server, alice), Some(Room::Chat));
        assert_eq!(room(&server, bob), Some(Room::Chat));
        assert_eq!(room(&server, carol), Some(Room::Lobby));

        let alice_out = drain(&mut alice_rx);
        assert!(alice_out.contains(style::CLEAR_SCREEN));
        assert!(alice_out.contains("Bob has joined the chat!"));
        drain(&mut bob_rx);
        drain(&mut carol_rx);

        input(&mut server, alice, "hello there");
        assert!(drain(&mut bob_rx).contains("Alice: hello there\n"));
        assert!(drain(&mut alice_rx).contains("Alice: hello there\n"));
        assert!(!drain(&mut carol_rx).contains("hello there"));
    }

    #[test]
    fn test_chat_lobby_command_leaves() {
        let (mut server, _tx) = server(&[]);
        let (alice, mut alice_rx) = connect(&mut server, "Alice");
        let (bob, mut bob_rx) = connect(&mut server, "Bob");
        input(&mut server, alice, "chat");
        input(&mut server, bob, "chat");
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        input(&mut server, bob, "/lobby");
        assert_eq!(room(&server, bob), Some(Room::Lobby));
        assert!(drain(&mut alice_rx).contains("Bob has left the chat!"));

        let bob_out = drain(&mut bob_rx);
        assert!(bob_out.contains("You are in the Lobby"));
        assert!(!bob_out.contains("has left the chat"));

        // Bob no longer receives chat
        input(&mut server, alice, "anyone?");
        assert!(!drain(&mut bob_rx).contains("anyone?"));
    }

    #[test]
    fn test_disconnect_removes_client() {
        let (mut server, _tx) = server(&[]);
        let (alice, mut alice_rx) = connect(&mut server, "Alice");
        let (bob, bob_rx) = connect(&mut server, "Bob");
        input(&mut server, alice, "chat");
        input(&mut server, bob, "chat");
        drain(&mut alice_rx);

        drop(bob_rx);
        server.handle_command(ServerCommand::Disconnect { client_id: bob });

        assert!(!server.clients.contains_key(&bob));
        assert_eq!(room(&server, alice), Some(Room::Chat));
        assert!(drain(&mut alice_rx).contains("Bob disconnected!"));

        input(&mut server, alice, "still here");
        assert!(drain(&mut alice_rx).contains("Alice: still here"));
        assert_eq!(server.clients.len(), 1);
    }

    #[test]
    fn test_unknown_client_is_ignored() {
        let (mut server, _tx) = server(&[]);
        let (alice, _rx) = connect(&mut server, "Alice");
        let ghost = ClientId::new();

        input(&mut server, ghost, "chat");
        server.handle_command(ServerCommand::Disconnect { client_id: ghost });
        server.handle_command(ServerCommand::Game {
            client_id: ghost,
            game_id: GameId(0),
            event: GameEvent::Finished,
        });
        server.handle_command(ServerCommand::Disconnect { client_id: alice });
        server.handle_command(ServerCommand::Disconnect { client_id: alice });

        assert!(server.clients.is_empty());
    }

    #[test]
    fn test_stale_game_event_is_ignored() {
        let (mut server, _tx) = server(&[]);
        let (alice, mut rx) = connect(&mut server, "Alice");
        input(&mut server, alice, "chat");
        drain(&mut rx);

        server.handle_command(ServerCommand::Game {
            client_id: alice,
            game_id: GameId(3),
            event: GameEvent::Finished,
        });
        assert_eq!(room(&server, alice), Some(Room::Chat));
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_wordle_input_is_not_interpreted() {
        let (mut server, _tx) = server(&["crane"]);
        let (alice, _alice_rx) = connect(&mut server, "Alice");
        let (bob, mut bob_rx) = connect(&mut server, "Bob");
        input(&mut server, bob, "chat");
        drain(&mut bob_rx);

        input(&mut server, alice, "wordle");
        assert_eq!(room(&server, alice), Some(Room::Wordle));

        // "chat" is a guess here, not a room change
        input(&mut server, alice, "chat");
        assert_eq!(room(&server, alice), Some(Room::Wordle));
        assert!(!drain(&mut bob_rx).contains("Alice"));
    }

    #[tokio::test]
    async fn test_disconnect_mid_game() {
        let (mut server, _tx) = server(&["crane"]);
        let (alice, _alice_rx) = connect(&mut server, "Alice");
        let (bob, _bob_rx) = connect(&mut server, "Bob");
        input(&mut server, alice, "wordle");
        input(&mut server, bob, "chat");

        server.handle_command(ServerCommand::Disconnect { client_id: alice });
        assert!(!server.clients.contains_key(&alice));
        assert_eq!(room(&server, bob), Some(Room::Chat));
    }

    #[tokio::test]
    async fn test_game_win_returns_to_lobby() {
        let (server, tx) = server(&["crane"]);
        tokio::spawn(server.run());

        let alice = ClientId::new();
        let (out_tx, mut rx) = mpsc::unbounded_channel();
        tx.send(ServerCommand::Connect {
            client_id: alice,
            name: "Alice".to_string(),
            sender: out_tx,
        })
        .await
        .unwrap();
        recv_until(&mut rx, "You are in the Lobby").await;

        let send = |text: &str| ServerCommand::Input {
            client_id: alice,
            text: text.to_string(),
        };

        tx.send(send("wordle")).await.unwrap();
        recv_until(&mut rx, "Enter your guess (1/6)").await;

        tx.send(send("dance")).await.unwrap();
        let out = recv_until(&mut rx, "Enter your guess (1/6)").await;
        assert!(out.contains("Please guess a valid 5 letter word"));

        tx.send(send("CRANE")).await.unwrap();
        let out = recv_until(&mut rx, "You are in the Lobby").await;
        assert!(out.contains("You guessed right!"));

        // Back in the Lobby, so "chat" changes rooms again
        tx.send(send("chat")).await.unwrap();
        recv_until(&mut rx, "Alice has joined the chat!").await;
    }

    #[tokio::test]
    async fn test_game_abort_hides_target() {
        let (server, tx) = server(&["crane"]);
        tokio::spawn(server.run());

        let alice = ClientId::new();
        let (out_tx, mut rx) = mpsc::unbounded_channel();
        tx.send(ServerCommand::Connect {
            client_id: alice,
            name: "Alice".to_string(),
            sender: out_tx,
        })
        .await
        .unwrap();

        for text in ["wordle", "/lobby"] {
            tx.send(ServerCommand::Input {
                client_id: alice,
                text: text.to_string(),
            })
            .await
            .unwrap();
        }

        let out = recv_until(&mut rx, "Started wordle").await;
        let out = out + &recv_until(&mut rx, "You are in the Lobby").await;
        assert!(!out.contains("correct word"));
        assert!(!out.contains(" C "));
    }

    #[tokio::test]
    async fn test_word_source_failure_returns_to_lobby() {
        let (server, tx) = server(&["cat"]);
        tokio::spawn(server.run());

        let alice = ClientId::new();
        let (out_tx, mut rx) = mpsc::unbounded_channel();
        tx.send(ServerCommand::Connect {
            client_id: alice,
            name: "Alice".to_string(),
            sender: out_tx,
        })
        .await
        .unwrap();
        recv_until(&mut rx, "You are in the Lobby").await;

        tx.send(ServerCommand::Input {
            client_id: alice,
            text: "wordle".to_string(),
        })
        .await
        .unwrap();

        let out = recv_until(&mut rx, "You are in the Lobby").await;
        assert!(out.contains("Couldn't get word list"));
    }

    /// Wait until exactly `count` strong senders of the command channel remain
    async fn wait_for_senders(server: &BoardServer, count: usize) {
        timeout(Duration::from_secs(5), async {
            while server.handle.strong_count() != count {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("game task still holds its sender");
    }

    #[tokio::test]
    async fn test_disconnect_stops_game_task() {
        let (mut server, _tx) = server(&["crane"]);
        let (alice, _rx) = connect(&mut server, "Alice");

        input(&mut server, alice, "wordle");
        assert_eq!(server.handle.strong_count(), 2);

        server.handle_command(ServerCommand::Disconnect { client_id: alice });
        wait_for_senders(&server, 1).await;
    }

    #[tokio::test]
    async fn test_full_guess_buffer_reports_busy() {
        // Accepts connections but never answers, so the word fetch hangs
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/words.txt", listener.local_addr().unwrap());
        let (mut server, _tx) = BoardServer::channel(64, WordSource::Http { url });
        let (alice, mut rx) = connect(&mut server, "Alice");
        input(&mut server, alice, "wordle");
        drain(&mut rx);

        for _ in 0..GUESS_BUFFER {
            input(&mut server, alice, "crane");
        }
        assert!(!drain(&mut rx).contains(message::GUESS_BUSY));

        input(&mut server, alice, "crane");
        assert!(drain(&mut rx).contains(message::GUESS_BUSY));
        assert_eq!(room(&server, alice), Some(Room::Wordle));
    }

    #[tokio::test]
    async fn test_input_to_ended_game_returns_to_lobby() {
        // No five-letter words, so the game ends on its own right away
        let (mut server, _tx) = server(&["cat"]);
        let (alice, mut rx) = connect(&mut server, "Alice");
        input(&mut server, alice, "wordle");

        // Its Finished event stays queued; only the guess channel is gone
        wait_for_senders(&server, 1).await;
        drain(&mut rx);

        input(&mut server, alice, "crane");
        assert_eq!(room(&server, alice), Some(Room::Lobby));
        assert!(drain(&mut rx).contains("You are in the Lobby"));
    }

    #[test]
    fn test_wordle_unavailable_when_shutting_down() {
        let (mut server, tx) = server(&["crane"]);
        drop(tx);
        let (alice, mut rx) = connect(&mut server, "Alice");
        drain(&mut rx);

        input(&mut server, alice, "wordle");
        assert_eq!(room(&server, alice), Some(Room::Lobby));
        assert!(drain(&mut rx).contains(message::GAMES_CLOSED));
    }
}
