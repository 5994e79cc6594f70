//! Wordle session task
//!
//! One task per game. It owns the receiving end of the player's guess
//! channel and reports everything back to the coordinator as
//! `ServerCommand::Game`; it never touches client state itself.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::game::{Game, GuessOutcome};
use super::score::ScoredGuess;
use super::words::WordSource;
use super::{GUESS_BUFFER, MAX_ATTEMPTS, WORD_LENGTH};
use crate::error::SendError;
use crate::message::GameEvent;
use crate::server::ServerCommand;
use crate::style;
use crate::types::{ClientId, GameId};

/// Coordinator-side handle of a running game
///
/// Holds the only sender of the guess channel. Dropping or aborting the
/// handle ends the game task.
#[derive(Debug)]
pub struct GameHandle {
    id: GameId,
    guesses: mpsc::Sender<String>,
    task: JoinHandle<()>,
}

impl GameHandle {
    /// Spawn a game for `client_id` reporting through `events`
    pub fn spawn(
        client_id: ClientId,
        id: GameId,
        source: Arc<WordSource>,
        events: mpsc::Sender<ServerCommand>,
    ) -> Self {
        let (guess_tx, guess_rx) = mpsc::channel(GUESS_BUFFER);
        let session = Session {
            client_id,
            game_id: id,
            guesses: guess_rx,
            events,
            source,
        };
        let task = tokio::spawn(session.run());

        Self {
            id,
            guesses: guess_tx,
            task,
        }
    }

    /// Get the id this game reports under
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Hand one line of input to the game without waiting
    pub fn forward(&self, guess: String) -> Result<(), SendError> {
        self.guesses.try_send(guess).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }

    /// Stop the game task wherever it is suspended
    pub fn abort(self) {
        self.task.abort();
    }
}

struct Session {
    client_id: ClientId,
    game_id: GameId,
    guesses: mpsc::Receiver<String>,
    events: mpsc::Sender<ServerCommand>,
    source: Arc<WordSource>,
}

impl Session {
    async fn run(mut self) {
        info!("Client {} started {}", self.client_id, self.game_id);

        match self.play().await {
            Ok(()) => debug!("{} for {} ended", self.game_id, self.client_id),
            Err(e) => debug!("{} for {} dropped: {}", self.game_id, self.client_id, e),
        }
    }

    async fn play(&mut self) -> Result<(), SendError> {
        self.say("\nStarted wordle... ").await?;

        let words = match self.source.fetch(WORD_LENGTH).await {
            Ok(words) => words,
            Err(e) => {
                warn!("Word list unavailable for {}: {}", self.game_id, e);
                self.say("Couldn't get word list. Going back to lobby.\n").await?;
                return self.emit(GameEvent::Finished).await;
            }
        };
        let target = words.choose(&mut rand::thread_rng()).map(str::to_string);
        let Some(target) = target else {
            return self.emit(GameEvent::Finished).await;
        };
        let mut game = Game::new(words, target);

        loop {
            self.say(format!(
                "Enter your guess ({}/{}): ",
                game.next_attempt(),
                MAX_ATTEMPTS
            ))
            .await?;

            let Some(line) = self.guesses.recv().await else {
                debug!("Guess channel closed for {}", self.game_id);
                return Ok(());
            };

            let outcome = game.guess(&line);
            match &outcome {
                GuessOutcome::Rejected => {
                    self.say(format!(
                        "Please guess a valid {WORD_LENGTH} letter word from the wordlist\n"
                    ))
                    .await?;
                }
                GuessOutcome::Scored(scored) => {
                    debug!("{} scored {}", self.game_id, scored.word());
                    self.say(style::row(scored)).await?;
                }
                GuessOutcome::Won => {
                    info!("Client {} won {}", self.client_id, self.game_id);
                    let matrix: String = game.history().iter().map(style::row).collect();
                    self.say("You guessed right!\n").await?;
                    self.say(format!("Your wordle matrix is: \n{matrix}")).await?;
                }
                GuessOutcome::Aborted => {
                    debug!("Client {} left {}", self.client_id, self.game_id);
                }
                GuessOutcome::Lost(scored) => {
                    info!(
                        "Client {} lost {} after {} attempts",
                        self.client_id,
                        self.game_id,
                        game.attempts()
                    );
                    self.say(style::row(scored)).await?;
                    self.say("Better luck next time!\n").await?;
                    self.say(format!(
                        "The correct word is : {}",
                        style::row(&ScoredGuess::solved(game.target()))
                    ))
                    .await?;
                }
            }

            if outcome.is_final() {
                return self.emit(GameEvent::Finished).await;
            }
        }
    }

    async fn say(&self, text: impl Into<String>) -> Result<(), SendError> {
        self.emit(GameEvent::Output(text.into())).await
    }

    async fn emit(&self, event: GameEvent) -> Result<(), SendError> {
        self.events
            .send(ServerCommand::Game {
                client_id: self.client_id,
                game_id: self.game_id,
                event,
            })
            .await
            .map_err(|_| SendError::ChannelClosed)
    }
}
