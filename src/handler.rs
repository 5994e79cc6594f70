//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake, asking for a
//! display name, and shuttling lines between the socket and the BoardServer.
//! Every inbound text frame may carry several lines; every outbound string
//! becomes one text frame.

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::message::{GREETING, NAME_PROMPT};
use crate::server::ServerCommand;
use crate::types::ClientId;

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, asks for a name, registers the client
/// and runs until either side goes away.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    ws_sender.send(Message::Text(GREETING.into())).await?;
    let (name, pending) = read_name(&mut ws_sender, &mut ws_receiver).await?;

    let client_id = ClientId::new();
    info!("Client {} ('{}') connected from {}", client_id, name, peer_addr);

    // Channel for server -> client text
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<String>();

    // Register with BoardServer
    if cmd_tx
        .send(ServerCommand::Connect {
            client_id,
            name,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", client_id);
        return Err(AppError::ChannelSend);
    }

    // Lines that arrived in the same frame as the name
    for line in pending {
        cmd_tx
            .send(ServerCommand::Input {
                client_id,
                text: line,
            })
            .await
            .map_err(|_| AppError::ChannelSend)?;
    }

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (WebSocket -> ServerCommand)
    let mut read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    for line in text.lines() {
                        let cmd = ServerCommand::Input {
                            client_id,
                            text: line.to_string(),
                        };
                        if cmd_tx_read.send(cmd).await.is_err() {
                            debug!("Server closed, ending read task for {}", client_id);
                            return;
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(_) => {
                    // Binary, ping and pong frames carry no input
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Spawn write task (String -> WebSocket)
    let mut write_task = tokio::spawn(async move {
        while let Some(text) = msg_rx.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                debug!("WebSocket send failed, ending write task");
                break;
            }
        }
        debug!("Write task ended for client");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete, then stop the other
    tokio::select! {
        _ = &mut read_task => {
            debug!("Read task completed for {}", client_id);
            write_task.abort();
        }
        _ = &mut write_task => {
            debug!("Write task completed for {}", client_id);
            read_task.abort();
        }
    }

    // Send disconnect command
    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Prompt until the peer sends a non-blank line
///
/// Returns the trimmed name and any lines that followed it in the same frame.
async fn read_name<S, R>(sink: &mut S, stream: &mut R) -> Result<(String, Vec<String>), AppError>
where
    S: Sink<Message, Error = WsError> + Unpin,
    R: Stream<Item = Result<Message, WsError>> + Unpin,
{
    loop {
        sink.send(Message::Text(NAME_PROMPT.into())).await?;

        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    let mut lines = text.lines();
                    let name = lines.next().unwrap_or_default().trim();
                    if !name.is_empty() {
                        let pending = lines.map(str::to_string).collect();
                        return Ok((name.to_string(), pending));
                    }
                    break;
                }
                Some(Ok(Message::Close(_))) | None => return Err(AppError::ClosedBeforeName),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }
}
