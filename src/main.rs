//! Word Board Server - Entry Point
//!
//! Loads settings, starts the BoardServer actor and accepts WebSocket
//! connections.

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wordboard::{handle_connection, BoardServer, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=wordboard=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wordboard=info")),
        )
        .init();

    // Tiles and notices go to remote terminals, not our stdout
    colored::control::set_override(true);

    let settings = Settings::load()?;

    // Start TCP listener
    let listener = TcpListener::bind(&settings.addr).await?;
    info!("Word Board Server listening on {}", settings.addr);

    // Create BoardServer actor channel and start
    let (server, cmd_tx) = BoardServer::channel(settings.command_buffer, settings.word_source);
    tokio::spawn(server.run());

    info!("BoardServer actor started");

    // Connection accept loop
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
