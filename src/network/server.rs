//! WebSocket Game Server
//!
//! Accepts connections, assigns each a connection id, decodes frames and
//! forwards them to the world task. Outbound messages flow back through a
//! per-connection queue drained by a writer task.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ServerConfig;
use crate::game::state::PlayerId;
use crate::network::hub::WorldHandle;
use crate::network::protocol::{ClientMessage, ProtocolError, ServerMessage};

/// Game server errors.
#[derive(Debug, thiserror::Error)]
pub enum GameServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// The game server.
pub struct GameServer {
    /// Server configuration.
    config: ServerConfig,
    /// World task.
    world: WorldHandle,
    /// Next connection id.
    next_connection: AtomicU64,
    /// Live connection count.
    connections: Arc<AtomicUsize>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl GameServer {
    /// Create a new game server.
    pub fn new(config: ServerConfig, world: WorldHandle) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            world,
            next_connection: AtomicU64::new(1),
            connections: Arc::new(AtomicUsize::new(0)),
            shutdown_tx,
        }
    }

    /// Bind the configured address and serve until shutdown.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), GameServerError> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        info!("Game server listening on {}", listener.local_addr()?);
        self.serve(listener).await
    }

    /// Serve an already bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), GameServerError> {
        let stats_handle = tokio::spawn(Self::run_stats_loop(
            self.world.clone(),
            self.config.stats_interval,
        ));

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            if self.connections.load(Ordering::SeqCst) >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        stats_handle.abort();
        Ok(())
    }

    /// Spawn the task for a new connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let id = PlayerId::new(self.next_connection.fetch_add(1, Ordering::SeqCst));
        let world = self.world.clone();
        let connections = self.connections.clone();
        let queue = self.config.outbound_queue;
        let shutdown_rx = self.shutdown_tx.subscribe();

        connections.fetch_add(1, Ordering::SeqCst);
        info!("New connection {} from {}", id, addr);

        tokio::spawn(async move {
            if let Err(e) = Self::serve_connection(stream, id, &world, queue, shutdown_rx).await {
                error!("Connection {} ({}) failed: {}", id, addr, e);
            }

            // A session that never registered is simply unknown to the world
            world.disconnect(id).await;
            connections.fetch_sub(1, Ordering::SeqCst);
            info!("Connection {} closed", id);
        });
    }

    /// Pump one WebSocket until it closes or the server shuts down.
    async fn serve_connection(
        stream: TcpStream,
        id: PlayerId,
        world: &WorldHandle,
        queue: usize,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), GameServerError> {
        let ws_stream = accept_async(stream).await?;
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(queue);

        world.connect(id, msg_tx).await;

        // Writer task ends when the world drops this session's queue
        let sender_task = tokio::spawn(async move {
            while let Some(msg) = msg_rx.recv().await {
                let text = match msg.to_json() {
                    Ok(t) => t,
                    Err(e) => {
                        error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            let _ = ws_sender.close().await;
        });

        loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match ClientMessage::from_json(&text) {
                                Ok(message) => world.message(id, message).await,
                                Err(e) => {
                                    debug!("Invalid message from {}: {}", id, e);
                                    world.malformed(id).await;
                                }
                            }
                        }
                        Some(Ok(Message::Binary(_))) => {
                            debug!("{} from {}", ProtocolError::UnsupportedFrame, id);
                            world.malformed(id).await;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            debug!("Client {} disconnected", id);
                            break;
                        }
                        Some(Err(e)) => {
                            sender_task.abort();
                            return Err(e.into());
                        }
                        // Ping/pong handled by tungstenite
                        Some(Ok(_)) => {}
                    }
                }
                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }

        sender_task.abort();
        Ok(())
    }

    /// Log counters periodically.
    async fn run_stats_loop(world: WorldHandle, period: std::time::Duration) {
        let mut interval = interval(period);
        // First tick fires immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            match world.stats().await {
                Some(stats) => info!("World stats: {}", stats),
                None => break,
            }
        }
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active connection count.
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Handle to the world task.
    pub fn world(&self) -> &WorldHandle {
        &self.world
    }
}
