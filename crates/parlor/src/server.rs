//! `ParlorServer` builder and accept loop.
//!
//! This is the entry point for running a parlor server. It binds a TCP
//! listener, upgrades each connection to a WebSocket, and spawns a
//! handler task per connection. All room state lives behind the shared
//! [`RoomRegistry`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parlor_game::GameConfig;
use parlor_protocol::{ConnectionId, JsonCodec};
use parlor_room::RoomRegistry;
use tokio::net::TcpListener;

use crate::ParlorError;
use crate::handler::handle_connection;

/// Connection id sequence, process-wide. Ids are never reused, so a
/// stale id can address at most a gone connection.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry synchronizes its own maps internally; handlers call it
/// through `&self`.
pub(crate) struct ServerState {
    pub(crate) registry: RoomRegistry,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a parlor server.
///
/// # Example
///
/// ```rust,ignore
/// let server = ParlorServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    game_config: GameConfig,
}

impl ParlorServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            game_config: GameConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the game configuration applied to every room.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<ParlorServer, ParlorError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: RoomRegistry::new(self.game_config),
            codec: JsonCodec,
        });

        Ok(ParlorServer { listener, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl ParlorServer {
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections, upgrades them to WebSockets, and
    /// spawns a handler task for each. Runs until the process is
    /// terminated.
    pub async fn run(self) -> Result<(), ParlorError> {
        tracing::info!(addr = %self.listener.local_addr()?, "parlor server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let conn = ConnectionId(
                        NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
                    );
                    tracing::debug!(%conn, %peer, "connection accepted");

                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, conn, state).await {
                            tracing::debug!(
                                %conn,
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
