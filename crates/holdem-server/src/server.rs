//! `HoldemServer` and the WebSocket accept loop.
//!
//! Ties the layers together: transport → protocol → engine. One `Shared`
//! behind one `Mutex` holds the registry, the event fan-out, and the
//! connection-to-room memberships, so every client signal runs to completion
//! before the next one is processed.

use std::collections::HashMap;
use std::sync::Arc;

use holdem_engine::{RoomRegistry, SyncService};
use holdem_protocol::{ConnectionId, RoomId};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::handler::handle_connection;
use crate::ServerError;

/// Everything mutated by client signals, behind a single lock.
pub(crate) struct Shared {
    pub(crate) registry: RoomRegistry,
    pub(crate) sync: SyncService,
    pub(crate) memberships: HashMap<ConnectionId, RoomId>,
}

/// Shared server state passed to each connection handler task and to the
/// HTTP router. Wrapped in `Arc` so it can be cheaply cloned across tasks.
pub struct ServerState {
    pub(crate) shared: Mutex<Shared>,
}

impl ServerState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            shared: Mutex::new(Shared {
                registry: RoomRegistry::new(),
                sync: SyncService::new(),
                memberships: HashMap::new(),
            }),
        })
    }
}

/// A running hold'em server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct HoldemServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl HoldemServer {
    /// Binds the WebSocket listener.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.ws_addr).await?;
        tracing::info!(addr = %config.ws_addr, "WebSocket listener bound");
        Ok(Self {
            listener,
            state: ServerState::new(),
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle to the shared state, for the HTTP router and the sweeper.
    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Runs the accept loop. Each connection gets its own handler task.
    /// Runs until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("hold'em server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
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
