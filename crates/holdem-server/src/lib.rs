//! Multi-table Texas hold'em server.
//!
//! Clients speak JSON-encoded [`ClientEvent`](holdem_protocol::ClientEvent)s
//! over WebSocket; the server answers with per-viewer redacted
//! [`ServerEvent`](holdem_protocol::ServerEvent)s. A separate HTTP listener
//! exposes read-only room listings for diagnostics.

pub mod config;
mod error;
mod handler;
pub mod http;
pub mod server;
pub mod sweep;

pub use config::{ConfigError, ServerConfig};
pub use error::ServerError;
pub use server::{HoldemServer, ServerState};
