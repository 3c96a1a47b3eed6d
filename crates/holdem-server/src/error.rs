//! Unified error type for the server binary and its layers.

use holdem_engine::TableError;
use holdem_protocol::ProtocolError;

use crate::config::ConfigError;

/// Top-level error that wraps the lower layers.
///
/// Table errors mostly never surface here: per-player rejections are turned
/// into `ActionRejected` events instead of tearing down the connection.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_convert_transparently() {
        let err: ServerError =
            ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, ServerError::Protocol(_)));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn table_errors_convert_transparently() {
        let err: ServerError = TableError::NoBettingRound.into();
        assert!(matches!(err, ServerError::Table(_)));
    }
}
