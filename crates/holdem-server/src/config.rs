//! Server configuration with environment overrides.

use std::net::SocketAddr;
use std::time::Duration;

/// Environment variables recognized by [`ServerConfig::from_env`].
const ENV_WS_ADDR: &str = "HOLDEM_WS_ADDR";
const ENV_HTTP_ADDR: &str = "HOLDEM_HTTP_ADDR";
const ENV_SWEEP_SECS: &str = "HOLDEM_SWEEP_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub ws_addr: SocketAddr,
    /// Address the read-only HTTP API binds to.
    pub http_addr: SocketAddr,
    /// Interval between dead-connection sweeps.
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ws_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            sweep_interval: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `HOLDEM_WS_ADDR`, `HOLDEM_HTTP_ADDR`, and
    /// `HOLDEM_SWEEP_SECS` where set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(ENV_WS_ADDR) {
            config.ws_addr = value.parse().map_err(|_| ConfigError::Invalid {
                key: ENV_WS_ADDR,
                value,
            })?;
        }
        if let Ok(value) = std::env::var(ENV_HTTP_ADDR) {
            config.http_addr = value.parse().map_err(|_| ConfigError::Invalid {
                key: ENV_HTTP_ADDR,
                value,
            })?;
        }
        if let Ok(value) = std::env::var(ENV_SWEEP_SECS) {
            let secs: u64 = value.parse().map_err(|_| ConfigError::Invalid {
                key: ENV_SWEEP_SECS,
                value,
            })?;
            config.sweep_interval = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
