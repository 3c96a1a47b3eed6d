use holdem_server::{http, sweep, HoldemServer, ServerConfig, ServerError};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let server = HoldemServer::bind(&config).await?;
    let state = server.state();

    let http_listener = TcpListener::bind(config.http_addr).await?;
    tokio::spawn(http::serve(http_listener, state.clone()));
    tokio::spawn(sweep::run_sweeper(state, config.sweep_interval));

    server.run().await
}
