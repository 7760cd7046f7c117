//! # Gatehouse server
//!
//! Main entry point for the Gatehouse server.

#![forbid(unsafe_code)]

use gate_bootstrap::BootstrapError;
use gate_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Gatehouse starting...");

    if let Err(err) = start().await {
        match err.downcast_ref::<BootstrapError>() {
            Some(e) => tracing::error!(
                operation = e.operation(),
                orphan_client = e.left_orphan_client(),
                "Could not bootstrap root client: {}",
                e
            ),
            None => tracing::error!("Server failed: {:#}", err),
        }
        std::process::exit(1);
    }
}

async fn start() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    Server::new(config).await?.run().await
}
