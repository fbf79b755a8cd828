//! Gardenbook Server Binary
//!
//! Standalone server for the gardenbook records API.

use std::sync::Arc;

use gardenbook_core::ServerConfig;
use gardenbook_server::{serve, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load()?;
    let state = Arc::new(AppState::from_config(&config)?);

    serve(&config.bind_addr, state).await
}
