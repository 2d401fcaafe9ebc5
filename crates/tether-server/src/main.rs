//! Tether Server - persistent memory for agents
//!
//! Serves key/value state, a full-text searchable event log, goal tracking
//! and a bounded context export over HTTP, backed by one SQLite file.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use tether_core::Storage;
use tether_server::{logging, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first (before logging init, so --help/--version work cleanly)
    let config = Config::parse();

    logging::init_logging(config.log_format);

    info!("Tether v{} starting...", env!("CARGO_PKG_VERSION"));

    if config.uses_default_key() {
        warn!("API_KEY is not set; using the built-in default secret");
    }

    let storage = Storage::new(config.db_path.clone()).context("failed to initialize storage")?;
    info!(
        path = %storage.path().display(),
        profile = %config.profile,
        "Storage initialized successfully"
    );

    let state = AppState::new(Arc::new(storage), Arc::new(config));
    tether_server::serve(state).await.context("server error")?;

    Ok(())
}
