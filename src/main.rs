mod bot;
mod commands;
mod config;
mod fault;
mod logging;
mod platform;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration; a missing token stops us before any network activity
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logging
    logging::init(&config.logging)?;

    info!("Configuration loaded successfully");
    info!("  Log file: {}", config.logging.file.display());
    info!(
        "  Timeouts: connect {}s, request {}s",
        config.network.connect_timeout_secs, config.network.request_timeout_secs
    );

    info!("Starting bot...");
    if let Err(e) = bot::run(&config).await {
        error!("Bot stopped due to error: {:#}", e);
        return Err(e);
    }

    info!("Bot stopped by user");
    Ok(())
}
