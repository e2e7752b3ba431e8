//! # Telegraph
//!
//! Runs one headless encounter and logs the outcome.
//!
//! Usage: `telegraph [config-path] [--write-default-config]`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::Result;
use telegraph_engine::config::{env_filter, CONFIG_FILE};
use telegraph_engine::{run, HarnessConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, reload};

/// Main entry point.
fn main() -> Result<()> {
    let mut config_path = PathBuf::from(CONFIG_FILE);
    let mut write_default = false;
    for arg in std::env::args().skip(1) {
        if arg == "--write-default-config" {
            write_default = true;
        } else {
            config_path = PathBuf::from(arg);
        }
    }

    // Initialize tracing; the config's own filter is applied once it is read
    let (filter, filter_handle) = reload::Layer::new(env_filter(None)?);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    if write_default {
        HarnessConfig::write_default(&config_path)?;
        return Ok(());
    }

    let config = HarnessConfig::load_from(&config_path);
    if config.log_filter.is_some() {
        filter_handle.reload(config.env_filter()?)?;
    }

    info!("Project Telegraph starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let summary = run(&config)?;
    info!(
        "Encounter finished after {} ticks ({}ms): {} swings, {} hits, {} monster moves, {} strikes landed",
        summary.ticks,
        summary.elapsed_ms,
        summary.swings,
        summary.player_hits,
        summary.moves_started,
        summary.monster_strikes
    );
    info!(
        "Monster health {}, player health {}",
        summary.monster_health, summary.player_health
    );

    Ok(())
}
