//! # Scrapforge Sim
//!
//! Headless driver for the charged scrap launcher.
//!
//! Loads a run description (default `scrapforge.toml`, or the path given as
//! the first argument), replays its button script against the launcher at a
//! fixed tick rate and prints the resulting report as JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{SimConfig, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("scrapforge=info".parse()?))
        .init();

    info!("Scrapforge sim starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let config = SimConfig::load_from(&path)?;

    let report = app::run(&config);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
