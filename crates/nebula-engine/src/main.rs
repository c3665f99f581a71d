//! # Nebula
//!
//! Runs the starfield and burst animation headless, driven by `nebula.toml`
//! or the config path given as the first argument.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use nebula_engine::{app, config::EngineConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("nebula_engine=info".parse()?)
                .add_directive("nebula_kernel=info".parse()?),
        )
        .init();

    info!("Project Nebula starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.validate().context("invalid configuration")?;

    let summary = app::run(config).context("headless run failed")?;
    if let Some(path) = &summary.snapshot {
        info!("Snapshot: {}", path.display());
    }

    info!("Project Nebula shutdown complete");
    Ok(())
}
