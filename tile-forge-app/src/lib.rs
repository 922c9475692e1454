//! Tile Forge application library.
//!
//! Configuration, logging, the solve driver, output and benchmark mode for
//! the `tile-forge` binary.

pub mod benchmark;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod setup;
pub mod visualization;

pub use config::{AppConfig, Settings};
pub use error::AppError;

use clap::Parser;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tile_rules::loader::load_from_file;

/// Resolves settings, loads the rule file and runs the selected mode.
///
/// Ctrl-C raises the shutdown signal; the running solve stops before its
/// next step.
pub async fn run_app(cli: AppConfig) -> Result<(), AppError> {
    let settings = Settings::load(&cli)?;
    logging::init_logger(&settings);

    info!("Tile Forge starting");
    debug!("Resolved settings: {settings:?}");

    info!("Loading rules from {}", cli.rule_file.display());
    let mut book = load_from_file(&cli.rule_file)?;
    setup::execution::apply_overrides(&mut book, &settings);
    info!(
        "Rules loaded: {} cards, {}x{} board, {} seed tiles",
        book.catalog.len(),
        book.rules.width,
        book.rules.height,
        book.rules.seed_tiles.len()
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, stopping after the current step");
            signal.store(true, Ordering::Relaxed);
        }
    });

    tokio::task::spawn_blocking(move || {
        if settings.is_benchmark() {
            benchmark::run_benchmark_mode(&settings, &book, &shutdown).map(|_| ())
        } else {
            setup::execution::run_standard_mode(&settings, &book, &shutdown).map(|_| ())
        }
    })
    .await
    .map_err(|e| anyhow::anyhow!("Solver task failed: {e}"))??;

    info!("Tile Forge finished");
    Ok(())
}

/// Blocking entry point: parses the command line and drives [`run_app`] on
/// a Tokio runtime.
pub fn main() -> anyhow::Result<()> {
    let cli = AppConfig::parse();
    tokio::runtime::Runtime::new()?.block_on(run_app(cli))?;
    Ok(())
}
