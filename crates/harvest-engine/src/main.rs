//! Farm engine binary for the Harvest simulation.
//!
//! Wires configuration, logging, the environment aggregator, and the farm
//! engine together, then runs the daily tick loop until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    `harvest-config.yaml` in the working directory
//! 2. Initialize structured logging (tracing)
//! 3. Build the environment source (HTTP, or offline when configured)
//! 4. Create the aggregator and the farm engine
//! 5. Run the tick loop until Ctrl-C
//! 6. Log the result

mod error;
mod tick_log;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use harvest_core::config::LoggingConfig;
use harvest_core::{FarmEngine, HarvestConfig, LogFormat, RunOptions, run_farm};
use harvest_environment::{
    EnvironmentAggregator, EnvironmentSource, HttpEnvironmentSource, OfflineSource,
};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::tick_log::TickLogger;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "harvest-config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        farm_location = config.game.farm_location,
        tick_interval_ms = config.game.tick_interval_ms,
        days_per_season = config.game.days_per_season,
        plot_count = config.game.plot_count,
        offline = config.environment.offline,
        "harvest-engine starting"
    );

    // 3-5. Build the source and run.
    if config.environment.offline {
        run(&config, OfflineSource).await?;
    } else {
        let source = HttpEnvironmentSource::new(&config.sources, config.environment.fetch_timeout())
            .map_err(|e| EngineError::HttpClient {
                message: format!("{e}"),
            })?;
        run(&config, source).await?;
    }

    info!("harvest-engine shutdown complete");
    Ok(())
}

/// Load configuration, falling back to defaults when the file is absent.
///
/// Environment overrides and validation apply either way.
fn load_config(path: &std::path::Path) -> Result<HarvestConfig, EngineError> {
    if path.exists() {
        Ok(HarvestConfig::from_file(path)?)
    } else {
        Ok(HarvestConfig::parse("{}")?)
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_err| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_err| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = match logging.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| EngineError::Logging {
        message: format!("{e}"),
    })
}

/// Build the engine over `source` and drive it until Ctrl-C.
async fn run<S: EnvironmentSource>(config: &HarvestConfig, source: S) -> Result<(), EngineError> {
    let aggregator = Arc::new(EnvironmentAggregator::new(source, &config.environment));
    let engine = FarmEngine::new(config, aggregator)?;
    let farm = engine.farm_location();
    info!(
        farm = farm.id,
        region = farm.region,
        lat = farm.coordinates.lat,
        lon = farm.coordinates.lon,
        "farm initialized"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, stopping"),
            Err(e) => warn!(error = %e, "failed to listen for Ctrl-C, stopping"),
        }
        if shutdown_tx.send(true).is_err() {
            warn!("tick loop already stopped");
        }
    });

    let options = RunOptions {
        interval: Duration::from_millis(config.game.tick_interval_ms),
        max_ticks: None,
    };
    let mut logger = TickLogger::new();
    let result = run_farm(&engine, options, shutdown_rx, &mut logger).await?;

    let state = engine.state().await;
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        day = state.day,
        budget = state.budget,
        score = state.score,
        "tick loop finished"
    );
    Ok(())
}
