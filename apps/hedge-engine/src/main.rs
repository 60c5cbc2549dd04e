//! Hedge Engine Binary
//!
//! Monitors an iron condor position and logs hedge rebalance
//! recommendations.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hedge-engine -- [CONFIG] [POSITION]
//! ```
//!
//! # Environment Variables
//!
//! - `HEDGE_ENGINE_CONFIG`: config file when no argument is given (default: config.yaml)
//! - `HEDGE_ENGINE_POSITION`: position file when no argument is given (default: position.yaml)
//! - `FRED_API_KEY`: FRED key, usually referenced from the config file
//! - `RUST_LOG`: overrides the configured log level

use std::sync::Arc;

use anyhow::Context;
use hedge_engine::application::services::HedgeMonitorService;
use hedge_engine::config::{Config, load_config};
use hedge_engine::domain::option_position::IronCondorPosition;
use hedge_engine::infrastructure::{BinanceOptionsAdapter, FredAdapter, TokioScheduler};
use hedge_engine::observability::{MetricsConfig, init_metrics};
use hedge_engine::telemetry::init_tracing;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Default position file.
const DEFAULT_POSITION_PATH: &str = "position.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .or_else(|| std::env::var("HEDGE_ENGINE_CONFIG").ok());
    let position_path = args
        .next()
        .or_else(|| std::env::var("HEDGE_ENGINE_POSITION").ok())
        .unwrap_or_else(|| DEFAULT_POSITION_PATH.to_string());

    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.observability.logging)?;

    if config.observability.metrics.enabled {
        init_metrics(&MetricsConfig::with_addr(
            config.observability.metrics.listen_addr,
        ))?;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = config_path.as_deref().unwrap_or("config.yaml"),
        position = %position_path,
        "Starting hedge engine"
    );
    log_config(&config);

    let position = load_position(&position_path)?;

    let chain_port = Arc::new(BinanceOptionsAdapter::new(&config.market_data)?);
    let rate_port = Arc::new(FredAdapter::new(&config.market_data)?);
    let scheduler = Arc::new(TokioScheduler);

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let service = HedgeMonitorService::new(
        config.monitor.clone(),
        position,
        chain_port,
        rate_port,
        scheduler,
        shutdown,
    );
    let summary = service.run().await;

    tracing::info!(
        cycles = summary.cycles,
        alerts = summary.alerts,
        failures = summary.failures,
        hedge_qty = summary.final_state.current_hedge_qty,
        "Hedge engine stopped"
    );
    Ok(())
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    tracing::info!(
        interval_secs = config.monitor.interval_seconds,
        threshold = config.monitor.delta_change_threshold,
        max_cycles = ?config.monitor.max_cycles,
        rf_series = %config.monitor.rf_series_id,
        metrics_enabled = config.observability.metrics.enabled,
        "Configuration loaded"
    );

    if let Err(e) = config.market_data.fred.require_api_key() {
        tracing::warn!(error = %e, "Risk-free rate disabled; cycle records will carry a note");
    }
}

/// Read an iron condor position from YAML.
fn load_position(path: &str) -> anyhow::Result<IronCondorPosition> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read position file {path}"))?;
    let position: IronCondorPosition = serde_yaml_bw::from_str(&contents)
        .with_context(|| format!("invalid position file {path}"))?;

    tracing::info!(
        underlying = %position.underlying(),
        expiry = %position.expiry(),
        hedge_symbol = %position.hedge().symbol,
        "Position loaded"
    );
    Ok(position)
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown.cancel();
}
