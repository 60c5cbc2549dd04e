//! Prometheus metrics for the hedge engine.
//!
//! Counters and gauges for monitor cycles, rebalance alerts and market data
//! requests. Recording is a no-op until [`init_metrics`] installs a recorder.
//!
//! # Example
//!
//! ```ignore
//! use hedge_engine::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_monitor_cycle("ETH", "ok");
//! ```

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            // 10ms to 30s
            latency_buckets: vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Hedge Monitor Metrics
// ============================================================================

/// Record a completed monitor cycle.
///
/// # Arguments
///
/// * `underlying` - Underlying symbol (e.g., "ETH")
/// * `outcome` - "ok" or "failed"
pub fn record_monitor_cycle(underlying: &str, outcome: &str) {
    counter!(
        "hedge_monitor_cycles_total",
        "underlying" => underlying.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    if outcome == "failed" {
        counter!(
            "hedge_monitor_failures_total",
            "underlying" => underlying.to_string()
        )
        .increment(1);
    }
}

/// Record a rebalance alert.
pub fn record_rebalance_alert(underlying: &str, direction: &str) {
    counter!(
        "hedge_monitor_alerts_total",
        "underlying" => underlying.to_string(),
        "direction" => direction.to_string()
    )
    .increment(1);
}

/// Publish the latest net option delta and tracked hedge quantity.
pub fn update_hedge_exposure(underlying: &str, net_option_delta: f64, hedge_quantity: f64) {
    gauge!("hedge_net_option_delta", "underlying" => underlying.to_string()).set(net_option_delta);
    gauge!("hedge_quantity", "underlying" => underlying.to_string()).set(hedge_quantity);
}

// ============================================================================
// Market Data Metrics
// ============================================================================

/// Record a market data request.
///
/// # Arguments
///
/// * `provider` - Provider name (e.g., "binance_options", "fred")
/// * `status` - "ok", "error" or "timeout"
/// * `latency_seconds` - Request duration in seconds
pub fn record_market_data_request(provider: &str, status: &str, latency_seconds: f64) {
    counter!(
        "market_data_requests_total",
        "provider" => provider.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "market_data_latency_seconds",
        "provider" => provider.to_string()
    )
    .record(latency_seconds);
}
