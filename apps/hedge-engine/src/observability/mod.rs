//! Observability module for metrics.
//!
//! Logging setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_market_data_request, record_monitor_cycle,
    record_rebalance_alert, update_hedge_exposure,
};
