//! Hedge monitor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::pricing::default_true;
use crate::domain::hedging::MonitorPolicy;

/// Hedge monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between cycles.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// Relative net delta change that triggers a rebalance.
    #[serde(default = "default_delta_change_threshold")]
    pub delta_change_threshold: f64,
    /// FRED series used for the risk-free rate.
    #[serde(default = "default_rf_series_id", alias = "fred_series_id")]
    pub rf_series_id: String,
    /// Days of rate history requested each cycle.
    #[serde(default = "default_rf_lookback_days")]
    pub rf_lookback_days: u32,
    /// Stop after this many cycles; runs until cancelled when unset.
    #[serde(default)]
    pub max_cycles: Option<u64>,
    /// Track the hedge as if every recommendation was filled.
    #[serde(default = "default_true")]
    pub assume_rebalance_executed: bool,
    /// Upper bound for each market data call in a cycle.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Capacity of the cycle record broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            delta_change_threshold: default_delta_change_threshold(),
            rf_series_id: default_rf_series_id(),
            rf_lookback_days: default_rf_lookback_days(),
            max_cycles: None,
            assume_rebalance_executed: true,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl MonitorConfig {
    /// Decision parameters for the state machine.
    #[must_use]
    pub const fn policy(&self) -> MonitorPolicy {
        MonitorPolicy {
            delta_change_threshold: self.delta_change_threshold,
            max_cycles: self.max_cycles,
            assume_rebalance_executed: self.assume_rebalance_executed,
        }
    }

    /// Sleep between cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Timeout applied to each market data call.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

const fn default_interval_seconds() -> u64 {
    3600
}

const fn default_delta_change_threshold() -> f64 {
    0.20
}

fn default_rf_series_id() -> String {
    "DGS3MO".to_string()
}

const fn default_rf_lookback_days() -> u32 {
    14
}

const fn default_fetch_timeout_secs() -> u64 {
    30
}

const fn default_event_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(3600));
        assert_eq!(config.rf_series_id, "DGS3MO");
        assert_eq!(config.rf_lookback_days, 14);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));

        let policy = config.policy();
        assert!((policy.delta_change_threshold - 0.20).abs() < f64::EPSILON);
        assert!(policy.max_cycles.is_none());
        assert!(policy.assume_rebalance_executed);
    }
}
