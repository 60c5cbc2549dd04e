//! Configuration module for the hedge engine.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates it before any component is built.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hedge_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("interval: {}s", config.monitor.interval_seconds);
//! ```

mod market_data;
mod monitor;
mod observability;
mod pricing;
mod selection;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::use_cases::RateLookup;

pub use market_data::{BinanceOptionsConfig, FredConfig, MarketDataConfig, ParadexConfig};
pub use monitor::MonitorConfig;
pub use observability::{LoggingConfig, MetricsExporterConfig, ObservabilityConfig};
pub use pricing::PricingConfig;
pub use selection::SelectionConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Hedge monitor loop.
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Pricing and payoff defaults.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Condor strike selection targets.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Market data providers.
    #[serde(default)]
    pub market_data: MarketDataConfig,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Risk-free rate lookup for the one-shot use cases.
    #[must_use]
    pub fn rate_lookup(&self) -> RateLookup {
        RateLookup {
            series_id: self.monitor.rf_series_id.clone(),
            lookback_days: self.monitor.rf_lookback_days,
            default_rate: self.pricing.default_risk_free_rate,
        }
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let monitor = &config.monitor;
    if monitor.interval_seconds == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.interval_seconds must be positive".to_string(),
        ));
    }

    if !(monitor.delta_change_threshold.is_finite() && monitor.delta_change_threshold > 0.0) {
        return Err(ConfigError::ValidationError(
            "monitor.delta_change_threshold must be positive".to_string(),
        ));
    }

    if monitor.rf_series_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "monitor.rf_series_id must not be empty".to_string(),
        ));
    }

    if monitor.max_cycles == Some(0) {
        return Err(ConfigError::ValidationError(
            "monitor.max_cycles must be at least 1 when set".to_string(),
        ));
    }

    if monitor.fetch_timeout_secs == 0 || monitor.event_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.fetch_timeout_secs and monitor.event_buffer must be positive".to_string(),
        ));
    }

    let pricing = &config.pricing;
    if !(pricing.fallback_volatility.is_finite() && pricing.fallback_volatility > 0.0) {
        return Err(ConfigError::ValidationError(
            "pricing.fallback_volatility must be positive".to_string(),
        ));
    }

    if pricing.default_risk_free_rate < 0.0 || pricing.default_risk_free_rate > 1.0 {
        return Err(ConfigError::ValidationError(
            "pricing.default_risk_free_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if pricing.grid_points < 2 || !(0.0 < pricing.grid_lower && pricing.grid_lower < pricing.grid_upper)
    {
        return Err(ConfigError::ValidationError(
            "pricing grid needs at least 2 points and 0 < grid_lower < grid_upper".to_string(),
        ));
    }

    let selection = &config.selection;
    let deltas = [
        ("short_call_delta", selection.short_call_delta),
        ("long_call_delta", selection.long_call_delta),
        ("short_put_delta", selection.short_put_delta),
        ("long_put_delta", selection.long_put_delta),
    ];
    for (name, value) in deltas {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "selection.{name} must be between 0.0 and 1.0"
            )));
        }
    }

    if !(selection.quantity.is_finite() && selection.quantity > 0.0) {
        return Err(ConfigError::ValidationError(
            "selection.quantity must be positive".to_string(),
        ));
    }

    if config.market_data.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "market_data.request_timeout_secs must be positive".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}
