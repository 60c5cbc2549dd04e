//! Market data provider configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Market data providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// Binance European options.
    #[serde(default)]
    pub binance_options: BinanceOptionsConfig,
    /// Paradex perpetuals.
    #[serde(default)]
    pub paradex: ParadexConfig,
    /// FRED rate series.
    #[serde(default)]
    pub fred: FredConfig,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            binance_options: BinanceOptionsConfig::default(),
            paradex: ParadexConfig::default(),
            fred: FredConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl MarketDataConfig {
    /// HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Binance options API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinanceOptionsConfig {
    /// Base URL.
    #[serde(default = "default_binance_base_url")]
    pub base_url: String,
    /// Quote asset appended to the underlying (ETH -> ETHUSDT).
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
}

impl Default for BinanceOptionsConfig {
    fn default() -> Self {
        Self {
            base_url: default_binance_base_url(),
            quote_asset: default_quote_asset(),
        }
    }
}

/// Paradex API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParadexConfig {
    /// Base URL.
    #[serde(default = "default_paradex_base_url")]
    pub base_url: String,
    /// Default perpetual market.
    #[serde(default = "default_perp_symbol")]
    pub default_symbol: String,
}

impl Default for ParadexConfig {
    fn default() -> Self {
        Self {
            base_url: default_paradex_base_url(),
            default_symbol: default_perp_symbol(),
        }
    }
}

/// FRED API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FredConfig {
    /// Base URL.
    #[serde(default = "default_fred_base_url")]
    pub base_url: String,
    /// API key (from environment variable).
    #[serde(default)]
    pub api_key: String,
}

impl FredConfig {
    /// API key, or `MissingEnvVar` when it was not provided.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the key is empty.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingEnvVar("FRED_API_KEY".to_string()));
        }
        Ok(key)
    }
}

impl Default for FredConfig {
    fn default() -> Self {
        Self {
            base_url: default_fred_base_url(),
            api_key: String::new(),
        }
    }
}

const fn default_request_timeout_secs() -> u64 {
    10
}

fn default_binance_base_url() -> String {
    "https://eapi.binance.com".to_string()
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

fn default_paradex_base_url() -> String {
    "https://api.prod.paradex.trade".to_string()
}

fn default_perp_symbol() -> String {
    "ETH-USD-PERP".to_string()
}

fn default_fred_base_url() -> String {
    "https://api.stlouisfed.org".to_string()
}
