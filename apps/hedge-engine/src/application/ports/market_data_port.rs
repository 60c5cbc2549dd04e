//! Market Data Ports (Driven Ports)
//!
//! Interfaces for fetching spot prices, option chains and risk-free rates
//! from external providers.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::strike_selection::OptionChain;

/// Option chains keyed by expiry, ascending.
pub type ChainsByExpiry = BTreeMap<NaiveDate, OptionChain>;

/// One risk-free rate observation, in percent as published.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Rate in percent (e.g. 4.35).
    pub rate_percent: f64,
}

/// Latest risk-free rate in decimal form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFreeRate {
    /// Observation date.
    pub as_of: NaiveDate,
    /// Rate as a decimal (e.g. 0.0435).
    pub rate: f64,
}

/// Pick the latest dated observation and convert it to decimal.
///
/// Returns `None` when there are no points or the latest one is not finite.
#[must_use]
pub fn latest_risk_free_rate(points: &[RatePoint]) -> Option<RiskFreeRate> {
    let latest = points.iter().max_by_key(|p| p.date)?;
    latest.rate_percent.is_finite().then(|| RiskFreeRate {
        as_of: latest.date,
        rate: latest.rate_percent / 100.0,
    })
}

/// Market data error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketDataError {
    /// Provider answered but had no usable data.
    #[error("Market data unavailable: {message}")]
    DataUnavailable {
        /// Error details.
        message: String,
    },

    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Provider returned an error status or malformed payload.
    #[error("Market data API error: {message}")]
    ApiError {
        /// Error details.
        message: String,
    },

    /// Symbol not found.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Request did not complete in time.
    #[error("Market data request timed out after {timeout:?}")]
    Timeout {
        /// Configured timeout.
        timeout: Duration,
    },
}

impl MarketDataError {
    /// Build a `DataUnavailable` error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            message: message.into(),
        }
    }

    /// Build an `ApiError`.
    pub fn api(message: impl Into<String>) -> Self {
        Self::ApiError {
            message: message.into(),
        }
    }
}

/// Port for spot/perpetual mid prices.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotPricePort: Send + Sync {
    /// Mid of the best bid and offer for `symbol`.
    async fn get_spot_price(&self, symbol: &str) -> Result<f64, MarketDataError>;
}

/// Port for option chains.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionChainPort: Send + Sync {
    /// Chains for `underlying` (e.g. "ETH"), restricted to `expiry` when
    /// given. Rows of every chain are sorted by strike.
    async fn get_option_chain(
        &self,
        underlying: &str,
        expiry: Option<NaiveDate>,
    ) -> Result<ChainsByExpiry, MarketDataError>;
}

/// Port for risk-free rate series.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RiskFreeRatePort: Send + Sync {
    /// Observations of `series_id` between `start` and `end` inclusive, in
    /// date order. Missing observations are skipped.
    async fn get_risk_free_rate(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RatePoint>, MarketDataError>;
}
