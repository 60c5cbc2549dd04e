//! Paradex Perpetuals Adapter
//!
//! REST implementation of `SpotPricePort` using the best bid/offer endpoint.
//! The spot used for pricing is the BBO mid.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::api_types::ParadexBbo;
use super::http::{JsonHttpClient, parse_decimal_str};
use crate::application::ports::{MarketDataError, SpotPricePort};
use crate::config::MarketDataConfig;

/// Best bid/offer of a perpetual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerpQuote {
    /// Market symbol.
    pub market: String,
    /// Best bid.
    pub bid: f64,
    /// Best ask.
    pub ask: f64,
    /// Size at the best bid.
    pub bid_size: Option<f64>,
    /// Size at the best ask.
    pub ask_size: Option<f64>,
    /// Exchange update time.
    pub last_updated: Option<DateTime<Utc>>,
    /// Exchange sequence number.
    pub seq_no: Option<u64>,
}

impl PerpQuote {
    /// `(bid + ask) / 2`.
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// `ask - bid`.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

/// Paradex REST adapter.
#[derive(Debug, Clone)]
pub struct ParadexAdapter {
    http: JsonHttpClient,
}

impl ParadexAdapter {
    /// Create an adapter from the market data configuration.
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        Self::with_base_url(&config.paradex.base_url, config.request_timeout())
    }

    /// Create an adapter against an explicit base URL.
    pub fn with_base_url(
        base_url: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, MarketDataError> {
        Ok(Self {
            http: JsonHttpClient::new("paradex", base_url, timeout)?,
        })
    }

    /// Best bid/offer for `symbol` (e.g. "ETH-USD-PERP").
    pub async fn get_bbo(&self, symbol: &str) -> Result<PerpQuote, MarketDataError> {
        let bbo: ParadexBbo = self.http.get(&format!("/v1/bbo/{symbol}"), &[]).await?;

        let side = |value: Option<&str>, name: &str| {
            parse_decimal_str(value)
                .filter(|v| *v > 0.0)
                .ok_or_else(|| MarketDataError::unavailable(format!("{symbol} has no {name}")))
        };
        let bid = side(bbo.bid.as_deref(), "bid")?;
        let ask = side(bbo.ask.as_deref(), "ask")?;

        Ok(PerpQuote {
            market: bbo.market.unwrap_or_else(|| symbol.to_string()),
            bid,
            ask,
            bid_size: parse_decimal_str(bbo.bid_size.as_deref()),
            ask_size: parse_decimal_str(bbo.ask_size.as_deref()),
            last_updated: bbo.last_updated_at.and_then(DateTime::from_timestamp_millis),
            seq_no: bbo.seq_no,
        })
    }
}

#[async_trait]
impl SpotPricePort for ParadexAdapter {
    async fn get_spot_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        let quote = self.get_bbo(symbol).await?;
        tracing::debug!(
            market = %quote.market,
            bid = quote.bid,
            ask = quote.ask,
            spread = quote.spread(),
            "Fetched perpetual BBO"
        );
        Ok(quote.mid())
    }
}
