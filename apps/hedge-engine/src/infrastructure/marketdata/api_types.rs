//! Wire types for the market data REST APIs.
//!
//! Numeric fields arrive as strings and may be empty; they are kept as
//! strings here and parsed by the adapters.

use serde::Deserialize;

// ============================================================================
// Binance European options
// ============================================================================

/// `GET /eapi/v1/exchangeInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceExchangeInfo {
    /// Listed option contracts.
    #[serde(default)]
    pub option_symbols: Vec<BinanceOptionSymbol>,
}

/// One listed option contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceOptionSymbol {
    /// Contract symbol (e.g. "ETH-260227-3000-C").
    pub symbol: String,
    /// Underlying pair (e.g. "ETHUSDT").
    pub underlying: String,
    /// Strike as a decimal string.
    pub strike_price: String,
    /// Expiry in epoch milliseconds.
    pub expiry_date: i64,
    /// "CALL" or "PUT".
    pub side: String,
}

/// One entry of `GET /eapi/v1/ticker`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTicker {
    /// Contract symbol.
    pub symbol: String,
    /// Best bid.
    #[serde(default)]
    pub bid_price: Option<String>,
    /// Best ask.
    #[serde(default)]
    pub ask_price: Option<String>,
    /// Traded volume.
    #[serde(default)]
    pub volume: Option<String>,
}

/// One entry of `GET /eapi/v1/mark`.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceMark {
    /// Contract symbol.
    pub symbol: String,
    /// Implied volatility at the bid.
    #[serde(default, rename = "bidIV")]
    pub bid_iv: Option<String>,
    /// Implied volatility at the ask.
    #[serde(default, rename = "askIV")]
    pub ask_iv: Option<String>,
    /// Delta.
    #[serde(default)]
    pub delta: Option<String>,
}

// ============================================================================
// Paradex
// ============================================================================

/// `GET /v1/bbo/{market}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParadexBbo {
    /// Market symbol.
    #[serde(default)]
    pub market: Option<String>,
    /// Best bid.
    #[serde(default)]
    pub bid: Option<String>,
    /// Size at the best bid.
    #[serde(default)]
    pub bid_size: Option<String>,
    /// Best ask.
    #[serde(default)]
    pub ask: Option<String>,
    /// Size at the best ask.
    #[serde(default)]
    pub ask_size: Option<String>,
    /// Update time in epoch milliseconds.
    #[serde(default)]
    pub last_updated_at: Option<i64>,
    /// Sequence number.
    #[serde(default)]
    pub seq_no: Option<u64>,
}

// ============================================================================
// FRED
// ============================================================================

/// `GET /fred/series/observations`.
#[derive(Debug, Clone, Deserialize)]
pub struct FredObservations {
    /// Observations in date order.
    #[serde(default)]
    pub observations: Vec<FredObservation>,
}

/// One dated observation. `"."` marks a missing value.
#[derive(Debug, Clone, Deserialize)]
pub struct FredObservation {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Percent as a string.
    pub value: String,
}
