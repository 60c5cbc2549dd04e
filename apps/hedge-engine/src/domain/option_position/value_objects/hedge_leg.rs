//! Hedge Leg Value Object

use serde::{Deserialize, Serialize};

use super::{StrategyLeg, TradeAction};

/// Linear hedge instrument (perpetual, future or stock).
///
/// The quantity is signed: positive is long, negative is short and zero
/// means flat/unhedged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeLeg {
    /// Instrument symbol (e.g. "ETH-USD-PERP").
    pub symbol: String,
    /// Signed quantity.
    #[serde(default, alias = "quantity")]
    pub signed_quantity: f64,
    /// Entry price, if known.
    #[serde(default)]
    pub entry_price: Option<f64>,
}

impl HedgeLeg {
    /// Create a flat hedge leg.
    #[must_use]
    pub fn flat(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            signed_quantity: 0.0,
            entry_price: None,
        }
    }

    /// Create a hedge leg with a signed quantity.
    #[must_use]
    pub fn new(symbol: impl Into<String>, signed_quantity: f64, entry_price: Option<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            signed_quantity,
            entry_price,
        }
    }

    /// Check if the hedge is flat.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.signed_quantity == 0.0
    }

    /// Payoff leg for this hedge, or `None` when flat.
    ///
    /// A missing entry price is evaluated at the spot of the PnL run.
    #[must_use]
    pub fn to_strategy_leg(&self) -> Option<StrategyLeg> {
        if self.is_flat() || !self.signed_quantity.is_finite() {
            return None;
        }
        let action = if self.signed_quantity > 0.0 {
            TradeAction::Buy
        } else {
            TradeAction::Sell
        };
        StrategyLeg::futures(
            action,
            self.entry_price.unwrap_or(0.0),
            self.signed_quantity.abs(),
        )
        .ok()
    }
}
