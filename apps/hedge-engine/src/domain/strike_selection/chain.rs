//! Option chain snapshot for a single expiry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::option_position::OptionRight;

/// Relative tolerance used when matching strikes that went through a float
/// round-trip (e.g. JSON string to f64).
pub const STRIKE_MATCH_TOLERANCE: f64 = 1e-8;

/// One side (call or put) of a chain row. Every field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideQuote {
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// Implied volatility at the bid.
    pub bid_iv: Option<f64>,
    /// Implied volatility at the ask.
    pub ask_iv: Option<f64>,
    /// Delta.
    pub delta: Option<f64>,
    /// Traded volume.
    pub volume: Option<f64>,
}

impl SideQuote {
    /// Delta, bid and ask are all present and finite.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        [self.delta, self.bid, self.ask]
            .iter()
            .all(|v| v.is_some_and(f64::is_finite))
    }

    /// Mid of bid and ask when both exist.
    #[must_use]
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }
}

/// One strike of the chain with both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainRow {
    /// Strike price.
    pub strike: f64,
    /// Call side.
    #[serde(default)]
    pub call: SideQuote,
    /// Put side.
    #[serde(default)]
    pub put: SideQuote,
}

impl ChainRow {
    /// Create a row with both sides empty.
    #[must_use]
    pub fn new(strike: f64) -> Self {
        Self {
            strike,
            call: SideQuote::default(),
            put: SideQuote::default(),
        }
    }

    /// Quote for one side.
    #[must_use]
    pub const fn quote(&self, right: OptionRight) -> &SideQuote {
        match right {
            OptionRight::Call => &self.call,
            OptionRight::Put => &self.put,
        }
    }

    /// Mutable quote for one side.
    pub const fn quote_mut(&mut self, right: OptionRight) -> &mut SideQuote {
        match right {
            OptionRight::Call => &mut self.call,
            OptionRight::Put => &mut self.put,
        }
    }
}

/// Option chain for one expiry, rows in chain order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    /// Expiry date.
    pub expiry: NaiveDate,
    /// Rows in chain order (usually ascending strike).
    pub rows: Vec<ChainRow>,
}

impl OptionChain {
    /// Create a chain.
    #[must_use]
    pub const fn new(expiry: NaiveDate, rows: Vec<ChainRow>) -> Self {
        Self { expiry, rows }
    }

    /// Check if the chain has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a strike: exact match first, then within
    /// `max(|strike| * 1e-8, 1e-8)`. First match in chain order wins.
    #[must_use]
    pub fn find_strike(&self, strike: f64) -> Option<&ChainRow> {
        self.rows
            .iter()
            .find(|row| row.strike == strike)
            .or_else(|| {
                let tolerance = (strike.abs() * STRIKE_MATCH_TOLERANCE).max(STRIKE_MATCH_TOLERANCE);
                self.rows
                    .iter()
                    .find(|row| (row.strike - strike).abs() <= tolerance)
            })
    }

    /// Sort rows by ascending strike (stable).
    pub fn sort_by_strike(&mut self) {
        self.rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> OptionChain {
        let mut row = ChainRow::new(3000.0);
        row.call.delta = Some(0.5);
        OptionChain::new(
            NaiveDate::from_ymd_opt(2026, 2, 13).unwrap(),
            vec![ChainRow::new(3100.0), row, ChainRow::new(2900.0)],
        )
    }

    #[test]
    fn find_strike_exact_and_tolerant() {
        let chain = chain();
        assert_eq!(chain.find_strike(3000.0).unwrap().call.delta, Some(0.5));
        assert!(chain.find_strike(3000.000_000_01).is_some());
        assert!(chain.find_strike(3000.1).is_none());
    }

    #[test]
    fn sort_by_strike_orders_rows() {
        let mut chain = chain();
        chain.sort_by_strike();
        let strikes: Vec<f64> = chain.rows.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![2900.0, 3000.0, 3100.0]);
    }

    #[test]
    fn side_quote_completeness() {
        let mut quote = SideQuote {
            bid: Some(10.0),
            ask: Some(12.0),
            delta: Some(0.3),
            ..SideQuote::default()
        };
        assert!(quote.is_quoted());
        assert_eq!(quote.mid(), Some(11.0));

        quote.ask = None;
        assert!(!quote.is_quoted());
        assert_eq!(quote.mid(), None);

        quote.ask = Some(f64::NAN);
        assert!(!quote.is_quoted());
    }
}
