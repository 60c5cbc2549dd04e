//! Price and first-order sensitivities of a single option.

use serde::{Deserialize, Serialize};

/// Price and Greeks for one unit of an option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    /// Theoretical price.
    pub price: f64,
    /// Delta - sensitivity to a 1.0 move in the underlying.
    pub delta: f64,
    /// Gamma - sensitivity of delta to a 1.0 move in the underlying.
    pub gamma: f64,
    /// Theta - price change per calendar day.
    pub theta: f64,
    /// Vega - price change per 1 percentage point of volatility.
    pub vega: f64,
}

impl GreeksResult {
    /// Zero price and sensitivities.
    pub const ZERO: Self = Self {
        price: 0.0,
        delta: 0.0,
        gamma: 0.0,
        theta: 0.0,
        vega: 0.0,
    };

    /// Scale by a signed quantity (positive for long, negative for short).
    #[must_use]
    pub fn scale(&self, quantity: f64) -> Self {
        Self {
            price: self.price * quantity,
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            theta: self.theta * quantity,
            vega: self.vega * quantity,
        }
    }

    /// Add another result to this one.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            price: self.price + other.price,
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
        }
    }
}

/// Sum position-scaled Greeks over `(greeks, signed_quantity)` pairs.
#[must_use]
pub fn aggregate_greeks<'a>(
    positions: impl IntoIterator<Item = (&'a GreeksResult, f64)>,
) -> GreeksResult {
    positions
        .into_iter()
        .fold(GreeksResult::ZERO, |acc, (greeks, qty)| {
            acc.add(&greeks.scale(qty))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_and_add() {
        let call = GreeksResult {
            price: 10.0,
            delta: 0.5,
            gamma: 0.02,
            theta: -0.03,
            vega: 0.4,
        };
        let short = call.scale(-2.0);
        assert_eq!(short.delta, -1.0);
        assert_eq!(short.vega, -0.8);

        let flat = call.add(&call.scale(-1.0));
        assert_eq!(flat, GreeksResult::ZERO);
    }

    #[test]
    fn aggregate_straddle_delta() {
        let call = GreeksResult {
            delta: 0.55,
            ..GreeksResult::ZERO
        };
        let put = GreeksResult {
            delta: -0.45,
            ..GreeksResult::ZERO
        };
        let net = aggregate_greeks([(&call, 1.0), (&put, 1.0)]);
        assert!((net.delta - 0.10).abs() < 1e-12);
    }
}
