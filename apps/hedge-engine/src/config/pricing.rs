//! Pricing and payoff defaults.

use serde::{Deserialize, Serialize};

use crate::domain::payoff::{DEFAULT_GRID_LOWER, DEFAULT_GRID_POINTS, DEFAULT_GRID_UPPER, linspace};
use crate::domain::pricing::{DEFAULT_FALLBACK_VOLATILITY, VolatilityPolicy};

/// Pricing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Volatility used when a quote carries no usable IV.
    #[serde(default = "default_fallback_volatility")]
    pub fallback_volatility: f64,
    /// Rate (decimal) used when the risk-free rate feed is unavailable.
    #[serde(default = "default_risk_free_rate")]
    pub default_risk_free_rate: f64,
    /// Number of points on the default PnL grid.
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,
    /// Lower bound of the PnL grid as a multiple of spot.
    #[serde(default = "default_grid_lower")]
    pub grid_lower: f64,
    /// Upper bound of the PnL grid as a multiple of spot.
    #[serde(default = "default_grid_upper")]
    pub grid_upper: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fallback_volatility: default_fallback_volatility(),
            default_risk_free_rate: default_risk_free_rate(),
            grid_points: default_grid_points(),
            grid_lower: default_grid_lower(),
            grid_upper: default_grid_upper(),
        }
    }
}

impl PricingConfig {
    /// Volatility fallback policy.
    #[must_use]
    pub const fn volatility_policy(&self) -> VolatilityPolicy {
        VolatilityPolicy::new(self.fallback_volatility)
    }

    /// PnL grid around `spot` using the configured bounds.
    #[must_use]
    pub fn price_grid(&self, spot: f64) -> Vec<f64> {
        linspace(spot * self.grid_lower, spot * self.grid_upper, self.grid_points)
    }
}

const fn default_fallback_volatility() -> f64 {
    DEFAULT_FALLBACK_VOLATILITY
}

pub(crate) const fn default_risk_free_rate() -> f64 {
    0.045
}

const fn default_grid_points() -> usize {
    DEFAULT_GRID_POINTS
}

const fn default_grid_lower() -> f64 {
    DEFAULT_GRID_LOWER
}

const fn default_grid_upper() -> f64 {
    DEFAULT_GRID_UPPER
}

pub(crate) const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payoff::default_price_grid;

    #[test]
    fn default_grid_matches_payoff_default() {
        let config = PricingConfig::default();
        assert_eq!(config.price_grid(3000.0), default_price_grid(3000.0));
        assert!((config.volatility_policy().fallback - 0.5).abs() < f64::EPSILON);
    }
}
