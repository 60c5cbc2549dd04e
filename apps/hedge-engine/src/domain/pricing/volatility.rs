//! Implied volatility fallback policy.
//!
//! Market data frequently omits IV or reports zero for illiquid strikes.
//! Callers resolve the input volatility through this policy before pricing;
//! the pricing functions themselves reject non-positive volatility.

use serde::{Deserialize, Serialize};

/// Fallback volatility applied when no usable IV is available (50%).
pub const DEFAULT_FALLBACK_VOLATILITY: f64 = 0.5;

/// Policy for substituting unusable implied volatilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPolicy {
    /// Volatility used when the observed IV is missing or non-positive.
    pub fallback: f64,
}

impl Default for VolatilityPolicy {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK_VOLATILITY,
        }
    }
}

/// Outcome of resolving a volatility through the policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVol {
    /// Volatility to price with.
    pub value: f64,
    /// Whether the fallback replaced the observed value.
    pub substituted: bool,
}

impl VolatilityPolicy {
    /// Create a policy with a custom fallback.
    #[must_use]
    pub const fn new(fallback: f64) -> Self {
        Self { fallback }
    }

    /// Resolve an observed IV, substituting the fallback when unusable.
    #[must_use]
    pub fn resolve(&self, observed: Option<f64>) -> ResolvedVol {
        match observed {
            Some(iv) if iv.is_finite() && iv > 0.0 => ResolvedVol {
                value: iv,
                substituted: false,
            },
            _ => ResolvedVol {
                value: self.fallback,
                substituted: true,
            },
        }
    }
}
