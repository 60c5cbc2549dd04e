//! Pricing Errors

use thiserror::Error;

/// Errors from option pricing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// Expiry string could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid expiry '{value}': expected YYYY-MM-DD")]
    InvalidExpiry {
        /// The rejected expiry string.
        value: String,
    },

    /// Volatility was non-positive or not finite.
    #[error("Invalid volatility {sigma}: must be > 0")]
    InvalidVolatility {
        /// The rejected volatility.
        sigma: f64,
    },

    /// Spot, strike or rate out of domain.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error details.
        message: String,
    },
}
