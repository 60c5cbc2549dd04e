//! Hedging Errors

use thiserror::Error;

use crate::domain::option_position::OptionRight;

/// Errors raised while computing a delta snapshot or stepping the monitor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HedgeError {
    /// A leg's delta could not be resolved from the chain.
    #[error("Missing quote for {right} strike={strike}: {reason}")]
    MissingQuote {
        /// Option right of the leg.
        right: OptionRight,
        /// Strike of the leg.
        strike: f64,
        /// What was missing.
        reason: String,
    },

    /// Market data for the cycle could not be obtained.
    #[error("Data unavailable: {message}")]
    DataUnavailable {
        /// Error details.
        message: String,
    },

    /// The monitor already reached a terminal state.
    #[error("Monitor stopped after {cycles} cycles")]
    Stopped {
        /// Cycles run before stopping.
        cycles: u64,
    },
}

impl HedgeError {
    /// Build a `DataUnavailable` error.
    pub(crate) fn data_unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_quote_display() {
        let err = HedgeError::MissingQuote {
            right: OptionRight::Put,
            strike: 2800.0,
            reason: "delta missing".to_string(),
        };
        assert_eq!(err.to_string(), "Missing quote for PUT strike=2800: delta missing");
    }
}
