//! Option Position Errors

use thiserror::Error;

/// Errors raised while constructing legs and positions.
///
/// All variants are construction-time validation failures: the offending
/// object is never created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionPositionError {
    /// Invalid leg configuration.
    #[error("Invalid leg: {message}")]
    InvalidLeg {
        /// Error details.
        message: String,
    },

    /// Invalid aggregate position.
    #[error("Invalid position: {message}")]
    InvalidPosition {
        /// Error details.
        message: String,
    },

    /// A string literal did not match any variant of a closed enum.
    #[error("Unknown {field} '{value}'")]
    UnknownValue {
        /// Field being parsed (e.g. "option right").
        field: &'static str,
        /// The rejected literal.
        value: String,
    },
}

impl OptionPositionError {
    pub(crate) fn invalid_leg(message: impl Into<String>) -> Self {
        Self::InvalidLeg {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_position(message: impl Into<String>) -> Self {
        Self::InvalidPosition {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OptionPositionError::invalid_leg("quantity must be positive, got 0");
        assert_eq!(err.to_string(), "Invalid leg: quantity must be positive, got 0");

        let err = OptionPositionError::invalid_position("legs disagree on expiry");
        assert_eq!(err.to_string(), "Invalid position: legs disagree on expiry");

        let err = OptionPositionError::UnknownValue {
            field: "option right",
            value: "straddle".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown option right 'straddle'");
    }
}
