//! Strike Selection Errors

use thiserror::Error;

/// Errors from selecting strikes out of a chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No row survived filtering for a leg (insufficient liquidity/data).
    #[error("No quoted strike found for {leg}")]
    NotFound {
        /// Leg being selected (e.g. "short_call").
        leg: String,
    },

    /// Selected strikes do not form a valid structure.
    #[error("Invalid structure: {message}")]
    InvalidStructure {
        /// Error details.
        message: String,
    },
}
