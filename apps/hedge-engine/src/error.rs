//! Crate-level error handling for the hedge engine.
//!
//! Each bounded context owns its error type. [`EngineError`] wraps them for
//! callers that cross contexts (use cases, the binary), and [`ErrorCode`]
//! gives every failure a stable reason string plus a recoverability flag.
//!
//! # Recoverability
//!
//! | Code | Recoverable | Typical source |
//! |------|-------------|----------------|
//! | `INVALID_POSITION` | no | malformed legs or position file |
//! | `INVALID_PRICING_INPUT` | no | bad expiry, volatility, spot or strike |
//! | `INVALID_CONFIG` | no | configuration file |
//! | `SELECTION_FAILED` | no | no quoted strike, broken condor structure |
//! | `MISSING_QUOTE` | yes | leg strike or delta absent from the chain |
//! | `DATA_UNAVAILABLE` | yes | provider had nothing usable |
//! | `MARKET_DATA_TIMEOUT` | yes | request exceeded its timeout |
//! | `MARKET_DATA_ERROR` | yes | connection or API failure |
//! | `MONITOR_STOPPED` | no | stepping a stopped monitor |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::MarketDataError;
use crate::config::ConfigError;
use crate::domain::hedging::HedgeError;
use crate::domain::option_position::OptionPositionError;
use crate::domain::pricing::PricingError;
use crate::domain::strike_selection::SelectionError;

/// Error codes for the hedge engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    /// Invalid leg or position.
    InvalidPosition,
    /// Invalid pricing input.
    InvalidPricingInput,
    /// Invalid configuration.
    InvalidConfig,
    /// Strike selection could not build the structure.
    SelectionFailed,

    // Data errors
    /// A leg could not be resolved from the chain.
    MissingQuote,
    /// No usable market data.
    DataUnavailable,
    /// Market data request timed out.
    MarketDataTimeout,
    /// Market data provider failure.
    MarketDataError,

    // Lifecycle errors
    /// The monitor already stopped.
    MonitorStopped,
}

impl ErrorCode {
    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPosition => "INVALID_POSITION",
            Self::InvalidPricingInput => "INVALID_PRICING_INPUT",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::SelectionFailed => "SELECTION_FAILED",
            Self::MissingQuote => "MISSING_QUOTE",
            Self::DataUnavailable => "DATA_UNAVAILABLE",
            Self::MarketDataTimeout => "MARKET_DATA_TIMEOUT",
            Self::MarketDataError => "MARKET_DATA_ERROR",
            Self::MonitorStopped => "MONITOR_STOPPED",
        }
    }

    /// Whether retrying on a later cycle can succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingQuote
                | Self::DataUnavailable
                | Self::MarketDataTimeout
                | Self::MarketDataError
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Any error the engine can surface.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Position model error.
    #[error(transparent)]
    Position(#[from] OptionPositionError),

    /// Pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Strike selection error.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Hedging error.
    #[error(transparent)]
    Hedge(#[from] HedgeError),

    /// Market data error.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Position(_) => ErrorCode::InvalidPosition,
            Self::Pricing(_) => ErrorCode::InvalidPricingInput,
            Self::Selection(_) => ErrorCode::SelectionFailed,
            Self::Hedge(HedgeError::MissingQuote { .. }) => ErrorCode::MissingQuote,
            Self::Hedge(HedgeError::DataUnavailable { .. })
            | Self::MarketData(
                MarketDataError::DataUnavailable { .. } | MarketDataError::SymbolNotFound { .. },
            ) => ErrorCode::DataUnavailable,
            Self::Hedge(HedgeError::Stopped { .. }) => ErrorCode::MonitorStopped,
            Self::MarketData(MarketDataError::Timeout { .. }) => ErrorCode::MarketDataTimeout,
            Self::MarketData(
                MarketDataError::ConnectionError { .. } | MarketDataError::ApiError { .. },
            ) => ErrorCode::MarketDataError,
            Self::Config(_) => ErrorCode::InvalidConfig,
        }
    }

    /// Shortcut for `self.code().is_recoverable()`.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }
}
