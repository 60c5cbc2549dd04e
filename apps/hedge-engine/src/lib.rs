// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Hedge Engine - Rust Core Library
//!
//! Options payoff, pricing and delta-hedge monitoring for multi-leg option
//! positions hedged with a perpetual future on a single underlying.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic, no I/O
//!   - `option_position`: Option legs, hedge leg, iron condor aggregate
//!   - `pricing`: Black-Scholes-Merton price and Greeks, volatility fallback
//!   - `payoff`: Terminal PnL over a price grid, strategy templates
//!   - `strike_selection`: Delta-targeted chain lookup, wing correction
//!   - `hedging`: Hedge monitor state machine and cycle records
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for market data and scheduling
//!   - `services`: `HedgeMonitorService` polling loop
//!   - `use_cases`: `BuildIronCondor`, `EvaluateStraddle`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `marketdata`: Binance options, Paradex perpetuals, FRED, in-memory
//!   - `scheduler`: Tokio and manual schedulers
//!
//! - **Ambient**: `config`, `error`, `observability`, `telemetry`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Ambient Stack
// =============================================================================

/// YAML configuration with environment variable interpolation.
pub mod config;

/// Crate-level error type and error codes.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::hedging::{CycleRecord, HedgeError, HedgeMonitor, HedgeState, MonitorPolicy};
pub use domain::option_position::{IronCondorParams, IronCondorPosition, LegRole};
pub use domain::payoff::compute_pnl;
pub use domain::pricing::{GreeksResult, PricingError, VolatilityPolicy};
pub use domain::strike_selection::{OptionChain, StrikeSelector, select_iron_condor};

// Application re-exports
pub use application::ports::{
    MarketDataError, OptionChainPort, RiskFreeRatePort, SchedulerPort, SpotPricePort,
};
pub use application::services::{HedgeMonitorService, MonitorSummary};
pub use application::use_cases::{BuildIronCondorUseCase, EvaluateStraddleUseCase};

// Infrastructure re-exports
pub use infrastructure::{
    BinanceOptionsAdapter, FredAdapter, InMemoryMarketData, ManualScheduler, ParadexAdapter,
    TokioScheduler,
};

// Ambient re-exports
pub use config::{Config, ConfigError, load_config};
pub use error::{EngineError, ErrorCode};
