//! Domain Layer
//!
//! Pure business logic with no I/O. Market data arrives as plain values
//! (option chains, spot prices) handed in by the application layer.
//!
//! # Bounded Contexts
//!
//! - [`option_position`]: Validated option legs, hedge leg and the iron condor aggregate
//! - [`pricing`]: Black-Scholes-Merton prices and Greeks
//! - [`payoff`]: Terminal PnL curves and strategy templates
//! - [`strike_selection`]: Delta-targeted strike picking from an option chain
//! - [`hedging`]: Delta snapshots and the hedge monitor state machine

pub mod hedging;
pub mod option_position;
pub mod payoff;
pub mod pricing;
pub mod strike_selection;
