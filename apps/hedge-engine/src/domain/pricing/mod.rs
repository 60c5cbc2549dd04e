//! Pricing Bounded Context
//!
//! Black-Scholes-Merton prices and Greeks, plus the caller-side volatility
//! fallback policy.

mod black_scholes;
pub mod errors;
mod greeks;
mod volatility;

pub use black_scholes::{
    DAYS_PER_YEAR, parse_expiry, price_leg, price_option, price_option_at, year_fraction,
};
pub use errors::PricingError;
pub use greeks::{GreeksResult, aggregate_greeks};
pub use volatility::{DEFAULT_FALLBACK_VOLATILITY, ResolvedVol, VolatilityPolicy};
