//! Payoff Bounded Context
//!
//! Terminal PnL curves for arbitrary mixes of option, stock and futures legs,
//! with summary statistics and common strategy templates.

mod analytics;
mod engine;
pub mod templates;

pub use analytics::net_premium;
pub use engine::{
    DEFAULT_GRID_LOWER, DEFAULT_GRID_POINTS, DEFAULT_GRID_UPPER, PnlResult, compute_pnl,
    default_price_grid, leg_payoff, linspace,
};
