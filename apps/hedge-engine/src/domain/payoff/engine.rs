//! Terminal PnL Engine
//!
//! Evaluates each leg's payoff at expiry over a grid of underlying prices.
//! No time value is modeled; pricing before expiry lives in the pricing
//! context.

use serde::Serialize;

use crate::domain::option_position::{LegInstrument, StrategyLeg, TradeAction};

/// Number of points in the default price grid.
pub const DEFAULT_GRID_POINTS: usize = 200;

/// Lower bound of the default grid as a fraction of spot.
pub const DEFAULT_GRID_LOWER: f64 = 0.8;

/// Upper bound of the default grid as a fraction of spot.
pub const DEFAULT_GRID_UPPER: f64 = 1.2;

/// Evenly spaced points over `[start, end]`, both endpoints included.
#[must_use]
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            let mut grid: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            grid[n - 1] = end;
            grid
        }
    }
}

/// Default grid: 200 points over `[0.8 * spot, 1.2 * spot]`.
#[must_use]
pub fn default_price_grid(spot: f64) -> Vec<f64> {
    linspace(
        spot * DEFAULT_GRID_LOWER,
        spot * DEFAULT_GRID_UPPER,
        DEFAULT_GRID_POINTS,
    )
}

/// Per-leg and aggregate terminal PnL over a price grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlResult {
    price_grid: Vec<f64>,
    per_leg_pnl: Vec<Vec<f64>>,
    total_pnl: Vec<f64>,
    legs: Vec<StrategyLeg>,
}

impl PnlResult {
    /// Underlying prices at expiry.
    #[must_use]
    pub fn price_grid(&self) -> &[f64] {
        &self.price_grid
    }

    /// PnL vector for each leg, in input order.
    #[must_use]
    pub fn per_leg_pnl(&self) -> &[Vec<f64>] {
        &self.per_leg_pnl
    }

    /// Sum of the per-leg vectors at each grid point.
    #[must_use]
    pub fn total_pnl(&self) -> &[f64] {
        &self.total_pnl
    }

    /// The evaluated legs.
    #[must_use]
    pub fn legs(&self) -> &[StrategyLeg] {
        &self.legs
    }
}

/// Compute terminal PnL for `legs`.
///
/// `grid` defaults to [`default_price_grid`] around `spot`. Legs with an
/// unsupported instrument contribute an all-zero vector.
#[must_use]
pub fn compute_pnl(legs: &[StrategyLeg], spot: f64, grid: Option<&[f64]>) -> PnlResult {
    let price_grid = grid.map_or_else(|| default_price_grid(spot), <[f64]>::to_vec);

    let per_leg_pnl: Vec<Vec<f64>> = legs
        .iter()
        .map(|leg| {
            price_grid
                .iter()
                .map(|&s_t| leg_payoff(leg, spot, s_t))
                .collect()
        })
        .collect();

    let mut total_pnl = vec![0.0; price_grid.len()];
    for leg_pnl in &per_leg_pnl {
        for (total, value) in total_pnl.iter_mut().zip(leg_pnl) {
            *total += value;
        }
    }

    PnlResult {
        price_grid,
        per_leg_pnl,
        total_pnl,
        legs: legs.to_vec(),
    }
}

/// Payoff of one leg at terminal price `s_t`.
#[must_use]
pub fn leg_payoff(leg: &StrategyLeg, spot: f64, s_t: f64) -> f64 {
    let per_unit = match leg.instrument() {
        LegInstrument::Call => {
            let intrinsic = (s_t - leg.strike().unwrap_or(spot)).max(0.0);
            signed_by_action(leg.action(), intrinsic - leg.premium())
        }
        LegInstrument::Put => {
            let intrinsic = (leg.strike().unwrap_or(spot) - s_t).max(0.0);
            signed_by_action(leg.action(), intrinsic - leg.premium())
        }
        LegInstrument::Stock | LegInstrument::Futures => {
            let entry = if leg.premium() > 0.0 {
                leg.premium()
            } else {
                spot
            };
            signed_by_action(leg.action(), s_t - entry)
        }
        LegInstrument::Unsupported(_) => return 0.0,
    };
    per_unit * leg.quantity()
}

fn signed_by_action(action: TradeAction, long_value: f64) -> f64 {
    match action {
        TradeAction::Buy => long_value,
        TradeAction::Sell => -long_value,
    }
}
