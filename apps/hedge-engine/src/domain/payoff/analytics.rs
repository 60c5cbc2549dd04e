//! Payoff summary statistics.

use super::PnlResult;
use crate::domain::option_position::{StrategyLeg, TradeAction};

impl PnlResult {
    /// Terminal prices where total PnL crosses zero.
    ///
    /// Crossings between grid points are linearly interpolated. Exact zeros
    /// on the grid are reported as-is.
    #[must_use]
    pub fn breakevens(&self) -> Vec<f64> {
        let grid = self.price_grid();
        let pnl = self.total_pnl();
        let mut points = Vec::new();

        for i in 0..pnl.len() {
            if pnl[i] == 0.0 {
                points.push(grid[i]);
                continue;
            }
            if i + 1 < pnl.len() && pnl[i] * pnl[i + 1] < 0.0 {
                let slope = (pnl[i + 1] - pnl[i]) / (grid[i + 1] - grid[i]);
                points.push(grid[i] - pnl[i] / slope);
            }
        }
        points
    }

    /// Largest total PnL on the grid.
    #[must_use]
    pub fn max_profit(&self) -> Option<f64> {
        self.total_pnl().iter().copied().reduce(f64::max)
    }

    /// Smallest total PnL on the grid.
    #[must_use]
    pub fn max_loss(&self) -> Option<f64> {
        self.total_pnl().iter().copied().reduce(f64::min)
    }
}

/// Net option premium of a set of legs (positive = credit received).
///
/// Linear legs carry an entry price in `premium` and are excluded.
#[must_use]
pub fn net_premium(legs: &[StrategyLeg]) -> f64 {
    legs.iter()
        .filter(|leg| leg.instrument().option_right().is_some())
        .map(|leg| match leg.action() {
            TradeAction::Sell => leg.premium() * leg.quantity(),
            TradeAction::Buy => -leg.premium() * leg.quantity(),
        })
        .sum()
}
