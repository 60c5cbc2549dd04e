//! Strike Selector Domain Service

use super::{ChainRow, OptionChain};
use crate::domain::option_position::OptionRight;

/// Picks chain rows by absolute delta or moneyness.
///
/// Rows without a finite delta, bid and ask on the requested side are
/// skipped. Ties keep the earliest row in chain order.
pub struct StrikeSelector;

impl StrikeSelector {
    /// Row whose `|delta|` is closest to `target_abs_delta`, or `None` when
    /// no row is fully quoted on `right`.
    #[must_use]
    pub fn select_by_target_delta(
        chain: &OptionChain,
        right: OptionRight,
        target_abs_delta: f64,
    ) -> Option<&ChainRow> {
        Self::select_by_target_delta_where(chain, right, target_abs_delta, |_| true)
    }

    /// Same as [`Self::select_by_target_delta`], restricted to strikes
    /// accepted by `strike_filter`.
    #[must_use]
    pub fn select_by_target_delta_where<F>(
        chain: &OptionChain,
        right: OptionRight,
        target_abs_delta: f64,
        strike_filter: F,
    ) -> Option<&ChainRow>
    where
        F: Fn(f64) -> bool,
    {
        let mut best: Option<(&ChainRow, f64)> = None;

        for row in &chain.rows {
            if !strike_filter(row.strike) {
                continue;
            }
            let quote = row.quote(right);
            if !quote.is_quoted() {
                continue;
            }
            let Some(delta) = quote.delta else {
                continue;
            };

            let score = (delta.abs() - target_abs_delta).abs();
            match best {
                Some((_, best_score)) if score >= best_score => {}
                _ => best = Some((row, score)),
            }
        }

        best.map(|(row, _)| row)
    }

    /// Row whose strike is closest to `spot`. First row wins on ties.
    #[must_use]
    pub fn select_atm(chain: &OptionChain, spot: f64) -> Option<&ChainRow> {
        let mut best: Option<(&ChainRow, f64)> = None;
        for row in &chain.rows {
            let distance = (row.strike - spot).abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((row, distance)),
            }
        }
        best.map(|(row, _)| row)
    }
}
