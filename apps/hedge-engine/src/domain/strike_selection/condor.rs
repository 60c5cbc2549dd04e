//! Iron condor strike selection with wing-ordering correction.

use serde::{Deserialize, Serialize};

use super::{ChainRow, OptionChain, SelectionError, StrikeSelector};
use crate::domain::option_position::{LegRole, OptionRight};

/// Absolute delta targets for the four condor legs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CondorTargets {
    /// Target |delta| of the sold put.
    pub short_put: f64,
    /// Target |delta| of the put wing.
    pub long_put: f64,
    /// Target |delta| of the sold call.
    pub short_call: f64,
    /// Target |delta| of the call wing.
    pub long_call: f64,
}

impl Default for CondorTargets {
    fn default() -> Self {
        Self {
            short_put: 0.20,
            long_put: 0.05,
            short_call: 0.20,
            long_call: 0.05,
        }
    }
}

/// Rows chosen for each condor leg.
#[derive(Debug, Clone, PartialEq)]
pub struct CondorSelection {
    /// Put wing row.
    pub long_put: ChainRow,
    /// Sold put row.
    pub short_put: ChainRow,
    /// Sold call row.
    pub short_call: ChainRow,
    /// Call wing row.
    pub long_call: ChainRow,
    /// Legs that were re-selected by the wing correction.
    pub corrected: Vec<LegRole>,
}

impl CondorSelection {
    /// Row for a role.
    #[must_use]
    pub const fn row(&self, role: LegRole) -> &ChainRow {
        match role {
            LegRole::LongPut => &self.long_put,
            LegRole::ShortPut => &self.short_put,
            LegRole::ShortCall => &self.short_call,
            LegRole::LongCall => &self.long_call,
        }
    }

    /// Strikes satisfy `long_put < short_put < short_call < long_call`.
    #[must_use]
    pub fn is_well_ordered(&self) -> bool {
        self.long_put.strike < self.short_put.strike
            && self.short_put.strike < self.short_call.strike
            && self.short_call.strike < self.long_call.strike
    }
}

/// Select the four condor legs by target delta.
///
/// Each wing is selected independently, then corrected when it is not
/// strictly outside its short strike: the call wing is re-selected among
/// strikes above the short call and the put wing among strikes below the
/// short put. If no such strike is quoted, the original wing is kept and
/// [`CondorSelection::is_well_ordered`] reports the problem.
pub fn select_iron_condor(
    chain: &OptionChain,
    targets: &CondorTargets,
) -> Result<CondorSelection, SelectionError> {
    let pick = |right: OptionRight, target: f64, role: LegRole| {
        StrikeSelector::select_by_target_delta(chain, right, target)
            .copied()
            .ok_or_else(|| SelectionError::NotFound {
                leg: role.to_string(),
            })
    };

    let short_call = pick(OptionRight::Call, targets.short_call, LegRole::ShortCall)?;
    let mut long_call = pick(OptionRight::Call, targets.long_call, LegRole::LongCall)?;
    let short_put = pick(OptionRight::Put, targets.short_put, LegRole::ShortPut)?;
    let mut long_put = pick(OptionRight::Put, targets.long_put, LegRole::LongPut)?;
    let mut corrected = Vec::new();

    if long_call.strike <= short_call.strike
        && let Some(row) = StrikeSelector::select_by_target_delta_where(
            chain,
            OptionRight::Call,
            targets.long_call,
            |strike| strike > short_call.strike,
        )
    {
        long_call = *row;
        corrected.push(LegRole::LongCall);
    }

    if long_put.strike >= short_put.strike
        && let Some(row) = StrikeSelector::select_by_target_delta_where(
            chain,
            OptionRight::Put,
            targets.long_put,
            |strike| strike < short_put.strike,
        )
    {
        long_put = *row;
        corrected.push(LegRole::LongPut);
    }

    Ok(CondorSelection {
        long_put,
        short_put,
        short_call,
        long_call,
        corrected,
    })
}
