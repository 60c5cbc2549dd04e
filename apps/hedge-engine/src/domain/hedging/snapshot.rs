//! Per-cycle delta snapshot of an iron condor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::HedgeError;
use crate::domain::option_position::{IronCondorPosition, LegRole, OptionLeg};
use crate::domain::strike_selection::OptionChain;

/// Absolute tolerance below which a net delta counts as zero.
pub const DELTA_ZERO_TOLERANCE: f64 = 1e-12;

/// Relative change of `current` against `previous`.
///
/// `+inf` when `previous` is zero and `current` exceeds the tolerance, `0`
/// otherwise.
#[must_use]
pub fn change_ratio(current: f64, previous: f64) -> f64 {
    if previous.abs() < DELTA_ZERO_TOLERANCE {
        if current.abs() > DELTA_ZERO_TOLERANCE {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        (current - previous).abs() / previous.abs()
    }
}

/// Raw (unsigned by position) delta of `leg` from `chain`.
///
/// Strike lookup is exact first, then tolerant to float round-trips.
pub fn resolve_leg_delta(chain: &OptionChain, leg: &OptionLeg) -> Result<f64, HedgeError> {
    let missing = |reason: &str| HedgeError::MissingQuote {
        right: leg.right(),
        strike: leg.strike(),
        reason: reason.to_string(),
    };

    if chain.is_empty() {
        return Err(missing("option chain is empty"));
    }

    let row = chain
        .find_strike(leg.strike())
        .ok_or_else(|| missing("strike not in chain"))?;

    row.quote(leg.right())
        .delta
        .filter(|d| d.is_finite())
        .ok_or_else(|| missing("delta missing"))
}

/// Signed delta per condor leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegDeltas {
    /// Long put.
    pub long_put: f64,
    /// Short put.
    pub short_put: f64,
    /// Short call.
    pub short_call: f64,
    /// Long call.
    pub long_call: f64,
}

impl LegDeltas {
    /// Delta for a role.
    #[must_use]
    pub const fn get(&self, role: LegRole) -> f64 {
        match role {
            LegRole::LongPut => self.long_put,
            LegRole::ShortPut => self.short_put,
            LegRole::ShortCall => self.short_call,
            LegRole::LongCall => self.long_call,
        }
    }

    const fn slot(&mut self, role: LegRole) -> &mut f64 {
        match role {
            LegRole::LongPut => &mut self.long_put,
            LegRole::ShortPut => &mut self.short_put,
            LegRole::ShortCall => &mut self.short_call,
            LegRole::LongCall => &mut self.long_call,
        }
    }

    /// Sum of the four legs, in strike order.
    #[must_use]
    pub fn total(&self) -> f64 {
        LegRole::ALL.iter().map(|role| self.get(*role)).sum()
    }
}

/// Option deltas of a position at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaSnapshot {
    /// Expiry the deltas were read for.
    pub expiry: NaiveDate,
    /// `raw delta * signed quantity` per leg.
    pub per_leg: LegDeltas,
    /// Sum of `per_leg`.
    pub net_option_delta: f64,
}

impl DeltaSnapshot {
    /// Snapshot from already signed leg deltas.
    #[must_use]
    pub fn new(expiry: NaiveDate, per_leg: LegDeltas) -> Self {
        Self {
            expiry,
            per_leg,
            net_option_delta: per_leg.total(),
        }
    }

    /// Resolve every leg of `position` against `chain`.
    ///
    /// Fails on the first leg whose delta cannot be resolved.
    pub fn from_chain(
        position: &IronCondorPosition,
        chain: &OptionChain,
    ) -> Result<Self, HedgeError> {
        let mut per_leg = LegDeltas::default();
        for (role, leg) in position.legs() {
            let raw = resolve_leg_delta(chain, leg)?;
            *per_leg.slot(role) = raw * leg.signed_quantity();
        }
        Ok(Self::new(position.expiry(), per_leg))
    }
}
