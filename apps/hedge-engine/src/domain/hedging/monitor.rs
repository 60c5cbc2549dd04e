//! Hedge Monitor Domain Service
//!
//! Pure transition function of the delta-hedge monitor. The caller owns the
//! [`HedgeState`], supplies one [`Observation`] per cycle and receives the
//! next state, a [`CycleRecord`] and an optional [`RebalanceAlert`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    DeltaSnapshot, HedgeError, HedgeState, LegDeltas, MonitorPhase, MonitorPolicy, change_ratio,
};

/// Direction of a hedge adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RebalanceDirection {
    /// Increase the hedge position.
    Buy,
    /// Decrease the hedge position.
    Sell,
}

impl RebalanceDirection {
    /// Direction for a signed rebalance quantity (`> 0` buys).
    #[must_use]
    pub fn from_quantity(qty: f64) -> Self {
        if qty > 0.0 { Self::Buy } else { Self::Sell }
    }
}

impl fmt::Display for RebalanceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Recommendation emitted when the delta drift crosses the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebalanceAlert {
    /// Cycle that produced the alert.
    pub cycle: u64,
    /// Net option delta observed.
    pub net_option_delta: f64,
    /// Relative change against the previous cycle.
    pub change_ratio: f64,
    /// Hedge quantity that neutralizes the option delta.
    pub target_hedge_qty: f64,
    /// `target_hedge_qty - current_hedge_qty` (signed).
    pub rebalance_qty: f64,
    /// Trade direction.
    pub direction: RebalanceDirection,
}

impl RebalanceAlert {
    /// Unsigned quantity to trade.
    #[must_use]
    pub fn quantity(&self) -> f64 {
        self.rebalance_qty.abs()
    }
}

/// What a cycle managed to observe.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Deltas were resolved for every leg.
    Snapshot(DeltaSnapshot),
    /// Data could not be obtained; the cycle is a no-op.
    Failed(HedgeError),
}

/// Result of one monitor cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// When the cycle ran.
    pub timestamp: DateTime<Utc>,
    /// Cycle number (1-based).
    pub cycle: u64,
    /// Position expiry.
    pub expiry: NaiveDate,
    /// Phase after the cycle.
    pub phase: MonitorPhase,
    /// Signed delta per leg; `None` on a failed cycle.
    pub per_leg_signed_delta: Option<LegDeltas>,
    /// Net option delta; `None` on a failed cycle.
    pub net_option_delta: Option<f64>,
    /// Option delta plus hedge quantity held during the cycle.
    pub portfolio_delta: Option<f64>,
    /// Change against the previous baseline; `None` when no comparison ran.
    pub change_ratio: Option<f64>,
    /// Threshold was crossed.
    pub alert: bool,
    /// Suggested hedge trade direction.
    pub suggested_action: Option<RebalanceDirection>,
    /// Suggested unsigned hedge trade size.
    pub suggested_qty: Option<f64>,
    /// Tracked hedge quantity after the cycle.
    pub hedge_qty_after: f64,
    /// Latest risk-free rate (decimal), if one was fetched.
    pub risk_free_rate: Option<f64>,
    /// Why the cycle failed or what went wrong on the side.
    pub error: Option<String>,
}

impl CycleRecord {
    /// Attach the risk-free rate fetched for this cycle.
    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: Option<f64>) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Attach a non-fatal note (e.g. rate lookup failure) without
    /// overwriting an existing failure reason.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        if self.error.is_none() {
            self.error = Some(note.into());
        }
        self
    }

    /// Check if the cycle failed to observe deltas.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.net_option_delta.is_none()
    }
}

/// Next state plus the cycle's outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// State to feed into the next cycle.
    pub state: HedgeState,
    /// Record of the cycle.
    pub record: CycleRecord,
    /// Rebalance recommendation, if the threshold was crossed.
    pub alert: Option<RebalanceAlert>,
}

/// Stateless delta-hedge decision logic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HedgeMonitor {
    policy: MonitorPolicy,
}

impl HedgeMonitor {
    /// Create a monitor for a policy.
    #[must_use]
    pub const fn new(policy: MonitorPolicy) -> Self {
        Self { policy }
    }

    /// Policy in use.
    #[must_use]
    pub const fn policy(&self) -> &MonitorPolicy {
        &self.policy
    }

    /// Advance the monitor by one cycle.
    ///
    /// A failed observation still consumes a cycle but leaves the baseline,
    /// hedge quantity and phase untouched. Once the cycle count reaches
    /// `max_cycles` the returned state is `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns [`HedgeError::Stopped`] when `state` is already terminal.
    pub fn step(
        &self,
        state: &HedgeState,
        expiry: NaiveDate,
        timestamp: DateTime<Utc>,
        observation: Observation,
    ) -> Result<StepOutcome, HedgeError> {
        if state.is_stopped() {
            return Err(HedgeError::Stopped {
                cycles: state.cycle,
            });
        }

        let mut next = *state;
        next.cycle += 1;

        let (record, alert) = match observation {
            Observation::Failed(err) => {
                let record = CycleRecord {
                    timestamp,
                    cycle: next.cycle,
                    expiry,
                    phase: next.phase,
                    per_leg_signed_delta: None,
                    net_option_delta: None,
                    portfolio_delta: None,
                    change_ratio: None,
                    alert: false,
                    suggested_action: None,
                    suggested_qty: None,
                    hedge_qty_after: next.current_hedge_qty,
                    risk_free_rate: None,
                    error: Some(err.to_string()),
                };
                (record, None)
            }
            Observation::Snapshot(snapshot) => self.apply_snapshot(&mut next, timestamp, &snapshot),
        };

        if self
            .policy
            .max_cycles
            .is_some_and(|max| next.cycle >= max)
        {
            next = next.stop();
        }

        Ok(StepOutcome {
            record: CycleRecord {
                phase: next.phase,
                ..record
            },
            state: next,
            alert,
        })
    }

    fn apply_snapshot(
        &self,
        next: &mut HedgeState,
        timestamp: DateTime<Utc>,
        snapshot: &DeltaSnapshot,
    ) -> (CycleRecord, Option<RebalanceAlert>) {
        let net = snapshot.net_option_delta;
        let portfolio_delta = net + next.current_hedge_qty;

        let (ratio, alert) = match next.previous_net_delta {
            None => {
                next.phase = MonitorPhase::BaselineSet;
                (None, None)
            }
            Some(previous) => {
                next.phase = MonitorPhase::Monitoring;
                let ratio = change_ratio(net, previous);
                let alert = (ratio > self.policy.delta_change_threshold).then(|| {
                    let target_hedge_qty = -net;
                    let rebalance_qty = target_hedge_qty - next.current_hedge_qty;
                    RebalanceAlert {
                        cycle: next.cycle,
                        net_option_delta: net,
                        change_ratio: ratio,
                        target_hedge_qty,
                        rebalance_qty,
                        direction: RebalanceDirection::from_quantity(rebalance_qty),
                    }
                });
                (Some(ratio), alert)
            }
        };

        if let Some(alert) = &alert
            && self.policy.assume_rebalance_executed
        {
            next.current_hedge_qty = alert.target_hedge_qty;
        }
        next.previous_net_delta = Some(net);

        let record = CycleRecord {
            timestamp,
            cycle: next.cycle,
            expiry: snapshot.expiry,
            phase: next.phase,
            per_leg_signed_delta: Some(snapshot.per_leg),
            net_option_delta: Some(net),
            portfolio_delta: Some(portfolio_delta),
            change_ratio: ratio,
            alert: alert.is_some(),
            suggested_action: alert.map(|a| a.direction),
            suggested_qty: alert.map(|a| a.quantity()),
            hedge_qty_after: next.current_hedge_qty,
            risk_free_rate: None,
            error: None,
        };
        (record, alert)
    }
}
