//! Hedge monitor state and policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a hedge monitor.
///
/// ```text
/// Init ──(first snapshot)──► BaselineSet ──(next snapshot)──► Monitoring
///   │                            │                               │
///   └────────────(max cycles / stop)─────────────────────────────┴──► Stopped
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorPhase {
    /// No baseline delta yet.
    #[default]
    Init,
    /// One successful cycle recorded.
    BaselineSet,
    /// Steady-state comparison loop.
    Monitoring,
    /// Terminal.
    Stopped,
}

impl MonitorPhase {
    /// Check if this is the terminal phase.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for MonitorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::BaselineSet => write!(f, "baseline_set"),
            Self::Monitoring => write!(f, "monitoring"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Decision parameters of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorPolicy {
    /// Relative delta change that triggers a rebalance.
    pub delta_change_threshold: f64,
    /// Stop after this many cycles (failed cycles included).
    pub max_cycles: Option<u64>,
    /// Treat every recommendation as filled when tracking hedge quantity.
    pub assume_rebalance_executed: bool,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            delta_change_threshold: 0.20,
            max_cycles: None,
            assume_rebalance_executed: true,
        }
    }
}

/// Everything the monitor carries between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeState {
    /// Current phase.
    pub phase: MonitorPhase,
    /// Cycles attempted so far, failed ones included.
    pub cycle: u64,
    /// Net option delta of the last successful cycle.
    pub previous_net_delta: Option<f64>,
    /// Signed hedge quantity currently held.
    pub current_hedge_qty: f64,
}

impl HedgeState {
    /// Fresh state holding `initial_hedge_qty` of the hedge instrument.
    #[must_use]
    pub const fn new(initial_hedge_qty: f64) -> Self {
        Self {
            phase: MonitorPhase::Init,
            cycle: 0,
            previous_net_delta: None,
            current_hedge_qty: initial_hedge_qty,
        }
    }

    /// Move to `Stopped` from any phase.
    #[must_use]
    pub const fn stop(mut self) -> Self {
        self.phase = MonitorPhase::Stopped;
        self
    }

    /// Check if the monitor has stopped.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.phase.is_terminal()
    }
}
