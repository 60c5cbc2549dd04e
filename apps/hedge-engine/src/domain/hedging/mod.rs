//! Hedging Bounded Context
//!
//! Delta snapshots of an iron condor and the pure state machine that turns
//! successive snapshots into hedge rebalance recommendations.

pub mod errors;
mod monitor;
mod snapshot;
mod state;

pub use errors::HedgeError;
pub use monitor::{
    CycleRecord, HedgeMonitor, Observation, RebalanceAlert, RebalanceDirection, StepOutcome,
};
pub use snapshot::{
    DELTA_ZERO_TOLERANCE, DeltaSnapshot, LegDeltas, change_ratio, resolve_leg_delta,
};
pub use state::{HedgeState, MonitorPhase, MonitorPolicy};
