//! Application Services
//!
//! Application services coordinate domain logic and infrastructure adapters.
//! They differ from use cases in that they run as long-lived loops.

mod hedge_monitor;

pub use hedge_monitor::{HedgeMonitorService, MonitorSummary};
