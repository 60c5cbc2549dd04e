//! Option Position Aggregates

mod iron_condor;

pub use iron_condor::{IronCondorParams, IronCondorPosition, LegRole};
