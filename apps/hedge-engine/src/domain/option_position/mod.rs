//! Option Position Bounded Context
//!
//! Validated option legs, the linear hedge leg, the payoff leg shape and the
//! iron condor aggregate monitored by the hedging context.

pub mod aggregate;
pub mod errors;
pub mod value_objects;

pub use aggregate::{IronCondorParams, IronCondorPosition, LegRole};
pub use errors::OptionPositionError;
pub use value_objects::{
    HedgeLeg, LegInstrument, OptionLeg, OptionLegParams, OptionRight, StrategyLeg,
    StrategyLegParams, TradeAction,
};
