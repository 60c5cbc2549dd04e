//! Option Position Value Objects

mod hedge_leg;
mod option_leg;
mod strategy_leg;

pub use hedge_leg::HedgeLeg;
pub use option_leg::{OptionLeg, OptionLegParams, OptionRight, TradeAction};
pub use strategy_leg::{LegInstrument, StrategyLeg, StrategyLegParams};
