//! Application Ports (Driven)
//!
//! Ports define how the application reaches external systems. The
//! infrastructure layer provides the implementations.

mod market_data_port;
mod scheduler_port;

pub use market_data_port::{
    ChainsByExpiry, MarketDataError, OptionChainPort, RatePoint, RiskFreeRate, RiskFreeRatePort,
    SpotPricePort, latest_risk_free_rate,
};
#[cfg(test)]
pub use market_data_port::{MockOptionChainPort, MockRiskFreeRatePort, MockSpotPricePort};
#[cfg(test)]
pub use scheduler_port::MockSchedulerPort;
pub use scheduler_port::SchedulerPort;
