//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - `marketdata/`: Binance options, Paradex perpetuals, FRED rates and an
//!   in-memory store
//! - `scheduler`: wall-clock and manual schedulers

pub mod marketdata;
pub mod scheduler;

pub use marketdata::{
    BinanceOptionsAdapter, FredAdapter, InMemoryMarketData, ParadexAdapter, PerpQuote,
};
pub use scheduler::{ManualScheduler, TokioScheduler};
