//! Market Data Adapters
//!
//! REST implementations of the market data ports:
//!
//! - `binance_options`: option chains from the Binance European options API
//! - `paradex`: perpetual BBO mid as the spot price
//! - `fred`: risk-free rate series
//! - `in_memory`: scripted data for tests and dry runs

mod api_types;
mod binance_options;
mod fred;
mod http;
mod in_memory;
mod paradex;

pub use binance_options::BinanceOptionsAdapter;
pub use fred::FredAdapter;
pub use http::{JsonHttpClient, parse_decimal_str};
pub use in_memory::InMemoryMarketData;
pub use paradex::{ParadexAdapter, PerpQuote};
