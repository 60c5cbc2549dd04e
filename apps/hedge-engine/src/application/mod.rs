//! Application Layer
//!
//! The application layer orchestrates domain logic. It defines:
//!
//! - **Ports**: Interfaces for market data and the clock/scheduler
//! - **Services**: The long-running hedge monitor loop
//! - **Use Cases**: One-shot iron condor construction and straddle evaluation

pub mod ports;
pub mod services;
pub mod use_cases;

pub use ports::*;
pub use services::*;
pub use use_cases::*;
