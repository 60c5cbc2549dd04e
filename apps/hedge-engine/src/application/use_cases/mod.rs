//! Application Use Cases
//!
//! One-shot computations that orchestrate domain logic over the market data
//! ports.

mod build_iron_condor;
mod evaluate_straddle;
mod market_inputs;

pub use build_iron_condor::{
    BuildIronCondorRequest, BuildIronCondorResponse, BuildIronCondorUseCase, CondorRisk,
};
pub use evaluate_straddle::{
    EvaluateStraddleRequest, EvaluateStraddleResponse, EvaluateStraddleUseCase, StraddleLegQuote,
};
pub use market_inputs::{RateLookup, RateSource, ResolvedRate, choose_chain};
