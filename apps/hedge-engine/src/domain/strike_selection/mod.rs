//! Strike Selection Bounded Context
//!
//! Option chain snapshots and the delta-targeted strike picking used to
//! construct iron condors.

mod chain;
mod condor;
mod errors;
mod selector;

pub use chain::{ChainRow, OptionChain, STRIKE_MATCH_TOLERANCE, SideQuote};
pub use condor::{CondorSelection, CondorTargets, select_iron_condor};
pub use errors::SelectionError;
pub use selector::StrikeSelector;
