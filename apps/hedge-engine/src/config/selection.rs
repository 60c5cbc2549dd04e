//! Iron condor selection targets.

use serde::{Deserialize, Serialize};

use crate::domain::strike_selection::CondorTargets;

/// Delta targets and size used when building a condor from a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Target |delta| of the sold call.
    #[serde(default = "default_short_delta")]
    pub short_call_delta: f64,
    /// Target |delta| of the call wing.
    #[serde(default = "default_long_delta")]
    pub long_call_delta: f64,
    /// Target |delta| of the sold put.
    #[serde(default = "default_short_delta")]
    pub short_put_delta: f64,
    /// Target |delta| of the put wing.
    #[serde(default = "default_long_delta")]
    pub long_put_delta: f64,
    /// Contracts per leg.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            short_call_delta: default_short_delta(),
            long_call_delta: default_long_delta(),
            short_put_delta: default_short_delta(),
            long_put_delta: default_long_delta(),
            quantity: default_quantity(),
        }
    }
}

impl SelectionConfig {
    /// Targets for the strike selector.
    #[must_use]
    pub const fn targets(&self) -> CondorTargets {
        CondorTargets {
            short_put: self.short_put_delta,
            long_put: self.long_put_delta,
            short_call: self.short_call_delta,
            long_call: self.long_call_delta,
        }
    }
}

const fn default_short_delta() -> f64 {
    0.20
}

const fn default_long_delta() -> f64 {
    0.05
}

const fn default_quantity() -> f64 {
    1.0
}
