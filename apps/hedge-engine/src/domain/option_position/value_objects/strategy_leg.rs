//! Strategy Leg Value Object
//!
//! The single leg shape consumed by the payoff engine. Built either from a
//! validated [`OptionLeg`] or from an ad-hoc strategy definition.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{OptionLeg, OptionRight, TradeAction};
use crate::domain::option_position::errors::OptionPositionError;

/// Instrument of a strategy leg.
///
/// Unknown instrument names are preserved as [`LegInstrument::Unsupported`];
/// the payoff engine evaluates such legs to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LegInstrument {
    /// Call option.
    Call,
    /// Put option.
    Put,
    /// Spot/stock position.
    Stock,
    /// Futures or perpetual position.
    Futures,
    /// Any other instrument name.
    Unsupported(String),
}

impl LegInstrument {
    /// Option right for option instruments.
    #[must_use]
    pub const fn option_right(&self) -> Option<OptionRight> {
        match self {
            Self::Call => Some(OptionRight::Call),
            Self::Put => Some(OptionRight::Put),
            _ => None,
        }
    }

    /// Check if this instrument is linear (stock or futures).
    #[must_use]
    pub const fn is_linear(&self) -> bool {
        matches!(self, Self::Stock | Self::Futures)
    }
}

impl From<OptionRight> for LegInstrument {
    fn from(right: OptionRight) -> Self {
        match right {
            OptionRight::Call => Self::Call,
            OptionRight::Put => Self::Put,
        }
    }
}

impl From<String> for LegInstrument {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "call" => Self::Call,
            "put" => Self::Put,
            "stock" => Self::Stock,
            "futures" => Self::Futures,
            _ => Self::Unsupported(value),
        }
    }
}

impl From<LegInstrument> for String {
    fn from(instrument: LegInstrument) -> Self {
        instrument.to_string()
    }
}

impl fmt::Display for LegInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
            Self::Stock => write!(f, "stock"),
            Self::Futures => write!(f, "futures"),
            Self::Unsupported(name) => write!(f, "{name}"),
        }
    }
}

/// Raw fields of a strategy leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLegParams {
    /// Instrument.
    #[serde(rename = "type")]
    pub instrument: LegInstrument,
    /// Buy or sell.
    pub action: TradeAction,
    /// Strike (options only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    /// Option premium, or entry price for linear legs (0 = use spot).
    #[serde(default)]
    pub premium: f64,
    /// Unsigned quantity.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

const fn default_quantity() -> f64 {
    1.0
}

/// Validated payoff leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrategyLegParams", into = "StrategyLegParams")]
pub struct StrategyLeg {
    instrument: LegInstrument,
    action: TradeAction,
    strike: Option<f64>,
    premium: f64,
    quantity: f64,
}

impl StrategyLeg {
    /// Create a validated strategy leg.
    pub fn new(params: StrategyLegParams) -> Result<Self, OptionPositionError> {
        if !params.quantity.is_finite() || params.quantity <= 0.0 {
            return Err(OptionPositionError::invalid_leg(format!(
                "quantity must be > 0, got {}",
                params.quantity
            )));
        }
        if let Some(strike) = params.strike
            && (!strike.is_finite() || strike <= 0.0)
        {
            return Err(OptionPositionError::invalid_leg(format!(
                "strike must be > 0, got {strike}"
            )));
        }
        if !params.premium.is_finite() {
            return Err(OptionPositionError::invalid_leg("premium must be finite"));
        }

        Ok(Self {
            instrument: params.instrument,
            action: params.action,
            strike: params.strike,
            premium: params.premium,
            quantity: params.quantity,
        })
    }

    /// Option leg.
    pub fn option(
        right: OptionRight,
        action: TradeAction,
        strike: f64,
        premium: f64,
        quantity: f64,
    ) -> Result<Self, OptionPositionError> {
        Self::new(StrategyLegParams {
            instrument: right.into(),
            action,
            strike: Some(strike),
            premium,
            quantity,
        })
    }

    /// Futures leg. An entry price of 0 means "enter at spot".
    pub fn futures(
        action: TradeAction,
        entry_price: f64,
        quantity: f64,
    ) -> Result<Self, OptionPositionError> {
        Self::new(StrategyLegParams {
            instrument: LegInstrument::Futures,
            action,
            strike: None,
            premium: entry_price,
            quantity,
        })
    }

    /// Stock leg. An entry price of 0 means "enter at spot".
    pub fn stock(
        action: TradeAction,
        entry_price: f64,
        quantity: f64,
    ) -> Result<Self, OptionPositionError> {
        Self::new(StrategyLegParams {
            instrument: LegInstrument::Stock,
            action,
            strike: None,
            premium: entry_price,
            quantity,
        })
    }

    /// Get the instrument.
    #[must_use]
    pub const fn instrument(&self) -> &LegInstrument {
        &self.instrument
    }

    /// Get the trade action.
    #[must_use]
    pub const fn action(&self) -> TradeAction {
        self.action
    }

    /// Get the strike, if any.
    #[must_use]
    pub const fn strike(&self) -> Option<f64> {
        self.strike
    }

    /// Get the premium (or entry price for linear legs).
    #[must_use]
    pub const fn premium(&self) -> f64 {
        self.premium
    }

    /// Get the unsigned quantity.
    #[must_use]
    pub const fn quantity(&self) -> f64 {
        self.quantity
    }
}

impl From<&OptionLeg> for StrategyLeg {
    fn from(leg: &OptionLeg) -> Self {
        Self {
            instrument: leg.right().into(),
            action: leg.action(),
            strike: Some(leg.strike()),
            premium: leg.premium(),
            quantity: leg.quantity(),
        }
    }
}

impl TryFrom<StrategyLegParams> for StrategyLeg {
    type Error = OptionPositionError;

    fn try_from(params: StrategyLegParams) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}

impl From<StrategyLeg> for StrategyLegParams {
    fn from(leg: StrategyLeg) -> Self {
        Self {
            instrument: leg.instrument,
            action: leg.action,
            strike: leg.strike,
            premium: leg.premium,
            quantity: leg.quantity,
        }
    }
}
