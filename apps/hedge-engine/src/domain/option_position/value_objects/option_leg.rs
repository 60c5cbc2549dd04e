//! Option Leg Value Object

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::option_position::errors::OptionPositionError;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    /// Call option (right to buy).
    #[serde(alias = "CALL", alias = "Call")]
    Call,
    /// Put option (right to sell).
    #[serde(alias = "PUT", alias = "Put")]
    Put,
}

impl OptionRight {
    /// Check if this is a call.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call)
    }
}

impl fmt::Display for OptionRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

impl FromStr for OptionRight {
    type Err = OptionPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            _ => Err(OptionPositionError::UnknownValue {
                field: "option right",
                value: s.to_string(),
            }),
        }
    }
}

/// Trade direction of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    /// Bought (long exposure).
    #[serde(alias = "BUY", alias = "Buy")]
    Buy,
    /// Sold/written (short exposure).
    #[serde(alias = "SELL", alias = "Sell")]
    Sell,
}

impl TradeAction {
    /// Returns the exposure sign.
    ///
    /// Buy = +1, Sell = -1
    #[must_use]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for TradeAction {
    type Err = OptionPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(OptionPositionError::UnknownValue {
                field: "trade action",
                value: s.to_string(),
            }),
        }
    }
}

/// Raw, unvalidated fields of an option leg.
///
/// Used as the deserialization shape and as the argument to
/// [`OptionLeg::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionLegParams {
    /// Call or put.
    #[serde(alias = "option_type")]
    pub right: OptionRight,
    /// Buy or sell.
    pub action: TradeAction,
    /// Strike price.
    pub strike: f64,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Executed premium per unit.
    #[serde(alias = "fill_price")]
    pub premium: f64,
    /// Implied volatility as a decimal (0.55 = 55%).
    #[serde(alias = "iv")]
    pub implied_vol: f64,
    /// Annualized risk-free rate as a decimal.
    #[serde(alias = "rf")]
    pub risk_free_rate: f64,
    /// Unsigned number of contracts.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

const fn default_quantity() -> f64 {
    1.0
}

/// One validated option leg of a position.
///
/// Invariants: `quantity > 0`, `strike > 0`, all numeric fields finite,
/// `implied_vol >= 0` (zero means "unknown"; callers apply their own fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionLegParams", into = "OptionLegParams")]
pub struct OptionLeg {
    right: OptionRight,
    action: TradeAction,
    strike: f64,
    expiry: NaiveDate,
    premium: f64,
    implied_vol: f64,
    risk_free_rate: f64,
    quantity: f64,
}

impl OptionLeg {
    /// Create a validated option leg.
    pub fn new(params: OptionLegParams) -> Result<Self, OptionPositionError> {
        if !params.quantity.is_finite() || params.quantity <= 0.0 {
            return Err(OptionPositionError::invalid_leg(format!(
                "quantity must be > 0, got {}",
                params.quantity
            )));
        }
        if !params.strike.is_finite() || params.strike <= 0.0 {
            return Err(OptionPositionError::invalid_leg(format!(
                "strike must be > 0, got {}",
                params.strike
            )));
        }
        if !params.premium.is_finite() || !params.risk_free_rate.is_finite() {
            return Err(OptionPositionError::invalid_leg(
                "premium and risk_free_rate must be finite",
            ));
        }
        if !params.implied_vol.is_finite() || params.implied_vol < 0.0 {
            return Err(OptionPositionError::invalid_leg(format!(
                "implied_vol must be >= 0, got {}",
                params.implied_vol
            )));
        }

        Ok(Self {
            right: params.right,
            action: params.action,
            strike: params.strike,
            expiry: params.expiry,
            premium: params.premium,
            implied_vol: params.implied_vol,
            risk_free_rate: params.risk_free_rate,
            quantity: params.quantity,
        })
    }

    /// Get the option right.
    #[must_use]
    pub const fn right(&self) -> OptionRight {
        self.right
    }

    /// Get the trade action.
    #[must_use]
    pub const fn action(&self) -> TradeAction {
        self.action
    }

    /// Get the strike.
    #[must_use]
    pub const fn strike(&self) -> f64 {
        self.strike
    }

    /// Get the expiry date.
    #[must_use]
    pub const fn expiry(&self) -> NaiveDate {
        self.expiry
    }

    /// Get the executed premium.
    #[must_use]
    pub const fn premium(&self) -> f64 {
        self.premium
    }

    /// Get the implied volatility.
    #[must_use]
    pub const fn implied_vol(&self) -> f64 {
        self.implied_vol
    }

    /// Get the risk-free rate.
    #[must_use]
    pub const fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Get the unsigned quantity.
    #[must_use]
    pub const fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Get signed quantity (positive for buy, negative for sell).
    #[must_use]
    pub fn signed_quantity(&self) -> f64 {
        self.quantity * self.action.sign()
    }
}

impl TryFrom<OptionLegParams> for OptionLeg {
    type Error = OptionPositionError;

    fn try_from(params: OptionLegParams) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}

impl From<OptionLeg> for OptionLegParams {
    fn from(leg: OptionLeg) -> Self {
        Self {
            right: leg.right,
            action: leg.action,
            strike: leg.strike,
            expiry: leg.expiry,
            premium: leg.premium,
            implied_vol: leg.implied_vol,
            risk_free_rate: leg.risk_free_rate,
            quantity: leg.quantity,
        }
    }
}
