//! Iron Condor Position Aggregate
//!
//! Four option legs plus one linear hedge on a single underlying:
//! long put < short put < short call < long call.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::option_position::errors::OptionPositionError;
use crate::domain::option_position::value_objects::{
    HedgeLeg, OptionLeg, OptionRight, StrategyLeg, TradeAction,
};

/// Role of an option leg inside an iron condor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegRole {
    /// Protective put wing.
    LongPut,
    /// Sold put.
    ShortPut,
    /// Sold call.
    ShortCall,
    /// Protective call wing.
    LongCall,
}

impl LegRole {
    /// All roles in strike order.
    pub const ALL: [Self; 4] = [Self::LongPut, Self::ShortPut, Self::ShortCall, Self::LongCall];

    /// The option right a leg in this role must have.
    #[must_use]
    pub const fn expected_right(&self) -> OptionRight {
        match self {
            Self::LongPut | Self::ShortPut => OptionRight::Put,
            Self::ShortCall | Self::LongCall => OptionRight::Call,
        }
    }

    /// Whether the leg in this role is bought or sold.
    #[must_use]
    pub const fn action(&self) -> TradeAction {
        match self {
            Self::LongPut | Self::LongCall => TradeAction::Buy,
            Self::ShortPut | Self::ShortCall => TradeAction::Sell,
        }
    }
}

impl fmt::Display for LegRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LongPut => write!(f, "long_put"),
            Self::ShortPut => write!(f, "short_put"),
            Self::ShortCall => write!(f, "short_call"),
            Self::LongCall => write!(f, "long_call"),
        }
    }
}

/// Raw fields of an iron condor position (file/wire shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IronCondorParams {
    /// Underlying symbol (e.g. "ETH").
    pub underlying: String,
    /// Long put wing.
    pub long_put: OptionLeg,
    /// Short put.
    pub short_put: OptionLeg,
    /// Short call.
    pub short_call: OptionLeg,
    /// Long call wing.
    pub long_call: OptionLeg,
    /// Linear hedge.
    #[serde(alias = "perp_futures")]
    pub hedge: HedgeLeg,
    /// When the position was opened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<DateTime<Utc>>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An executed iron condor with its hedge.
///
/// Construction enforces leg rights and a shared expiry. Strike ordering is
/// checked separately by [`IronCondorPosition::validate_strike_order`] so that
/// manually entered positions are not over-restricted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IronCondorParams", into = "IronCondorParams")]
pub struct IronCondorPosition {
    underlying: String,
    long_put: OptionLeg,
    short_put: OptionLeg,
    short_call: OptionLeg,
    long_call: OptionLeg,
    hedge: HedgeLeg,
    opened_at: Option<DateTime<Utc>>,
    notes: Option<String>,
}

impl IronCondorPosition {
    /// Create a validated iron condor position.
    pub fn new(params: IronCondorParams) -> Result<Self, OptionPositionError> {
        if params.underlying.trim().is_empty() {
            return Err(OptionPositionError::invalid_position(
                "underlying must not be empty",
            ));
        }

        let position = Self {
            underlying: params.underlying.trim().to_ascii_uppercase(),
            long_put: params.long_put,
            short_put: params.short_put,
            short_call: params.short_call,
            long_call: params.long_call,
            hedge: params.hedge,
            opened_at: params.opened_at,
            notes: params.notes,
        };

        for (role, leg) in position.legs() {
            if leg.right() != role.expected_right() {
                return Err(OptionPositionError::invalid_position(format!(
                    "{role} must be a {}, got {}",
                    role.expected_right(),
                    leg.right()
                )));
            }
        }

        let expiry = position.short_put.expiry();
        if let Some((role, leg)) = position
            .legs()
            .into_iter()
            .find(|(_, leg)| leg.expiry() != expiry)
        {
            return Err(OptionPositionError::invalid_position(format!(
                "legs disagree on expiry: short_put={expiry}, {role}={}",
                leg.expiry()
            )));
        }

        Ok(position)
    }

    /// Check `long_put < short_put < short_call < long_call`.
    pub fn validate_strike_order(&self) -> Result<(), OptionPositionError> {
        let strikes = self.legs().map(|(_, leg)| leg.strike());
        if strikes.windows(2).all(|pair| pair[0] < pair[1]) {
            Ok(())
        } else {
            Err(OptionPositionError::invalid_position(format!(
                "strikes must satisfy long_put < short_put < short_call < long_call, got {strikes:?}"
            )))
        }
    }

    /// Get the underlying symbol.
    #[must_use]
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Shared expiry of the option legs.
    #[must_use]
    pub const fn expiry(&self) -> NaiveDate {
        self.short_put.expiry()
    }

    /// Get the leg for a role.
    #[must_use]
    pub const fn leg(&self, role: LegRole) -> &OptionLeg {
        match role {
            LegRole::LongPut => &self.long_put,
            LegRole::ShortPut => &self.short_put,
            LegRole::ShortCall => &self.short_call,
            LegRole::LongCall => &self.long_call,
        }
    }

    /// Option legs in strike order.
    #[must_use]
    pub const fn legs(&self) -> [(LegRole, &OptionLeg); 4] {
        [
            (LegRole::LongPut, &self.long_put),
            (LegRole::ShortPut, &self.short_put),
            (LegRole::ShortCall, &self.short_call),
            (LegRole::LongCall, &self.long_call),
        ]
    }

    /// Get the hedge leg.
    #[must_use]
    pub const fn hedge(&self) -> &HedgeLeg {
        &self.hedge
    }

    /// Replace the hedge leg.
    #[must_use]
    pub fn with_hedge(mut self, hedge: HedgeLeg) -> Self {
        self.hedge = hedge;
        self
    }

    /// Get the open timestamp.
    #[must_use]
    pub const fn opened_at(&self) -> Option<DateTime<Utc>> {
        self.opened_at
    }

    /// Get the notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Net premium received (positive = credit).
    #[must_use]
    pub fn net_credit(&self) -> f64 {
        self.legs()
            .iter()
            .map(|(_, leg)| -leg.signed_quantity() * leg.premium())
            .sum()
    }

    /// Payoff legs: the four options plus the hedge when not flat.
    #[must_use]
    pub fn strategy_legs(&self) -> Vec<StrategyLeg> {
        let mut legs: Vec<StrategyLeg> = self
            .legs()
            .iter()
            .map(|(_, leg)| StrategyLeg::from(*leg))
            .collect();
        if let Some(hedge) = self.hedge.to_strategy_leg() {
            legs.push(hedge);
        }
        legs
    }
}

impl TryFrom<IronCondorParams> for IronCondorPosition {
    type Error = OptionPositionError;

    fn try_from(params: IronCondorParams) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}

impl From<IronCondorPosition> for IronCondorParams {
    fn from(position: IronCondorPosition) -> Self {
        Self {
            underlying: position.underlying,
            long_put: position.long_put,
            short_put: position.short_put,
            short_call: position.short_call,
            long_call: position.long_call,
            hedge: position.hedge,
            opened_at: position.opened_at,
            notes: position.notes,
        }
    }
}
