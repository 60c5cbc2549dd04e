//! Common multi-leg strategy definitions for payoff evaluation.

use crate::domain::option_position::{OptionPositionError, OptionRight, StrategyLeg, TradeAction};

/// Strike and premium of one option leg in a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeQuote {
    /// Strike price.
    pub strike: f64,
    /// Premium per unit.
    pub premium: f64,
}

impl StrikeQuote {
    /// Create a strike/premium pair.
    #[must_use]
    pub const fn new(strike: f64, premium: f64) -> Self {
        Self { strike, premium }
    }
}

/// Long call butterfly: buy lower, sell 2x middle, buy upper.
pub fn long_call_butterfly(
    lower: StrikeQuote,
    middle: StrikeQuote,
    upper: StrikeQuote,
    quantity: f64,
) -> Result<Vec<StrategyLeg>, OptionPositionError> {
    ordered(&[lower.strike, middle.strike, upper.strike])?;
    Ok(vec![
        option(OptionRight::Call, TradeAction::Buy, lower, quantity)?,
        option(OptionRight::Call, TradeAction::Sell, middle, 2.0 * quantity)?,
        option(OptionRight::Call, TradeAction::Buy, upper, quantity)?,
    ])
}

/// Short iron condor: buy put wing, sell put, sell call, buy call wing.
pub fn iron_condor(
    long_put: StrikeQuote,
    short_put: StrikeQuote,
    short_call: StrikeQuote,
    long_call: StrikeQuote,
    quantity: f64,
) -> Result<Vec<StrategyLeg>, OptionPositionError> {
    ordered(&[
        long_put.strike,
        short_put.strike,
        short_call.strike,
        long_call.strike,
    ])?;
    Ok(vec![
        option(OptionRight::Put, TradeAction::Buy, long_put, quantity)?,
        option(OptionRight::Put, TradeAction::Sell, short_put, quantity)?,
        option(OptionRight::Call, TradeAction::Sell, short_call, quantity)?,
        option(OptionRight::Call, TradeAction::Buy, long_call, quantity)?,
    ])
}

/// Call ratio spread: buy one lower call, sell `ratio` higher calls.
pub fn call_ratio_spread(
    long: StrikeQuote,
    short: StrikeQuote,
    ratio: f64,
) -> Result<Vec<StrategyLeg>, OptionPositionError> {
    ordered(&[long.strike, short.strike])?;
    Ok(vec![
        option(OptionRight::Call, TradeAction::Buy, long, 1.0)?,
        option(OptionRight::Call, TradeAction::Sell, short, ratio)?,
    ])
}

/// Long straddle with an optional futures delta hedge.
///
/// `hedge_quantity` is signed; zero adds no hedge leg. The hedge enters at
/// spot.
pub fn long_straddle(
    strike: f64,
    call_premium: f64,
    put_premium: f64,
    quantity: f64,
    hedge_quantity: f64,
) -> Result<Vec<StrategyLeg>, OptionPositionError> {
    let mut legs = vec![
        StrategyLeg::option(OptionRight::Call, TradeAction::Buy, strike, call_premium, quantity)?,
        StrategyLeg::option(OptionRight::Put, TradeAction::Buy, strike, put_premium, quantity)?,
    ];
    if hedge_quantity != 0.0 {
        let action = if hedge_quantity > 0.0 {
            TradeAction::Buy
        } else {
            TradeAction::Sell
        };
        legs.push(StrategyLeg::futures(action, 0.0, hedge_quantity.abs())?);
    }
    Ok(legs)
}

fn option(
    right: OptionRight,
    action: TradeAction,
    quote: StrikeQuote,
    quantity: f64,
) -> Result<StrategyLeg, OptionPositionError> {
    StrategyLeg::option(right, action, quote.strike, quote.premium, quantity)
}

fn ordered(strikes: &[f64]) -> Result<(), OptionPositionError> {
    if strikes.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(OptionPositionError::invalid_position(format!(
            "strikes must be strictly increasing, got {strikes:?}"
        )))
    }
}
