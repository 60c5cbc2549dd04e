//! Evaluate Straddle Use Case
//!
//! Gamma-scalping entry check: buy the ATM call and put at the ask, neutralize
//! the combined delta with the perpetual, and report the terminal PnL of the
//! hedged straddle.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::market_inputs::{RateLookup, ResolvedRate, choose_chain};
use crate::application::ports::{OptionChainPort, RiskFreeRatePort, SpotPricePort};
use crate::config::PricingConfig;
use crate::domain::hedging::{DELTA_ZERO_TOLERANCE, HedgeError, RebalanceDirection};
use crate::domain::option_position::{OptionRight, StrategyLeg};
use crate::domain::payoff::templates::long_straddle;
use crate::domain::payoff::{PnlResult, compute_pnl};
use crate::domain::pricing::{GreeksResult, ResolvedVol, price_option, year_fraction};
use crate::domain::strike_selection::{ChainRow, SelectionError, StrikeSelector};
use crate::error::EngineError;

/// Request to evaluate a hedged long straddle.
#[derive(Debug, Clone)]
pub struct EvaluateStraddleRequest {
    /// Options underlying (e.g. "ETH").
    pub underlying: String,
    /// Perpetual used for spot and the hedge (e.g. "ETH-USD-PERP").
    pub hedge_symbol: String,
    /// Expiry to trade; the earliest listed expiry when `None`.
    pub expiry: Option<NaiveDate>,
    /// Date used for time to expiry.
    pub evaluation_date: NaiveDate,
    /// Contracts per option leg.
    pub quantity: f64,
}

impl EvaluateStraddleRequest {
    /// Request for one contract per leg hedged with `{underlying}-USD-PERP`.
    #[must_use]
    pub fn new(underlying: impl Into<String>, evaluation_date: NaiveDate) -> Self {
        let underlying = underlying.into().trim().to_ascii_uppercase();
        Self {
            hedge_symbol: format!("{underlying}-USD-PERP"),
            underlying,
            expiry: None,
            evaluation_date,
            quantity: 1.0,
        }
    }

    /// Restrict to one expiry.
    #[must_use]
    pub const fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }
}

/// One priced straddle leg.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StraddleLegQuote {
    /// Ask premium paid.
    pub premium: f64,
    /// Volatility used for the Greeks.
    pub volatility: f64,
    /// Whether the volatility fallback was applied.
    pub volatility_substituted: bool,
    /// Per-unit price and Greeks.
    pub greeks: GreeksResult,
}

/// Response from evaluating a straddle.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateStraddleResponse {
    /// Perpetual mid used as spot.
    pub spot: f64,
    /// Expiry evaluated.
    pub expiry: NaiveDate,
    /// Strike closest to spot.
    pub strike: f64,
    /// Rate used for the Greeks.
    pub risk_free_rate: ResolvedRate,
    /// Call leg.
    pub call: StraddleLegQuote,
    /// Put leg.
    pub put: StraddleLegQuote,
    /// Delta of the option legs (quantity-scaled).
    pub net_delta: f64,
    /// Gamma of the option legs (quantity-scaled).
    pub net_gamma: f64,
    /// Signed perpetual quantity that neutralizes `net_delta`.
    pub hedge_qty: f64,
    /// Legs evaluated for PnL (call, put, and the hedge when non-zero).
    pub legs: Vec<StrategyLeg>,
    /// Terminal PnL over the configured grid.
    pub pnl: PnlResult,
}

impl EvaluateStraddleResponse {
    /// Direction of the hedge trade, `None` when already neutral.
    #[must_use]
    pub fn hedge_direction(&self) -> Option<RebalanceDirection> {
        (self.hedge_qty.abs() >= DELTA_ZERO_TOLERANCE)
            .then(|| RebalanceDirection::from_quantity(self.hedge_qty))
    }
}

/// Use case for evaluating a delta-hedged ATM straddle.
pub struct EvaluateStraddleUseCase<P, C, R>
where
    P: SpotPricePort,
    C: OptionChainPort,
    R: RiskFreeRatePort,
{
    spot_port: Arc<P>,
    chain_port: Arc<C>,
    rate_port: Arc<R>,
    pricing: PricingConfig,
    rate_lookup: RateLookup,
}

impl<P, C, R> EvaluateStraddleUseCase<P, C, R>
where
    P: SpotPricePort,
    C: OptionChainPort,
    R: RiskFreeRatePort,
{
    /// Create a new use case.
    #[must_use]
    pub const fn new(
        spot_port: Arc<P>,
        chain_port: Arc<C>,
        rate_port: Arc<R>,
        pricing: PricingConfig,
        rate_lookup: RateLookup,
    ) -> Self {
        Self {
            spot_port,
            chain_port,
            rate_port,
            pricing,
            rate_lookup,
        }
    }

    /// Evaluate the straddle.
    ///
    /// # Errors
    ///
    /// - `MarketData` if spot or the chain cannot be fetched, or the expiry
    ///   is absent
    /// - `Hedge(MissingQuote)` if the ATM row has no ask on either side
    /// - `Pricing` / `Position` on invalid inputs
    pub async fn execute(
        &self,
        request: EvaluateStraddleRequest,
    ) -> Result<EvaluateStraddleResponse, EngineError> {
        let spot = self.spot_port.get_spot_price(&request.hedge_symbol).await?;
        tracing::info!(symbol = %request.hedge_symbol, spot, "Fetched perpetual mid");

        let risk_free_rate = self
            .rate_lookup
            .resolve(self.rate_port.as_ref(), request.evaluation_date)
            .await;

        let chains = self
            .chain_port
            .get_option_chain(&request.underlying, request.expiry)
            .await?;
        let chain = choose_chain(chains, request.expiry)?;
        let expiry = chain.expiry;

        let row = StrikeSelector::select_atm(&chain, spot).ok_or_else(|| {
            SelectionError::NotFound {
                leg: "atm_straddle".to_string(),
            }
        })?;
        let t_years = year_fraction(request.evaluation_date, expiry);

        let call = self.price_side(row, OptionRight::Call, spot, t_years, risk_free_rate.rate)?;
        let put = self.price_side(row, OptionRight::Put, spot, t_years, risk_free_rate.rate)?;

        let net_delta = (call.greeks.delta + put.greeks.delta) * request.quantity;
        let net_gamma = (call.greeks.gamma + put.greeks.gamma) * request.quantity;
        let hedge_qty = -net_delta;

        let legs = long_straddle(
            row.strike,
            call.premium,
            put.premium,
            request.quantity,
            hedge_qty,
        )?;
        let grid = self.pricing.price_grid(spot);
        let pnl = compute_pnl(&legs, spot, Some(&grid));

        tracing::info!(
            underlying = %request.underlying,
            expiry = %expiry,
            strike = row.strike,
            spot,
            call_ask = call.premium,
            put_ask = put.premium,
            net_delta,
            net_gamma,
            hedge_qty,
            risk_free_rate = risk_free_rate.rate,
            "Evaluated hedged straddle"
        );

        Ok(EvaluateStraddleResponse {
            spot,
            expiry,
            strike: row.strike,
            risk_free_rate,
            call,
            put,
            net_delta,
            net_gamma,
            hedge_qty,
            legs,
            pnl,
        })
    }

    fn price_side(
        &self,
        row: &ChainRow,
        right: OptionRight,
        spot: f64,
        t_years: f64,
        rate: f64,
    ) -> Result<StraddleLegQuote, EngineError> {
        let quote = row.quote(right);
        let premium = quote.ask.ok_or_else(|| HedgeError::MissingQuote {
            right,
            strike: row.strike,
            reason: "ask missing".to_string(),
        })?;

        let ResolvedVol { value, substituted } =
            self.pricing.volatility_policy().resolve(quote.ask_iv);
        if substituted {
            tracing::warn!(
                right = %right,
                strike = row.strike,
                fallback = value,
                "Ask IV missing; using fallback"
            );
        }

        let greeks = price_option(spot, row.strike, t_years, rate, value, right)?;
        Ok(StraddleLegQuote {
            premium,
            volatility: value,
            volatility_substituted: substituted,
            greeks,
        })
    }
}
