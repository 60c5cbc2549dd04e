//! Build Iron Condor Use Case
//!
//! Selects four strikes by target delta from a live chain, prices each leg
//! off the quote (sold legs at the bid, bought legs at the ask), resolves
//! implied volatility through the fallback policy and attaches the latest
//! risk-free rate. The result is a validated [`IronCondorPosition`] with a
//! flat hedge, ready to be handed to the hedge monitor.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::market_inputs::{RateLookup, ResolvedRate, choose_chain};
use crate::application::ports::{OptionChainPort, RiskFreeRatePort};
use crate::config::{PricingConfig, SelectionConfig};
use crate::domain::option_position::{
    HedgeLeg, IronCondorParams, IronCondorPosition, LegRole, OptionLeg, OptionLegParams,
    TradeAction,
};
use crate::domain::payoff::{PnlResult, compute_pnl};
use crate::domain::pricing::{GreeksResult, VolatilityPolicy, aggregate_greeks, price_leg};
use crate::domain::strike_selection::{
    ChainRow, CondorSelection, CondorTargets, SelectionError, select_iron_condor,
};
use crate::error::EngineError;

/// Request to build an iron condor.
#[derive(Debug, Clone)]
pub struct BuildIronCondorRequest {
    /// Underlying (e.g. "ETH").
    pub underlying: String,
    /// Expiry to trade; the earliest listed expiry when `None`.
    pub expiry: Option<NaiveDate>,
    /// Symbol of the linear hedge instrument.
    pub hedge_symbol: String,
    /// Date used for time to expiry.
    pub evaluation_date: NaiveDate,
    /// When set, Greeks and a terminal PnL curve are computed at this spot.
    pub spot: Option<f64>,
}

/// Risk view of the built position at a given spot.
#[derive(Debug, Clone, Serialize)]
pub struct CondorRisk {
    /// Spot the view was computed at.
    pub spot: f64,
    /// Position-scaled Greeks summed over the four legs.
    pub greeks: GreeksResult,
    /// Terminal PnL over the configured grid.
    pub pnl: PnlResult,
}

/// Response from building an iron condor.
#[derive(Debug, Clone)]
pub struct BuildIronCondorResponse {
    /// The validated position with a flat hedge.
    pub position: IronCondorPosition,
    /// Chain rows used for each leg.
    pub selection: CondorSelection,
    /// Rate attached to every leg.
    pub risk_free_rate: ResolvedRate,
    /// Legs priced with the fallback volatility.
    pub substituted_vols: Vec<LegRole>,
    /// Greeks and PnL when a spot was supplied.
    pub risk: Option<CondorRisk>,
}

/// Use case for building an iron condor from market data.
pub struct BuildIronCondorUseCase<C, R>
where
    C: OptionChainPort,
    R: RiskFreeRatePort,
{
    chain_port: Arc<C>,
    rate_port: Arc<R>,
    targets: CondorTargets,
    quantity: f64,
    pricing: PricingConfig,
    rate_lookup: RateLookup,
}

impl<C, R> BuildIronCondorUseCase<C, R>
where
    C: OptionChainPort,
    R: RiskFreeRatePort,
{
    /// Create a new use case.
    #[must_use]
    pub fn new(
        chain_port: Arc<C>,
        rate_port: Arc<R>,
        selection: &SelectionConfig,
        pricing: PricingConfig,
        rate_lookup: RateLookup,
    ) -> Self {
        Self {
            chain_port,
            rate_port,
            targets: selection.targets(),
            quantity: selection.quantity,
            pricing,
            rate_lookup,
        }
    }

    /// Build the position.
    ///
    /// # Errors
    ///
    /// - `MarketData` if the chain cannot be fetched or the expiry is absent
    /// - `Selection` if a leg has no quoted strike, or the wing correction
    ///   could not restore `long_put < short_put < short_call < long_call`
    /// - `Position` / `Pricing` if the resulting legs are invalid
    pub async fn execute(
        &self,
        request: BuildIronCondorRequest,
    ) -> Result<BuildIronCondorResponse, EngineError> {
        let chains = self
            .chain_port
            .get_option_chain(&request.underlying, request.expiry)
            .await?;
        let chain = choose_chain(chains, request.expiry)?;
        let expiry = chain.expiry;

        let selection = select_iron_condor(&chain, &self.targets)?;
        if !selection.corrected.is_empty() {
            tracing::info!(
                underlying = %request.underlying,
                corrected = ?selection.corrected,
                "Re-selected condor wings outside the short strikes"
            );
        }
        if !selection.is_well_ordered() {
            return Err(SelectionError::InvalidStructure {
                message: format!(
                    "strikes {} / {} / {} / {} are not strictly increasing",
                    selection.long_put.strike,
                    selection.short_put.strike,
                    selection.short_call.strike,
                    selection.long_call.strike
                ),
            }
            .into());
        }

        let risk_free_rate = self
            .rate_lookup
            .resolve(self.rate_port.as_ref(), request.evaluation_date)
            .await;

        let policy = self.pricing.volatility_policy();
        let mut substituted_vols = Vec::new();
        let mut build = |role: LegRole| -> Result<OptionLeg, EngineError> {
            let (leg, substituted) = condor_leg(
                role,
                selection.row(role),
                expiry,
                self.quantity,
                risk_free_rate.rate,
                &policy,
            )?;
            if substituted {
                tracing::warn!(
                    leg = %role,
                    strike = leg.strike(),
                    fallback = policy.fallback,
                    "Implied volatility missing; using fallback"
                );
                substituted_vols.push(role);
            }
            Ok(leg)
        };

        let long_put = build(LegRole::LongPut)?;
        let short_put = build(LegRole::ShortPut)?;
        let short_call = build(LegRole::ShortCall)?;
        let long_call = build(LegRole::LongCall)?;

        let position = IronCondorPosition::new(IronCondorParams {
            underlying: request.underlying.clone(),
            long_put,
            short_put,
            short_call,
            long_call,
            hedge: HedgeLeg::flat(request.hedge_symbol.clone()),
            opened_at: None,
            notes: None,
        })?;
        position.validate_strike_order()?;

        tracing::info!(
            underlying = %position.underlying(),
            expiry = %expiry,
            long_put = position.leg(LegRole::LongPut).strike(),
            short_put = position.leg(LegRole::ShortPut).strike(),
            short_call = position.leg(LegRole::ShortCall).strike(),
            long_call = position.leg(LegRole::LongCall).strike(),
            net_credit = position.net_credit(),
            risk_free_rate = risk_free_rate.rate,
            "Built iron condor"
        );

        let risk = match request.spot {
            Some(spot) => Some(self.risk_at(&position, spot, request.evaluation_date)?),
            None => None,
        };

        Ok(BuildIronCondorResponse {
            position,
            selection,
            risk_free_rate,
            substituted_vols,
            risk,
        })
    }

    fn risk_at(
        &self,
        position: &IronCondorPosition,
        spot: f64,
        evaluation_date: NaiveDate,
    ) -> Result<CondorRisk, EngineError> {
        let mut priced = Vec::with_capacity(4);
        for (_, leg) in position.legs() {
            let greeks = price_leg(leg, spot, evaluation_date, leg.implied_vol())?;
            priced.push((greeks, leg.signed_quantity()));
        }
        let greeks = aggregate_greeks(priced.iter().map(|(g, qty)| (g, *qty)));

        let grid = self.pricing.price_grid(spot);
        let pnl = compute_pnl(&position.strategy_legs(), spot, Some(&grid));

        Ok(CondorRisk { spot, greeks, pnl })
    }
}

/// Option leg for `role` priced off its chain row.
///
/// Sold legs take the bid and bid IV, bought legs the ask and ask IV.
/// Returns whether the volatility fallback was applied.
fn condor_leg(
    role: LegRole,
    row: &ChainRow,
    expiry: NaiveDate,
    quantity: f64,
    risk_free_rate: f64,
    policy: &VolatilityPolicy,
) -> Result<(OptionLeg, bool), EngineError> {
    let right = role.expected_right();
    let action = role.action();
    let quote = row.quote(right);

    let (premium, observed_iv) = match action {
        TradeAction::Sell => (quote.bid, quote.bid_iv),
        TradeAction::Buy => (quote.ask, quote.ask_iv),
    };
    let premium = premium.ok_or_else(|| SelectionError::NotFound {
        leg: role.to_string(),
    })?;
    let vol = policy.resolve(observed_iv);

    let leg = OptionLeg::new(OptionLegParams {
        right,
        action,
        strike: row.strike,
        expiry,
        premium,
        implied_vol: vol.value,
        risk_free_rate,
        quantity,
    })?;
    Ok((leg, vol.substituted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        ChainsByExpiry, MarketDataError, MockOptionChainPort, MockRiskFreeRatePort, RatePoint,
    };
    use crate::domain::option_position::OptionRight;
    use crate::domain::strike_selection::{OptionChain, SideQuote};
    use crate::error::ErrorCode;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 27).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 28).unwrap()
    }

    fn side(delta: f64, bid: f64, ask: f64, iv: Option<f64>) -> SideQuote {
        SideQuote {
            bid: Some(bid),
            ask: Some(ask),
            bid_iv: iv.map(|v| v - 0.02),
            ask_iv: iv,
            delta: Some(delta),
            volume: None,
        }
    }

    fn row(strike: f64, call: SideQuote, put: SideQuote) -> ChainRow {
        ChainRow { strike, call, put }
    }

    fn chain() -> OptionChain {
        OptionChain::new(
            expiry(),
            vec![
                row(2400.0, side(0.97, 600.0, 610.0, Some(0.80)), side(-0.04, 4.0, 5.0, Some(0.90))),
                row(2600.0, side(0.90, 420.0, 430.0, Some(0.75)), side(-0.10, 14.0, 15.0, Some(0.80))),
                row(2800.0, side(0.78, 260.0, 270.0, Some(0.70)), side(-0.21, 38.0, 40.0, Some(0.72))),
                row(3000.0, side(0.52, 120.0, 125.0, Some(0.65)), side(-0.48, 110.0, 115.0, Some(0.66))),
                row(3200.0, side(0.22, 45.0, 47.0, Some(0.68)), side(-0.77, 240.0, 250.0, Some(0.70))),
                row(3400.0, side(0.09, 16.0, 17.0, None), side(-0.91, 420.0, 430.0, Some(0.75))),
                row(3600.0, side(0.05, 6.0, 7.0, Some(0.85)), side(-0.95, 610.0, 620.0, Some(0.80))),
            ],
        )
    }

    fn chain_port(chain: OptionChain) -> MockOptionChainPort {
        let mut port = MockOptionChainPort::new();
        port.expect_get_option_chain().returning(move |_, _| {
            let mut chains = ChainsByExpiry::new();
            chains.insert(chain.expiry, chain.clone());
            Ok(chains)
        });
        port
    }

    fn rate_port() -> MockRiskFreeRatePort {
        let mut port = MockRiskFreeRatePort::new();
        port.expect_get_risk_free_rate().returning(|_, _, _| {
            Ok(vec![RatePoint {
                date: NaiveDate::from_ymd_opt(2026, 1, 27).unwrap(),
                rate_percent: 4.0,
            }])
        });
        port
    }

    fn use_case(
        chain: MockOptionChainPort,
        rate: MockRiskFreeRatePort,
    ) -> BuildIronCondorUseCase<MockOptionChainPort, MockRiskFreeRatePort> {
        BuildIronCondorUseCase::new(
            Arc::new(chain),
            Arc::new(rate),
            &SelectionConfig::default(),
            PricingConfig::default(),
            RateLookup {
                series_id: "DGS3MO".to_string(),
                lookback_days: 14,
                default_rate: 0.045,
            },
        )
    }

    fn request(spot: Option<f64>) -> BuildIronCondorRequest {
        BuildIronCondorRequest {
            underlying: "eth".to_string(),
            expiry: None,
            hedge_symbol: "ETH-USD-PERP".to_string(),
            evaluation_date: today(),
            spot,
        }
    }

    #[tokio::test]
    async fn builds_condor_from_chain() {
        let response = use_case(chain_port(chain()), rate_port())
            .execute(request(None))
            .await
            .unwrap();
        let position = &response.position;

        assert_eq!(position.underlying(), "ETH");
        assert_eq!(position.expiry(), expiry());
        assert_eq!(position.leg(LegRole::LongPut).strike(), 2400.0);
        assert_eq!(position.leg(LegRole::ShortPut).strike(), 2800.0);
        assert_eq!(position.leg(LegRole::ShortCall).strike(), 3200.0);
        assert_eq!(position.leg(LegRole::LongCall).strike(), 3600.0);
        assert!(position.hedge().is_flat());
        assert!(response.risk.is_none());
    }

    #[tokio::test]
    async fn sells_at_bid_and_buys_at_ask() {
        let response = use_case(chain_port(chain()), rate_port())
            .execute(request(None))
            .await
            .unwrap();
        let position = &response.position;

        assert_eq!(position.leg(LegRole::ShortPut).premium(), 38.0);
        assert_eq!(position.leg(LegRole::ShortCall).premium(), 45.0);
        assert_eq!(position.leg(LegRole::LongPut).premium(), 5.0);
        assert_eq!(position.leg(LegRole::LongCall).premium(), 7.0);
        // short call prices off bid IV (ask IV - 0.02), long call off ask IV
        assert!((position.leg(LegRole::ShortCall).implied_vol() - 0.66).abs() < 1e-12);
        assert!((position.leg(LegRole::LongCall).implied_vol() - 0.85).abs() < 1e-12);
        assert!((position.net_credit() - 71.0).abs() < 1e-9);
        assert!((position.leg(LegRole::LongPut).risk_free_rate() - 0.04).abs() < 1e-12);
    }

    #[tokio::test]
    async fn missing_iv_uses_fallback() {
        let mut chain = chain();
        chain.rows[6].call.ask_iv = None;

        let response = use_case(chain_port(chain), rate_port())
            .execute(request(None))
            .await
            .unwrap();

        assert_eq!(response.substituted_vols, vec![LegRole::LongCall]);
        assert_eq!(
            response.position.leg(LegRole::LongCall).implied_vol(),
            PricingConfig::default().fallback_volatility
        );
    }

    #[tokio::test]
    async fn rate_failure_uses_default() {
        let mut rate = MockRiskFreeRatePort::new();
        rate.expect_get_risk_free_rate()
            .returning(|_, _, _| Err(MarketDataError::unavailable("no key")));

        let response = use_case(chain_port(chain()), rate)
            .execute(request(None))
            .await
            .unwrap();

        assert_eq!(response.risk_free_rate.rate, 0.045);
        assert_eq!(
            response.position.leg(LegRole::ShortPut).risk_free_rate(),
            0.045
        );
    }

    #[tokio::test]
    async fn computes_risk_when_spot_given() {
        let response = use_case(chain_port(chain()), rate_port())
            .execute(request(Some(3000.0)))
            .await
            .unwrap();
        let Some(risk) = response.risk else {
            panic!("expected risk view");
        };

        assert_eq!(risk.pnl.price_grid().len(), 200);
        assert_eq!(risk.pnl.per_leg_pnl().len(), 4);
        // at spot the sold wings dominate: short gamma, positive theta
        assert!(risk.greeks.gamma < 0.0);
        assert!(risk.greeks.theta > 0.0);
        assert!(risk.greeks.delta.abs() < 0.2);
    }

    #[tokio::test]
    async fn uncorrectable_wing_is_rejected() {
        // only one put strike: the put wing cannot be placed below the short put
        let chain = OptionChain::new(
            expiry(),
            vec![
                row(2800.0, side(0.78, 260.0, 270.0, Some(0.7)), side(-0.21, 38.0, 40.0, Some(0.7))),
                row(3200.0, side(0.22, 45.0, 47.0, Some(0.7)), SideQuote::default()),
                row(3600.0, side(0.05, 6.0, 7.0, Some(0.8)), SideQuote::default()),
            ],
        );

        let Err(err) = use_case(chain_port(chain), rate_port())
            .execute(request(None))
            .await
        else {
            panic!("expected InvalidStructure");
        };
        assert_eq!(err.code(), ErrorCode::SelectionFailed);
        assert!(matches!(
            err,
            EngineError::Selection(SelectionError::InvalidStructure { .. })
        ));
    }

    #[tokio::test]
    async fn chain_failure_propagates() {
        let mut chain = MockOptionChainPort::new();
        chain
            .expect_get_option_chain()
            .returning(|_, _| Err(MarketDataError::ConnectionError {
                message: "refused".to_string(),
            }));

        let Err(err) = use_case(chain, rate_port()).execute(request(None)).await else {
            panic!("expected market data error");
        };
        assert_eq!(err.code(), ErrorCode::MarketDataError);
    }

    #[test]
    fn condor_leg_sides() {
        let row = chain().rows[4];
        let policy = VolatilityPolicy::default();
        let (leg, substituted) =
            condor_leg(LegRole::ShortCall, &row, expiry(), 2.0, 0.04, &policy).unwrap();
        assert_eq!(leg.right(), OptionRight::Call);
        assert_eq!(leg.action(), TradeAction::Sell);
        assert_eq!(leg.quantity(), 2.0);
        assert!(!substituted);
    }
}
