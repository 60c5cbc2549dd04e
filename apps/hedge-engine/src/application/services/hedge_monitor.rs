//! Hedge Monitor Service
//!
//! Long-running loop around the [`HedgeMonitor`] state machine. Each cycle
//! fetches the option chain for the position's expiry, resolves leg deltas,
//! annotates the result with the latest risk-free rate and steps the state
//! machine. Records are logged, exported as metrics and broadcast to
//! subscribers. The loop sleeps through the injected scheduler and stops on
//! `max_cycles` or cancellation.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    MarketDataError, OptionChainPort, RiskFreeRate, RiskFreeRatePort, SchedulerPort,
    latest_risk_free_rate,
};
use crate::config::MonitorConfig;
use crate::domain::hedging::{
    CycleRecord, DeltaSnapshot, HedgeError, HedgeMonitor, HedgeState, Observation, StepOutcome,
};
use crate::domain::option_position::IronCondorPosition;
use crate::observability::{
    record_market_data_request, record_monitor_cycle, record_rebalance_alert,
    update_hedge_exposure,
};

/// Totals of a finished monitor run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonitorSummary {
    /// Cycles attempted.
    pub cycles: u64,
    /// Cycles that emitted a rebalance alert.
    pub alerts: u64,
    /// Cycles that failed to observe deltas.
    pub failures: u64,
    /// State when the loop exited (always stopped).
    pub final_state: HedgeState,
}

/// Hedge monitor service for one iron condor position.
pub struct HedgeMonitorService<C, R, S>
where
    C: OptionChainPort,
    R: RiskFreeRatePort,
    S: SchedulerPort,
{
    /// Configuration.
    config: MonitorConfig,
    /// Position being monitored.
    position: IronCondorPosition,
    /// Option chain source.
    chain_port: Arc<C>,
    /// Risk-free rate source.
    rate_port: Arc<R>,
    /// Clock and sleep.
    scheduler: Arc<S>,
    /// Decision logic.
    monitor: HedgeMonitor,
    /// Upper bound for each market data call.
    fetch_timeout: Duration,
    /// Cancellation token for graceful shutdown.
    shutdown: CancellationToken,
    /// Cycle record sender for subscribers.
    record_tx: broadcast::Sender<CycleRecord>,
}

impl<C, R, S> HedgeMonitorService<C, R, S>
where
    C: OptionChainPort + 'static,
    R: RiskFreeRatePort + 'static,
    S: SchedulerPort + 'static,
{
    /// Create a new hedge monitor service.
    #[must_use]
    pub fn new(
        config: MonitorConfig,
        position: IronCondorPosition,
        chain_port: Arc<C>,
        rate_port: Arc<R>,
        scheduler: Arc<S>,
        shutdown: CancellationToken,
    ) -> Self {
        let (record_tx, _) = broadcast::channel(config.event_buffer.max(1));

        Self {
            monitor: HedgeMonitor::new(config.policy()),
            fetch_timeout: config.fetch_timeout(),
            config,
            position,
            chain_port,
            rate_port,
            scheduler,
            shutdown,
            record_tx,
        }
    }

    /// Override the per-request timeout (sub-second values are allowed).
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Subscribe to cycle records.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CycleRecord> {
        self.record_tx.subscribe()
    }

    /// Position being monitored.
    #[must_use]
    pub const fn position(&self) -> &IronCondorPosition {
        &self.position
    }

    /// Run until `max_cycles` is reached or the token is cancelled.
    pub async fn run(&self) -> MonitorSummary {
        let hedge = self.position.hedge();
        tracing::info!(
            underlying = %self.position.underlying(),
            expiry = %self.position.expiry(),
            hedge_symbol = %hedge.symbol,
            initial_hedge_qty = hedge.signed_quantity,
            interval_secs = self.config.interval_seconds,
            threshold = self.config.delta_change_threshold,
            rf_series = %self.config.rf_series_id,
            "Starting hedge monitor"
        );

        let mut state = HedgeState::new(hedge.signed_quantity);
        let mut alerts = 0;
        let mut failures = 0;

        loop {
            if self.shutdown.is_cancelled() {
                state = state.stop();
                break;
            }

            let outcome = match self.run_cycle(&state).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(error = %e, "Hedge monitor cannot advance");
                    state = state.stop();
                    break;
                }
            };

            if outcome.record.is_failed() {
                failures += 1;
            }
            if outcome.alert.is_some() {
                alerts += 1;
            }
            state = outcome.state;

            if state.is_stopped() {
                tracing::info!(cycles = state.cycle, "Reached max_cycles; monitor stopped");
                break;
            }

            tokio::select! {
                () = self.scheduler.sleep(self.config.interval()) => {}
                () = self.shutdown.cancelled() => {
                    tracing::info!(cycles = state.cycle, "Hedge monitor cancelled");
                    state = state.stop();
                    break;
                }
            }
        }

        MonitorSummary {
            cycles: state.cycle,
            alerts,
            failures,
            final_state: state,
        }
    }

    /// Execute one cycle against `state`.
    ///
    /// # Errors
    ///
    /// Returns `HedgeError::Stopped` if `state` is terminal. Data failures
    /// are not errors; they produce a failed record.
    pub async fn run_cycle(&self, state: &HedgeState) -> Result<StepOutcome, HedgeError> {
        if state.is_stopped() {
            return Err(HedgeError::Stopped {
                cycles: state.cycle,
            });
        }

        let now = self.scheduler.now();
        let observation = self.observe().await;

        let rate = match &observation {
            Observation::Snapshot(_) => Some(self.fetch_risk_free_rate(now.date_naive()).await),
            Observation::Failed(_) => None,
        };

        let mut outcome = self
            .monitor
            .step(state, self.position.expiry(), now, observation)?;

        match rate {
            Some(Ok(Some(rate))) => {
                outcome.record = outcome.record.with_risk_free_rate(Some(rate.rate));
            }
            Some(Ok(None)) => {
                outcome.record = outcome.record.with_note("risk-free rate unavailable");
            }
            Some(Err(e)) => {
                outcome.record = outcome
                    .record
                    .with_note(format!("risk-free rate unavailable: {e}"));
            }
            None => {}
        }

        self.publish(&outcome);
        Ok(outcome)
    }

    async fn observe(&self) -> Observation {
        let underlying = self.position.underlying();
        let expiry = self.position.expiry();

        let chains = match self
            .timed(
                "option_chain",
                self.chain_port.get_option_chain(underlying, Some(expiry)),
            )
            .await
        {
            Ok(chains) => chains,
            Err(e) => {
                return Observation::Failed(HedgeError::DataUnavailable {
                    message: format!("failed to fetch option quotes for {underlying}: {e}"),
                });
            }
        };

        let Some(chain) = chains.get(&expiry) else {
            return Observation::Failed(HedgeError::DataUnavailable {
                message: format!("no option quotes for {underlying} expiry={expiry}"),
            });
        };

        match DeltaSnapshot::from_chain(&self.position, chain) {
            Ok(snapshot) => Observation::Snapshot(snapshot),
            Err(e) => Observation::Failed(e),
        }
    }

    async fn fetch_risk_free_rate(
        &self,
        today: NaiveDate,
    ) -> Result<Option<RiskFreeRate>, MarketDataError> {
        let start = today
            .checked_sub_days(Days::new(u64::from(self.config.rf_lookback_days)))
            .unwrap_or(today);
        let points = self
            .timed(
                "risk_free_rate",
                self.rate_port
                    .get_risk_free_rate(&self.config.rf_series_id, start, today),
            )
            .await?;
        Ok(latest_risk_free_rate(&points))
    }

    async fn timed<T, F>(&self, provider: &str, request: F) -> Result<T, MarketDataError>
    where
        F: Future<Output = Result<T, MarketDataError>>,
    {
        let started = Instant::now();
        let result = match tokio::time::timeout(self.fetch_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(MarketDataError::Timeout {
                timeout: self.fetch_timeout,
            }),
        };

        let status = match &result {
            Ok(_) => "ok",
            Err(MarketDataError::Timeout { .. }) => "timeout",
            Err(_) => "error",
        };
        record_market_data_request(provider, status, started.elapsed().as_secs_f64());
        result
    }

    fn publish(&self, outcome: &StepOutcome) {
        let underlying = self.position.underlying();
        let record = &outcome.record;

        if let Some(error) = record.error.as_deref().filter(|_| record.is_failed()) {
            tracing::warn!(
                cycle = record.cycle,
                error = %error,
                "Failed to refresh option deltas"
            );
            record_monitor_cycle(underlying, "failed");
        } else {
            let legs = record.per_leg_signed_delta.unwrap_or_default();
            tracing::info!(
                cycle = record.cycle,
                expiry = %record.expiry,
                phase = %record.phase,
                long_put = legs.long_put,
                short_put = legs.short_put,
                short_call = legs.short_call,
                long_call = legs.long_call,
                net_option_delta = record.net_option_delta,
                portfolio_delta = record.portfolio_delta,
                change_ratio = record.change_ratio,
                risk_free_rate = record.risk_free_rate,
                hedge_qty = record.hedge_qty_after,
                note = record.error.as_deref(),
                "Hedge monitor cycle"
            );
            record_monitor_cycle(underlying, "ok");
            if let Some(net) = record.net_option_delta {
                update_hedge_exposure(underlying, net, record.hedge_qty_after);
            }
        }

        if let Some(alert) = &outcome.alert {
            tracing::warn!(
                cycle = alert.cycle,
                hedge_symbol = %self.position.hedge().symbol,
                direction = %alert.direction,
                quantity = alert.quantity(),
                target_hedge_qty = alert.target_hedge_qty,
                change_ratio = alert.change_ratio,
                assumed_executed = self.monitor.policy().assume_rebalance_executed,
                "Delta change exceeded threshold; hedge rebalance suggested"
            );
            record_rebalance_alert(underlying, &alert.direction.to_string());
        }

        // No subscribers is fine.
        let _ = self.record_tx.send(outcome.record.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::application::ports::{
        MockOptionChainPort, MockRiskFreeRatePort, MockSchedulerPort, RatePoint,
    };
    use crate::domain::hedging::MonitorPhase;
    use crate::domain::option_position::{
        HedgeLeg, IronCondorParams, OptionLeg, OptionLegParams, OptionRight, TradeAction,
    };
    use crate::domain::strike_selection::{ChainRow, OptionChain, SideQuote};

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 13).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).unwrap()
    }

    fn leg(right: OptionRight, action: TradeAction, strike: f64) -> OptionLeg {
        OptionLeg::new(OptionLegParams {
            right,
            action,
            strike,
            expiry: expiry(),
            premium: 10.0,
            implied_vol: 0.6,
            risk_free_rate: 0.04,
            quantity: 1.0,
        })
        .unwrap()
    }

    fn position() -> IronCondorPosition {
        IronCondorPosition::new(IronCondorParams {
            underlying: "ETH".to_string(),
            long_put: leg(OptionRight::Put, TradeAction::Buy, 2600.0),
            short_put: leg(OptionRight::Put, TradeAction::Sell, 2800.0),
            short_call: leg(OptionRight::Call, TradeAction::Sell, 3200.0),
            long_call: leg(OptionRight::Call, TradeAction::Buy, 3400.0),
            hedge: HedgeLeg::flat("ETH-USD-PERP"),
            opened_at: None,
            notes: None,
        })
        .unwrap()
    }

    /// Chain whose only non-zero delta is the short call, so net delta = -call_delta.
    fn chains(short_call_delta: f64) -> BTreeMap<NaiveDate, OptionChain> {
        let row = |strike: f64, call: f64, put: f64| ChainRow {
            strike,
            call: SideQuote {
                delta: Some(call),
                ..SideQuote::default()
            },
            put: SideQuote {
                delta: Some(put),
                ..SideQuote::default()
            },
        };
        let chain = OptionChain::new(
            expiry(),
            vec![
                row(2600.0, 0.0, 0.0),
                row(2800.0, 0.0, 0.0),
                row(3200.0, short_call_delta, 0.0),
                row(3400.0, 0.0, 0.0),
            ],
        );
        BTreeMap::from([(expiry(), chain)])
    }

    fn scheduler() -> MockSchedulerPort {
        let mut scheduler = MockSchedulerPort::new();
        scheduler.expect_now().returning(now);
        scheduler.expect_sleep().returning(|_| ());
        scheduler
    }

    fn rates() -> MockRiskFreeRatePort {
        let mut rates = MockRiskFreeRatePort::new();
        rates.expect_get_risk_free_rate().returning(|series, start, end| {
            assert_eq!(series, "DGS3MO");
            assert_eq!((end - start).num_days(), 14);
            Ok(vec![RatePoint {
                date: end,
                rate_percent: 4.3,
            }])
        });
        rates
    }

    fn service(
        chain_port: MockOptionChainPort,
        rate_port: MockRiskFreeRatePort,
        max_cycles: u64,
    ) -> HedgeMonitorService<MockOptionChainPort, MockRiskFreeRatePort, MockSchedulerPort> {
        let config = MonitorConfig {
            max_cycles: Some(max_cycles),
            ..MonitorConfig::default()
        };
        HedgeMonitorService::new(
            config,
            position(),
            Arc::new(chain_port),
            Arc::new(rate_port),
            Arc::new(scheduler()),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn baseline_then_alert() {
        let mut chain_port = MockOptionChainPort::new();
        let mut seq = mockall::Sequence::new();
        // Net deltas: -0.10 then -0.35.
        for delta in [0.10, 0.35] {
            chain_port
                .expect_get_option_chain()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _| Ok(chains(delta)));
        }

        let service = service(chain_port, rates(), 2);
        let mut records = service.subscribe();
        let summary = service.run().await;

        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.alerts, 1);
        assert_eq!(summary.failures, 0);
        assert!(summary.final_state.is_stopped());
        assert!((summary.final_state.current_hedge_qty - 0.35).abs() < 1e-12);

        let first = records.recv().await.unwrap();
        assert_eq!(first.phase, MonitorPhase::BaselineSet);
        assert!((first.risk_free_rate.unwrap() - 0.043).abs() < 1e-12);
        let second = records.recv().await.unwrap();
        assert!(second.alert);
        assert!((second.change_ratio.unwrap() - 2.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn failed_fetch_is_counted_and_noop() {
        let mut chain_port = MockOptionChainPort::new();
        chain_port
            .expect_get_option_chain()
            .returning(|_, _| Err(MarketDataError::unavailable("exchange down")));
        let mut rate_port = MockRiskFreeRatePort::new();
        rate_port.expect_get_risk_free_rate().never();

        let service = service(chain_port, rate_port, 3);
        let summary = service.run().await;

        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.failures, 3);
        assert_eq!(summary.alerts, 0);
        assert!(summary.final_state.previous_net_delta.is_none());
    }

    #[tokio::test]
    async fn missing_expiry_in_response_fails_cycle() {
        let mut chain_port = MockOptionChainPort::new();
        chain_port
            .expect_get_option_chain()
            .returning(|_, _| Ok(BTreeMap::new()));

        let service = service(chain_port, rates(), 1);
        let outcome = service.run_cycle(&HedgeState::new(0.0)).await.unwrap();
        assert!(outcome.record.is_failed());
        assert!(outcome.record.error.unwrap().contains("expiry=2026-02-13"));
    }

    #[tokio::test]
    async fn rate_failure_only_annotates() {
        let mut chain_port = MockOptionChainPort::new();
        chain_port
            .expect_get_option_chain()
            .returning(|_, _| Ok(chains(0.2)));
        let mut rate_port = MockRiskFreeRatePort::new();
        rate_port
            .expect_get_risk_free_rate()
            .returning(|_, _, _| Err(MarketDataError::api("HTTP 500")));

        let service = service(chain_port, rate_port, 1);
        let outcome = service.run_cycle(&HedgeState::new(0.0)).await.unwrap();
        assert!(!outcome.record.is_failed());
        assert!(outcome.record.risk_free_rate.is_none());
        assert!(outcome.record.error.unwrap().contains("HTTP 500"));
        assert_eq!(outcome.state.phase, MonitorPhase::BaselineSet);
    }

    #[tokio::test]
    async fn cancelled_before_start_runs_no_cycle() {
        let mut chain_port = MockOptionChainPort::new();
        chain_port.expect_get_option_chain().never();
        let service = service(chain_port, rates(), 5);
        service.shutdown.cancel();

        let summary = service.run().await;
        assert_eq!(summary.cycles, 0);
        assert!(summary.final_state.is_stopped());
    }
}
