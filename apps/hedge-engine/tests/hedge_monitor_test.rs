//! Hedge Monitor Integration Tests
//!
//! Runs the monitor service end to end against the in-memory market data
//! adapter and the manual scheduler:
//! - Baseline, quiet cycle, failed fetch and rebalance alert in one run
//! - Fetch timeout handled as a failed cycle
//! - Cancellation from a record subscriber
//! - Position file loading

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use hedge_engine::application::ports::{
    ChainsByExpiry, MarketDataError, OptionChainPort, RatePoint, SchedulerPort,
};
use hedge_engine::application::services::HedgeMonitorService;
use hedge_engine::config::MonitorConfig;
use hedge_engine::domain::hedging::{HedgeError, HedgeState, MonitorPhase, RebalanceDirection};
use hedge_engine::domain::option_position::{IronCondorPosition, LegRole};
use hedge_engine::domain::strike_selection::{ChainRow, OptionChain, SideQuote};
use hedge_engine::infrastructure::{InMemoryMarketData, ManualScheduler};
use tokio_util::sync::CancellationToken;

/// Load the iron condor fixture.
fn load_position() -> IronCondorPosition {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures/iron_condor_eth.yaml");

    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()));
    serde_yaml_bw::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {e}", path.display()))
}

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 27).unwrap()
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap()
}

fn side(delta: f64) -> SideQuote {
    SideQuote {
        delta: Some(delta),
        ..SideQuote::default()
    }
}

/// Chain quoting the four condor strikes: puts at 2600/2800, calls at
/// 3400/3600.
fn chain(long_put: f64, short_put: f64, short_call: f64, long_call: f64) -> OptionChain {
    let row = |strike: f64, call: f64, put: f64| ChainRow {
        strike,
        call: side(call),
        put: side(put),
    };
    OptionChain::new(
        expiry(),
        vec![
            row(2600.0, 0.95, long_put),
            row(2800.0, 0.82, short_put),
            row(3000.0, 0.55, -0.45),
            row(3400.0, short_call, -0.75),
            row(3600.0, long_call, -0.94),
        ],
    )
}

fn market_data() -> Arc<InMemoryMarketData> {
    let data = Arc::new(InMemoryMarketData::new());
    data.set_rates(
        "DGS3MO",
        vec![
            RatePoint {
                date: NaiveDate::from_ymd_opt(2026, 1, 28).unwrap(),
                rate_percent: 4.31,
            },
            RatePoint {
                date: NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(),
                rate_percent: 4.28,
            },
        ],
    );
    data
}

fn config(max_cycles: Option<u64>) -> MonitorConfig {
    MonitorConfig {
        max_cycles,
        ..MonitorConfig::default()
    }
}

// ============================================
// Position Fixture
// ============================================

#[test]
fn test_position_fixture_loads() {
    let position = load_position();

    assert_eq!(position.underlying(), "ETH");
    assert_eq!(position.expiry(), expiry());
    assert_eq!(position.leg(LegRole::LongPut).strike(), 2600.0);
    assert_eq!(position.leg(LegRole::LongCall).strike(), 3600.0);
    assert!(position.hedge().is_flat());
    assert!(position.validate_strike_order().is_ok());
}

// ============================================
// Full Run
// ============================================

#[tokio::test]
async fn test_monitor_run_with_quiet_failed_and_alert_cycles() {
    let data = market_data();
    // Net deltas: -0.06, -0.07, (failed), -0.16.
    data.push_chain_response("ETH", Ok(chain(-0.05, -0.18, 0.25, 0.06)));
    data.push_chain_response("ETH", Ok(chain(-0.05, -0.18, 0.26, 0.06)));
    data.push_chain_response("ETH", Err(MarketDataError::unavailable("exchange down")));
    data.push_chain_response("ETH", Ok(chain(-0.05, -0.18, 0.35, 0.06)));

    let scheduler = Arc::new(ManualScheduler::new(start()));
    let service = HedgeMonitorService::new(
        config(Some(4)),
        load_position(),
        Arc::clone(&data),
        Arc::clone(&data),
        Arc::clone(&scheduler),
        CancellationToken::new(),
    );
    let mut records = service.subscribe();

    let summary = service.run().await;

    assert_eq!(summary.cycles, 4);
    assert_eq!(summary.alerts, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.final_state.phase, MonitorPhase::Stopped);
    assert!((summary.final_state.current_hedge_qty - 0.16).abs() < 1e-9);
    assert_eq!(data.chain_requests(), 4);

    // One sleep between consecutive cycles, none after the last.
    assert_eq!(scheduler.sleeps(), vec![Duration::from_secs(3600); 3]);

    let baseline = records.recv().await.unwrap();
    assert_eq!(baseline.cycle, 1);
    assert_eq!(baseline.timestamp, start());
    assert_eq!(baseline.phase, MonitorPhase::BaselineSet);
    assert!((baseline.net_option_delta.unwrap() + 0.06).abs() < 1e-9);
    assert!((baseline.risk_free_rate.unwrap() - 0.0428).abs() < 1e-12);
    assert!(!baseline.alert);

    let quiet = records.recv().await.unwrap();
    assert_eq!(quiet.phase, MonitorPhase::Monitoring);
    assert!((quiet.change_ratio.unwrap() - 1.0 / 6.0).abs() < 1e-9);
    assert!(!quiet.alert);
    assert_eq!(quiet.hedge_qty_after, 0.0);

    let failed = records.recv().await.unwrap();
    assert!(failed.is_failed());
    assert!(failed.error.as_deref().unwrap().contains("exchange down"));
    assert!(failed.risk_free_rate.is_none());
    assert_eq!(failed.phase, MonitorPhase::Monitoring);

    let alert = records.recv().await.unwrap();
    assert_eq!(alert.cycle, 4);
    assert_eq!(alert.phase, MonitorPhase::Stopped);
    assert!(alert.alert);
    // Compared against the last successful cycle, not the failed one.
    assert!((alert.change_ratio.unwrap() - 0.09 / 0.07).abs() < 1e-9);
    assert_eq!(alert.suggested_action, Some(RebalanceDirection::Buy));
    assert!((alert.suggested_qty.unwrap() - 0.16).abs() < 1e-9);
    assert!((alert.portfolio_delta.unwrap() + 0.16).abs() < 1e-9);
}

#[tokio::test]
async fn test_missing_strike_fails_cycle_without_moving_baseline() {
    let data = market_data();
    let mut partial = chain(-0.05, -0.18, 0.25, 0.06);
    partial.rows.retain(|row| row.strike != 3600.0);
    data.push_chain_response("ETH", Ok(chain(-0.05, -0.18, 0.25, 0.06)));
    data.push_chain_response("ETH", Ok(partial));

    let service = HedgeMonitorService::new(
        config(Some(2)),
        load_position(),
        Arc::clone(&data),
        Arc::clone(&data),
        Arc::new(ManualScheduler::new(start())),
        CancellationToken::new(),
    );

    let summary = service.run().await;

    assert_eq!(summary.failures, 1);
    assert!((summary.final_state.previous_net_delta.unwrap() + 0.06).abs() < 1e-9);
}

#[tokio::test]
async fn test_stopped_state_rejects_cycle() {
    let data = market_data();
    data.set_chain("ETH", chain(-0.05, -0.18, 0.25, 0.06));
    let service = HedgeMonitorService::new(
        config(None),
        load_position(),
        Arc::clone(&data),
        Arc::clone(&data),
        Arc::new(ManualScheduler::new(start())),
        CancellationToken::new(),
    );

    let stopped = HedgeState::new(0.0).stop();
    let result = service.run_cycle(&stopped).await;

    assert!(matches!(result, Err(HedgeError::Stopped { cycles: 0 })));
    assert_eq!(data.chain_requests(), 0);
}

// ============================================
// Timeout
// ============================================

/// Chain source that never answers in time.
struct StalledChains;

#[async_trait]
impl OptionChainPort for StalledChains {
    async fn get_option_chain(
        &self,
        _underlying: &str,
        _expiry: Option<NaiveDate>,
    ) -> Result<ChainsByExpiry, MarketDataError> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(ChainsByExpiry::new())
    }
}

#[tokio::test(start_paused = true)]
async fn test_fetch_timeout_is_a_failed_cycle() {
    let data = market_data();
    let service = HedgeMonitorService::new(
        config(Some(2)),
        load_position(),
        Arc::new(StalledChains),
        Arc::clone(&data),
        Arc::new(ManualScheduler::new(start())),
        CancellationToken::new(),
    )
    .with_fetch_timeout(Duration::from_secs(5));
    let mut records = service.subscribe();

    let summary = service.run().await;

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.failures, 2);
    assert!(summary.final_state.previous_net_delta.is_none());

    let first = records.recv().await.unwrap();
    assert!(first.error.as_deref().unwrap().contains("timed out after 5s"));
}

#[tokio::test(start_paused = true)]
async fn test_sub_second_fetch_timeout_is_reported_in_millis() {
    let data = market_data();
    let service = HedgeMonitorService::new(
        config(Some(1)),
        load_position(),
        Arc::new(StalledChains),
        Arc::clone(&data),
        Arc::new(ManualScheduler::new(start())),
        CancellationToken::new(),
    )
    .with_fetch_timeout(Duration::from_millis(250));
    let mut records = service.subscribe();

    let summary = service.run().await;

    assert_eq!(summary.failures, 1);
    let record = records.recv().await.unwrap();
    let error = record.error.as_deref().unwrap();
    assert!(error.contains("timed out after 250ms"), "{error}");
}

// ============================================
// Cancellation
// ============================================

#[tokio::test]
async fn test_cancel_from_subscriber_stops_loop() {
    let data = market_data();
    data.set_chain("ETH", chain(-0.05, -0.18, 0.25, 0.06));

    let shutdown = CancellationToken::new();
    let scheduler = Arc::new(ManualScheduler::new(start()));
    let service = HedgeMonitorService::new(
        config(Some(1_000)),
        load_position(),
        Arc::clone(&data),
        Arc::clone(&data),
        Arc::clone(&scheduler),
        shutdown.clone(),
    );

    let mut records = service.subscribe();
    let watcher = tokio::spawn(async move {
        let first = records.recv().await.unwrap();
        shutdown.cancel();
        first.cycle
    });

    let summary = service.run().await;

    assert_eq!(watcher.await.unwrap(), 1);
    assert!(summary.cycles >= 1 && summary.cycles < 1_000);
    assert!(summary.final_state.is_stopped());
    assert!(scheduler.now() > start());
}

#[tokio::test]
async fn test_manual_scheduler_drives_record_timestamps() {
    let data = market_data();
    data.set_chain("ETH", chain(-0.05, -0.18, 0.25, 0.06));

    let scheduler = Arc::new(ManualScheduler::new(start()));
    let config = MonitorConfig {
        interval_seconds: 900,
        ..config(Some(3))
    };
    let service = HedgeMonitorService::new(
        config,
        load_position(),
        Arc::clone(&data),
        Arc::clone(&data),
        Arc::clone(&scheduler),
        CancellationToken::new(),
    );
    let mut records = service.subscribe();

    service.run().await;

    let mut stamps = Vec::new();
    while let Ok(record) = records.try_recv() {
        stamps.push(record.timestamp);
    }
    assert_eq!(
        stamps,
        vec![
            start(),
            Utc.with_ymd_and_hms(2026, 2, 1, 8, 15, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap(),
        ]
    );
    assert_eq!(scheduler.now(), stamps[2]);
}
