//! Scheduler Adapters
//!
//! `TokioScheduler` uses the system clock and `tokio::time::sleep`.
//! `ManualScheduler` keeps its own clock and advances it on every sleep,
//! so a monitor run completes without real waiting.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::application::ports::SchedulerPort;

/// Wall-clock scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl SchedulerPort for TokioScheduler {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug)]
struct ManualClock {
    now: DateTime<Utc>,
    sleeps: Vec<Duration>,
}

/// Scheduler with a simulated clock.
#[derive(Debug)]
pub struct ManualScheduler {
    clock: Mutex<ManualClock>,
}

impl ManualScheduler {
    /// Start the clock at `start`.
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            clock: Mutex::new(ManualClock {
                now: start,
                sleeps: Vec::new(),
            }),
        }
    }

    /// Move the clock forward without sleeping.
    pub fn advance(&self, duration: Duration) {
        let mut clock = self.clock.lock();
        clock.now = add(clock.now, duration);
    }

    /// Durations passed to `sleep` so far.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.clock.lock().sleeps.clone()
    }
}

fn add(at: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|d| at.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait]
impl SchedulerPort for ManualScheduler {
    fn now(&self) -> DateTime<Utc> {
        self.clock.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        {
            let mut clock = self.clock.lock();
            clock.now = add(clock.now, duration);
            clock.sleeps.push(duration);
        }
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn manual_sleep_advances_clock_and_records() {
        let scheduler = ManualScheduler::new(start());

        scheduler.sleep(Duration::from_secs(60)).await;
        scheduler.sleep(Duration::from_secs(90)).await;

        assert_eq!(
            scheduler.now(),
            Utc.with_ymd_and_hms(2026, 2, 1, 8, 2, 30).unwrap()
        );
        assert_eq!(
            scheduler.sleeps(),
            vec![Duration::from_secs(60), Duration::from_secs(90)]
        );
    }

    #[test]
    fn advance_moves_clock_without_recording() {
        let scheduler = ManualScheduler::new(start());
        scheduler.advance(Duration::from_secs(3600));

        assert_eq!(
            scheduler.now(),
            Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap()
        );
        assert!(scheduler.sleeps().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_sleeps_on_the_runtime_clock() {
        let before = tokio::time::Instant::now();
        TokioScheduler.sleep(Duration::from_secs(5)).await;
        assert!(before.elapsed() >= Duration::from_secs(5));
    }
}
