//! Scheduler Port (Driven Port)
//!
//! Clock and sleep source for long-running services, injected so that tests
//! can drive the monitor without real waiting.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Clock plus cooperative sleep.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulerPort: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}
