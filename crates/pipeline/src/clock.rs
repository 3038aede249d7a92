//! Time source for the session loop
//!
//! Backoff, rate limiting, heartbeats and file naming all read time through
//! [`Clock`] so tests can drive them without real sleeps.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Local};

/// Monotonic time, wall-clock time and sleeping
#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic now, for intervals
    fn now(&self) -> Instant;

    /// Local wall-clock now, for file names
    fn local_now(&self) -> DateTime<Local>;

    /// Suspend for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real time backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub(crate) use manual::ManualClock;

#[cfg(test)]
mod manual {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeZone};
    use parking_lot::Mutex;

    use super::Clock;
    use crate::shutdown::ShutdownFlag;

    struct State {
        offset: Duration,
        sleeps: Vec<Duration>,
        shutdown_at: Option<(Duration, ShutdownFlag)>,
    }

    /// Clock that only moves when told to; sleeping advances it instantly
    #[derive(Clone)]
    pub(crate) struct ManualClock {
        base: Instant,
        local_base: DateTime<Local>,
        state: Arc<Mutex<State>>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                base: Instant::now(),
                local_base: Local.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
                state: Arc::new(Mutex::new(State {
                    offset: Duration::ZERO,
                    sleeps: Vec::new(),
                    shutdown_at: None,
                })),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            let mut state = self.state.lock();
            state.offset += by;
            if let Some((at, flag)) = &state.shutdown_at
                && state.offset >= *at
            {
                flag.trigger();
            }
        }

        /// Trigger `flag` once the clock has moved `after` past its start
        pub(crate) fn shutdown_at(&self, after: Duration, flag: ShutdownFlag) {
            self.state.lock().shutdown_at = Some((after, flag));
        }

        /// Time elapsed since creation
        pub(crate) fn elapsed(&self) -> Duration {
            self.state.lock().offset
        }

        /// Every individual sleep requested so far
        pub(crate) fn sleeps(&self) -> Vec<Duration> {
            self.state.lock().sleeps.clone()
        }
    }

    #[async_trait]
    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + self.state.lock().offset
        }

        fn local_now(&self) -> DateTime<Local> {
            let offset = self.state.lock().offset;
            self.local_base + chrono::Duration::from_std(offset).unwrap()
        }

        async fn sleep(&self, duration: Duration) {
            self.state.lock().sleeps.push(duration);
            self.advance(duration);
            tokio::task::yield_now().await;
        }
    }
}
