//! Reconnect gate
//!
//! Combines the [`ConnectionLog`] and the backoff state machine. Before
//! every reconnect the limiter either vetoes (too many attempts in the
//! window) or sleeps the current backoff delay. The sleep is cut into
//! short slices so a shutdown request is noticed within one slice.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::backoff::{BackoffAction, BackoffEvent, BackoffPolicy, BackoffState};
use crate::clock::Clock;
use crate::connection_log::ConnectionLog;
use crate::shutdown::ShutdownFlag;

/// Longest uninterrupted slice of a reconnect sleep
pub const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Outcome of [`RateLimiter::await_reconnect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Backoff slept; connect now
    Proceed,

    /// Connection log is full inside its window
    Vetoed { attempts: usize, window: Duration },

    /// Shutdown was requested during the sleep
    Shutdown,
}

/// Decides whether and when a reconnect may happen
#[derive(Debug)]
pub struct RateLimiter {
    log: ConnectionLog,
    policy: BackoffPolicy,
    backoff: BackoffState,
}

impl RateLimiter {
    pub fn new(policy: BackoffPolicy, connect_limit: usize, limit_interval: Duration) -> Self {
        Self {
            log: ConnectionLog::new(connect_limit, limit_interval),
            backoff: BackoffState::new(&policy),
            policy,
        }
    }

    /// Record a connection attempt initiated at `now`
    pub fn record_attempt(&mut self, now: std::time::Instant) {
        self.log.record_attempt(now);
    }

    /// Gate one reconnect
    ///
    /// Vetoes without sleeping if the connection log forbids another
    /// attempt. Otherwise sleeps the backoff delay, advancing the delay
    /// afterwards. A shutdown request during the sleep returns
    /// [`ReconnectDecision::Shutdown`] and leaves the delay unchanged.
    pub async fn await_reconnect<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        shutdown: &ShutdownFlag,
    ) -> ReconnectDecision {
        let now = clock.now();
        if !self.log.may_reconnect(now) {
            return ReconnectDecision::Vetoed {
                attempts: self.log.len(),
                window: self.log.window(),
            };
        }

        let since_last_attempt = self
            .log
            .newest()
            .map_or(Duration::MAX, |t| now.saturating_duration_since(t));
        let (state, action) = self
            .backoff
            .step(&self.policy, BackoffEvent::ReconnectNeeded { since_last_attempt });
        self.backoff = state;

        let delay = match action {
            BackoffAction::Sleep { delay, reset } => {
                if reset {
                    debug!("previous connection was stable, backoff reset");
                }
                delay
            }
            BackoffAction::Advanced { .. } => state.current_delay(),
        };

        info!(delay_ms = delay.as_millis() as u64, "reconnecting after delay");
        if !sleep_unless_shutdown(clock, delay, shutdown).await {
            return ReconnectDecision::Shutdown;
        }

        let (state, action) = self.backoff.step(&self.policy, BackoffEvent::SleepCompleted);
        self.backoff = state;
        if let BackoffAction::Advanced {
            reached_ceiling: true,
        } = action
        {
            warn!(
                delay_secs = state.current_delay().as_secs(),
                "reconnect delay reached its maximum"
            );
        }

        ReconnectDecision::Proceed
    }

    /// Delay the next reconnect would sleep, before any stability reset
    pub fn current_delay(&self) -> Duration {
        self.backoff.current_delay()
    }
}

/// Sleep `delay` in slices, returning false as soon as shutdown is seen
async fn sleep_unless_shutdown<C: Clock + ?Sized>(
    clock: &C,
    delay: Duration,
    shutdown: &ShutdownFlag,
) -> bool {
    let start = clock.now();
    loop {
        if shutdown.is_set() {
            return false;
        }
        let elapsed = clock.now().saturating_duration_since(start);
        if elapsed >= delay {
            return true;
        }
        clock
            .sleep((delay - elapsed).min(SHUTDOWN_POLL_INTERVAL))
            .await;
    }
}

#[cfg(test)]
#[path = "rate_limiter_test.rs"]
mod rate_limiter_test;
