//! Rate-limited warning logger
//!
//! A flapping upstream can fail every few hundred milliseconds. This logger
//! emits at most one warning per interval and reports how many it swallowed
//! in between.
//!
//! # Example
//!
//! ```ignore
//! use spool_sinks::util::RateLimitedLogger;
//! use std::time::Duration;
//!
//! let logger = RateLimitedLogger::new(Duration::from_secs(10));
//!
//! // Only logs once per 10 seconds, even if called frequently
//! for _ in 0..1000 {
//!     logger.warn(Instant::now(), "stream dropped", &error);
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default interval for rate-limited logging (10 seconds)
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Rate-limited logger that prevents log spam
///
/// Thread-safe: uses atomic counters and a mutex for the last log time.
pub struct RateLimitedLogger {
    /// Minimum interval between log messages
    min_interval: Duration,

    /// Last time we logged
    last_log_time: Mutex<Option<Instant>>,

    /// Count of warnings since last log
    pending: AtomicU64,

    /// Total warnings ever recorded
    total: AtomicU64,
}

impl RateLimitedLogger {
    /// Create a new rate-limited logger with the specified interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_log_time: Mutex::new(None),
            pending: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    /// Record a warning seen at `now` and log it if enough time has passed
    ///
    /// Callers pass their own notion of time so suppression follows the same
    /// clock as the rest of their loop. Returns true if the warning was
    /// logged, false if it was suppressed.
    pub fn warn(&self, now: Instant, message: &str, error: &dyn std::fmt::Display) -> bool {
        self.pending.fetch_add(1, Ordering::Relaxed);
        let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;

        if !self.should_log(now) {
            return false;
        }

        let count = self.pending.swap(0, Ordering::Relaxed);
        if count > 1 {
            tracing::warn!(
                error = %error,
                suppressed_count = count - 1,
                total_warnings = total,
                "{} (rate-limited)",
                message
            );
        } else {
            tracing::warn!(error = %error, total_warnings = total, "{}", message);
        }
        true
    }

    fn should_log(&self, now: Instant) -> bool {
        let mut last_time = self.last_log_time.lock();
        match *last_time {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                *last_time = Some(now);
                true
            }
        }
    }

    /// Warnings recorded since the last one was logged
    pub fn pending_count(&self) -> u64 {
        self.pending.load(Ordering::Relaxed)
    }

    /// Total warnings recorded
    pub fn total_count(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl Default for RateLimitedLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_INTERVAL)
    }
}
