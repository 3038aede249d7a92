//! Bounded history of connection attempts
//!
//! Holds the timestamps of the most recent `connect_limit` attempts. When the
//! log is full and its oldest entry is still inside the limit window, the
//! upstream is being hammered and further reconnects are vetoed.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding window of connection attempt timestamps
#[derive(Debug, Clone)]
pub struct ConnectionLog {
    attempts: VecDeque<Instant>,
    capacity: usize,
    window: Duration,
}

impl ConnectionLog {
    /// Create a log holding at most `capacity` attempts (at least 1)
    pub fn new(capacity: usize, window: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            attempts: VecDeque::with_capacity(capacity),
            capacity,
            window,
        }
    }

    /// Record that a connection was initiated at `now`
    pub fn record_attempt(&mut self, now: Instant) {
        if self.attempts.len() == self.capacity {
            self.attempts.pop_front();
        }
        self.attempts.push_back(now);
    }

    /// Whether another attempt is allowed at `now`
    ///
    /// Vetoes only when the log is full and the oldest attempt is younger
    /// than the window.
    pub fn may_reconnect(&self, now: Instant) -> bool {
        match self.attempts.front() {
            Some(&oldest) if self.is_full() => now.saturating_duration_since(oldest) >= self.window,
            _ => true,
        }
    }

    pub fn oldest(&self) -> Option<Instant> {
        self.attempts.front().copied()
    }

    /// Most recent attempt
    pub fn newest(&self) -> Option<Instant> {
        self.attempts.back().copied()
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.attempts.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
#[path = "connection_log_test.rs"]
mod connection_log_test;
