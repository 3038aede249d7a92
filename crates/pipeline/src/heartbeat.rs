//! Throughput heartbeat
//!
//! Logs a record-rate snapshot at a ramping interval: 1s, 2s, 4s, ... up to
//! the configured steady interval. The short early intervals confirm
//! quickly that data is flowing after startup; the steady interval keeps
//! the log quiet afterwards.

use std::time::{Duration, Instant};

use tracing::info;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One heartbeat window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartbeatSnapshot {
    /// Records seen in the window
    pub count: u64,

    /// Actual window length
    pub elapsed: Duration,

    /// Interval that was due
    pub interval: Duration,
}

impl HeartbeatSnapshot {
    /// Records per second over the window, 0 for an empty window
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.count as f64 / secs
        } else {
            0.0
        }
    }

    /// Rate projected over a day
    pub fn per_day(&self) -> f64 {
        self.rate() * SECONDS_PER_DAY
    }
}

/// Self-adjusting heartbeat
#[derive(Debug)]
pub struct HeartbeatMonitor {
    interval_secs: u64,
    steady_secs: u64,
    last_beat: Instant,
    window_count: u64,
    beats: u64,
}

impl HeartbeatMonitor {
    /// Start a monitor at `now` ramping up to `steady_secs`
    ///
    /// `steady_secs` is expected to be a power of two; other values still
    /// work but the final doubling overshoots and is clamped.
    pub fn new(steady_secs: u64, now: Instant) -> Self {
        let steady_secs = steady_secs.max(1);
        Self {
            interval_secs: 1,
            steady_secs,
            last_beat: now,
            window_count: 0,
            beats: 0,
        }
    }

    /// Count one record; emit a snapshot if the interval has elapsed
    pub fn tick(&mut self, now: Instant) -> Option<HeartbeatSnapshot> {
        self.window_count += 1;

        let elapsed = now.saturating_duration_since(self.last_beat);
        let interval = self.current_interval();
        if elapsed < interval {
            return None;
        }

        let snapshot = HeartbeatSnapshot {
            count: self.window_count,
            elapsed,
            interval,
        };

        info!(
            records = snapshot.count,
            window_secs = elapsed.as_secs(),
            rate_per_sec = snapshot.rate(),
            per_day = snapshot.per_day() as u64,
            "heartbeat"
        );

        self.beats += 1;
        self.window_count = 0;
        self.last_beat = now;
        self.interval_secs = (self.interval_secs * 2).min(self.steady_secs);

        Some(snapshot)
    }

    /// Interval the next heartbeat waits for
    pub fn current_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Heartbeats emitted so far
    pub fn beats(&self) -> u64 {
        self.beats
    }
}

#[cfg(test)]
#[path = "heartbeat_test.rs"]
mod heartbeat_test;
