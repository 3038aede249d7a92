//! Exponential reconnect backoff
//!
//! A pure state machine: [`BackoffState::step`] takes an event and returns
//! the next state plus what the caller should do. No clock, no sleeping.
//!
//! ```text
//! ReconnectNeeded { since_last_attempt }
//!     since_last_attempt >= ok_duration  -> delay = base   (stable connection)
//!     otherwise                          -> delay unchanged
//!     => Sleep { delay }
//!
//! SleepCompleted
//!     delay = min(delay * mult, max)
//!     => Advanced { reached_ceiling }
//! ```
//!
//! Across a run of quick failures the delay climbs `base, base*mult, ...`
//! to `max`; one connection that lives for `ok_duration` drops it back to
//! `base`.

use std::time::Duration;

/// Backoff tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    /// First and reset delay
    pub delay_base: Duration,

    /// Growth factor after each sleep (>= 1)
    pub delay_mult: f64,

    /// Ceiling
    pub delay_max: Duration,

    /// A connection alive this long counts as stable
    pub ok_duration: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            delay_base: Duration::from_secs(1),
            delay_mult: 2.0,
            delay_max: Duration::from_secs(300),
            ok_duration: Duration::from_secs(300),
        }
    }
}

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffEvent {
    /// The stream failed; `since_last_attempt` is how long ago the failed
    /// connection was initiated
    ReconnectNeeded { since_last_attempt: Duration },

    /// The caller finished sleeping
    SleepCompleted,
}

/// What the caller should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffAction {
    /// Sleep `delay` before reconnecting; `reset` when the delay was just
    /// returned to base
    Sleep { delay: Duration, reset: bool },

    /// Delay advanced; `reached_ceiling` on the step that first hits max
    Advanced { reached_ceiling: bool },
}

/// Current reconnect delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffState {
    current_delay: Duration,
}

impl BackoffState {
    /// Initial state at `delay_base`
    pub fn new(policy: &BackoffPolicy) -> Self {
        Self {
            current_delay: policy.delay_base,
        }
    }

    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }

    /// Apply `event`
    #[must_use]
    pub fn step(self, policy: &BackoffPolicy, event: BackoffEvent) -> (Self, BackoffAction) {
        match event {
            BackoffEvent::ReconnectNeeded { since_last_attempt } => {
                let reset = since_last_attempt >= policy.ok_duration;
                let next = if reset {
                    Self::new(policy)
                } else {
                    self
                };
                let action = BackoffAction::Sleep {
                    delay: next.current_delay,
                    reset: reset && self.current_delay != policy.delay_base,
                };
                (next, action)
            }
            BackoffEvent::SleepCompleted => {
                let grown = self.current_delay.as_secs_f64() * policy.delay_mult;
                let current_delay = Duration::try_from_secs_f64(grown)
                    .unwrap_or(policy.delay_max)
                    .clamp(policy.delay_base, policy.delay_max.max(policy.delay_base));
                let reached_ceiling =
                    current_delay >= policy.delay_max && self.current_delay < policy.delay_max;
                (Self { current_delay }, BackoffAction::Advanced { reached_ceiling })
            }
        }
    }
}

#[cfg(test)]
#[path = "backoff_test.rs"]
mod backoff_test;
