//! Reconnect configuration
//!
//! Two mechanisms keep reconnects civil:
//! - exponential backoff between attempts (`delay_*`)
//! - a sliding-window limit on connection attempts (`connect_limit*`), whose
//!   violation aborts the process

use std::time::Duration;

use serde::Deserialize;

/// Reconnect backoff and connection-frequency limit
///
/// # Example
///
/// ```toml
/// [reconnect]
/// connect_limit = 10
/// connect_limit_interval = "1h"
/// connect_ok_duration = "5m"
/// delay_base = "1s"
/// delay_mult = 2.0
/// delay_max = "5m"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Maximum connection attempts within `connect_limit_interval`
    /// Default: 10
    pub connect_limit: usize,

    /// Sliding window for `connect_limit`
    /// Default: 1h
    #[serde(with = "humantime_serde")]
    pub connect_limit_interval: Duration,

    /// A connection that lived this long resets the backoff delay
    /// Default: 5m
    #[serde(with = "humantime_serde")]
    pub connect_ok_duration: Duration,

    /// Initial reconnect delay
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub delay_base: Duration,

    /// Multiplier applied after each unstable reconnect
    /// Default: 2.0
    pub delay_mult: f64,

    /// Reconnect delay ceiling
    /// Default: 5m
    #[serde(with = "humantime_serde")]
    pub delay_max: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            connect_limit: 10,
            connect_limit_interval: Duration::from_secs(60 * 60),
            connect_ok_duration: Duration::from_secs(5 * 60),
            delay_base: Duration::from_secs(1),
            delay_mult: 2.0,
            delay_max: Duration::from_secs(5 * 60),
        }
    }
}
