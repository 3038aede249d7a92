//! Heartbeat configuration

use serde::Deserialize;

/// Heartbeat throughput reporting
///
/// The reporting interval ramps 1, 2, 4, ... seconds after startup until it
/// reaches `seconds_per_heartbeat`, which must therefore be a power of two.
///
/// ```toml
/// [heartbeat]
/// seconds_per_heartbeat = 64
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Steady-state interval in seconds
    /// Default: 64
    pub seconds_per_heartbeat: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            seconds_per_heartbeat: 64,
        }
    }
}
