//! Configuration validation
//!
//! Runs on every parse so that a bad config aborts before the first
//! connection attempt:
//! - `source.url` is present and looks like an http(s) URL
//! - `output.path` is not empty and `records_per_file` is positive
//! - `heartbeat.seconds_per_heartbeat` is a power of two
//! - reconnect limits are positive and the delay bounds are ordered

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_source(config)?;
    validate_output(config)?;
    validate_heartbeat(config)?;
    validate_reconnect(config)?;
    Ok(())
}

fn validate_source(config: &Config) -> Result<()> {
    let source = &config.source;

    if source.url.trim().is_empty() {
        return Err(ConfigError::missing_field("source", "url"));
    }

    if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
        return Err(ConfigError::invalid_value(
            "source",
            "url",
            format!("expected an http(s) URL, got '{}'", source.url),
        ));
    }

    if source.stall_timeout.is_zero() {
        return Err(ConfigError::invalid_value(
            "source",
            "stall_timeout",
            "must be greater than zero",
        ));
    }

    if source.max_line_bytes == 0 {
        return Err(ConfigError::invalid_value(
            "source",
            "max_line_bytes",
            "must be greater than zero",
        ));
    }

    Ok(())
}

fn validate_output(config: &Config) -> Result<()> {
    let output = &config.output;

    if output.path.as_os_str().is_empty() {
        return Err(ConfigError::missing_field("output", "path"));
    }

    if output.records_per_file == 0 {
        return Err(ConfigError::invalid_value(
            "output",
            "records_per_file",
            "must be greater than zero",
        ));
    }

    Ok(())
}

fn validate_heartbeat(config: &Config) -> Result<()> {
    let secs = config.heartbeat.seconds_per_heartbeat;

    if !secs.is_power_of_two() {
        return Err(ConfigError::invalid_value(
            "heartbeat",
            "seconds_per_heartbeat",
            format!("must be a power of two, got {}", secs),
        ));
    }

    Ok(())
}

fn validate_reconnect(config: &Config) -> Result<()> {
    let reconnect = &config.reconnect;

    if reconnect.connect_limit == 0 {
        return Err(ConfigError::invalid_value(
            "reconnect",
            "connect_limit",
            "must be greater than zero",
        ));
    }

    if reconnect.delay_base.is_zero() {
        return Err(ConfigError::invalid_value(
            "reconnect",
            "delay_base",
            "must be greater than zero",
        ));
    }

    if reconnect.delay_base > reconnect.delay_max {
        return Err(ConfigError::invalid_value(
            "reconnect",
            "delay_max",
            format!(
                "must not be smaller than delay_base ({:?} < {:?})",
                reconnect.delay_max, reconnect.delay_base
            ),
        ));
    }

    if !reconnect.delay_mult.is_finite() || reconnect.delay_mult < 1.0 {
        return Err(ConfigError::invalid_value(
            "reconnect",
            "delay_mult",
            format!("must be a finite number >= 1.0, got {}", reconnect.delay_mult),
        ));
    }

    Ok(())
}
