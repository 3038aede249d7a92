//! Spool Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Only the upstream URL is required - everything else has a default.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use spool_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[source]\nurl = \"https://stream.example.com/filter\"").unwrap();
//! assert_eq!(config.output.records_per_file, 100_000);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [source]
//! url = "https://stream.example.com/1.1/statuses/filter.json"
//! bearer_token = "..."
//! keywords_file = "keywords.txt"
//! stall_timeout = "90s"
//!
//! [output]
//! path = "dump/"
//! records_per_file = 100000
//! compression = "lz4"
//!
//! [heartbeat]
//! seconds_per_heartbeat = 64
//!
//! [reconnect]
//! connect_limit = 10
//! connect_limit_interval = "1h"
//! connect_ok_duration = "5m"
//! delay_base = "1s"
//! delay_mult = 2.0
//! delay_max = "5m"
//! ```

mod error;
mod heartbeat;
mod logging;
mod output;
mod reconnect;
mod source;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use heartbeat::HeartbeatConfig;
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use output::{Compression, OutputConfig};
pub use reconnect::ReconnectConfig;
pub use source::SourceConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults, but validation
/// requires `source.url` to be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Upstream stream source
    pub source: SourceConfig,

    /// Rotating output files
    pub output: OutputConfig,

    /// Heartbeat throughput reporting
    pub heartbeat: HeartbeatConfig,

    /// Reconnect backoff and connection-frequency limiting
    pub reconnect: ReconnectConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::Duration;

    const MINIMAL: &str = r#"
[source]
url = "https://stream.example.com/filter"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_str(MINIMAL).unwrap();
        assert_eq!(config.source.url, "https://stream.example.com/filter");
        assert_eq!(config.output.records_per_file, 100_000);
        assert_eq!(config.heartbeat.seconds_per_heartbeat, 64);
        assert_eq!(config.reconnect.connect_limit, 10);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_empty_config_rejected() {
        // url is the one field without a usable default
        let err = Config::from_str("").unwrap_err();
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[log]
level = "debug"
format = "json"

[source]
url = "https://stream.example.com/filter"
bearer_token = "secret"
keywords_file = "keywords.txt"
stall_timeout = "2m"

[output]
path = "/var/spool/stream"
records_per_file = 5000
compression = "none"

[heartbeat]
seconds_per_heartbeat = 128

[reconnect]
connect_limit = 5
connect_limit_interval = "30m"
connect_ok_duration = "10m"
delay_base = "2s"
delay_mult = 3.0
delay_max = "10m"
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.source.bearer_token.as_deref(), Some("secret"));
        assert_eq!(
            config.source.keywords_file.as_deref(),
            Some(Path::new("keywords.txt"))
        );
        assert_eq!(config.source.stall_timeout, Duration::from_secs(120));
        assert_eq!(config.output.records_per_file, 5000);
        assert_eq!(config.output.compression, Compression::None);
        assert_eq!(config.heartbeat.seconds_per_heartbeat, 128);
        assert_eq!(config.reconnect.connect_limit, 5);
        assert_eq!(
            config.reconnect.connect_limit_interval,
            Duration::from_secs(30 * 60)
        );
        assert_eq!(config.reconnect.delay_base, Duration::from_secs(2));
        assert!((config.reconnect.delay_mult - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_str("[source\nurl = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/spool.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/spool.toml"));
    }
}
