//! Logging configuration
//!
//! The `[log]` section. Level and format go straight to the tracing
//! subscriber; `quiet_dependencies` keeps the HTTP stack's own debug output
//! out of the ingestion log when the level is lowered to chase a problem.

use std::path::PathBuf;

use serde::Deserialize;

/// Targets capped at `warn` when `quiet_dependencies` is set
pub const NOISY_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

/// Minimum severity written to the log
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    /// Connects, rotations and heartbeats (default)
    #[default]
    Info,
    /// Dropped streams and reconnect delays
    Warn,
    /// Fatal errors and rejected credentials only
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Line format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, ANSI-colored on a terminal
    #[default]
    Console,
    /// One JSON object per event, for log shippers
    Json,
}

/// Where log lines go
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Appended to; anything other than `stdout`/`stderr` is a path
    #[serde(untagged)]
    File(PathBuf),
}

/// `[log]` section
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// output = "/var/log/spool.log"
/// quiet_dependencies = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default: info
    pub level: LogLevel,

    /// Default: console
    pub format: LogFormat,

    /// Default: stdout
    pub output: LogOutput,

    /// Cap HTTP client and TLS crates at `warn`
    /// Default: true
    pub quiet_dependencies: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            quiet_dependencies: true,
        }
    }
}

impl LogConfig {
    /// Build the `EnvFilter` directive for `level`
    ///
    /// `level` is passed in rather than read from `self.level` because a
    /// command-line flag may override it.
    pub fn filter_directive(&self, level: &str) -> String {
        let mut directive = level.to_string();
        if self.quiet_dependencies {
            for target in NOISY_TARGETS {
                directive.push_str(&format!(",{}=warn", target));
            }
        }
        directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_uses_defaults() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
        assert_eq!(config.output, LogOutput::Stdout);
        assert!(config.quiet_dependencies);
    }

    #[test]
    fn test_output_destinations() {
        let stderr: LogConfig = toml::from_str(r#"output = "stderr""#).unwrap();
        assert_eq!(stderr.output, LogOutput::Stderr);

        let file: LogConfig = toml::from_str(r#"output = "logs/spool.log""#).unwrap();
        assert_eq!(file.output, LogOutput::File(PathBuf::from("logs/spool.log")));
    }

    #[test]
    fn test_level_names_match_directives() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            let parsed: LogConfig = toml::from_str(&format!("level = \"{}\"", level.as_str())).unwrap();
            assert_eq!(parsed.level, level);
        }
        assert!(LogLevel::Debug < LogLevel::Warn);
    }

    #[test]
    fn test_filter_directive_quiets_http_stack() {
        let config = LogConfig::default();
        assert_eq!(
            config.filter_directive("debug"),
            "debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn"
        );

        let loud = LogConfig {
            quiet_dependencies: false,
            ..LogConfig::default()
        };
        assert_eq!(loud.filter_directive("trace"), "trace");
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(toml::from_str::<LogConfig>(r#"format = "xml""#).is_err());
    }
}
