//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use spool_config::{LogConfig, LogFormat, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Resolve log level: CLI flag > config file > default "info"
pub fn resolve_level<'a>(cli_level: Option<&'a str>, config: Option<&LogConfig>) -> &'a str {
    match (cli_level, config) {
        (Some(level), _) => level,
        (None, Some(log)) => log.level.as_str(),
        (None, None) => "info",
    }
}

/// Build the level filter, capping the HTTP stack when configured
///
/// An unparseable level falls back to `info` rather than failing startup.
fn build_filter(level: &str, config: &LogConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(config.filter_directive(level))
        .or_else(|_| EnvFilter::try_new(config.filter_directive("info")))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))
}

/// Initialize the tracing subscriber
pub fn init(level: &str, config: &LogConfig) -> Result<()> {
    let filter = build_filter(level, config)?;

    let (writer, ansi) = match &config.output {
        LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    let layer = match config.format {
        LogFormat::Console => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).with(filter).init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spool_config::LogLevel;

    #[test]
    fn test_cli_level_wins() {
        let config = LogConfig {
            level: LogLevel::Warn,
            ..LogConfig::default()
        };
        assert_eq!(resolve_level(Some("trace"), Some(&config)), "trace");
    }

    #[test]
    fn test_config_level_used_without_flag() {
        let config = LogConfig {
            level: LogLevel::Debug,
            ..LogConfig::default()
        };
        assert_eq!(resolve_level(None, Some(&config)), "debug");
    }

    #[test]
    fn test_default_level() {
        assert_eq!(resolve_level(None, None), "info");
    }

    #[test]
    fn test_filter_keeps_http_stack_quiet() {
        let filter = build_filter("debug", &LogConfig::default()).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("reqwest=warn"));
        assert!(rendered.contains("debug"));
    }

    #[test]
    fn test_bad_level_falls_back_to_info() {
        let filter = build_filter("spool=loudest", &LogConfig::default()).unwrap();
        assert!(filter.to_string().contains("info"));
    }
}
