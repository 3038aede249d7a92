//! Upstream stream source configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default maximum length of a single record line (1 MiB)
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Streaming HTTP source configuration
///
/// # Example
///
/// ```toml
/// [source]
/// url = "https://stream.example.com/1.1/statuses/filter.json"
/// bearer_token = "AAAA..."
/// keywords_file = "keywords.txt"
/// connect_timeout = "30s"
/// stall_timeout = "90s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Streaming endpoint URL
    /// Required
    pub url: String,

    /// Bearer token sent in the `Authorization` header
    pub bearer_token: Option<String>,

    /// Keyword file, reloaded on every connect
    pub keywords_file: Option<PathBuf>,

    /// Time allowed to establish the connection and receive headers
    /// Default: 30s
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Maximum silence between body chunks before the stream counts as stalled
    /// Default: 90s
    #[serde(with = "humantime_serde")]
    pub stall_timeout: Duration,

    /// Longest accepted record line in bytes
    /// Default: 1 MiB
    pub max_line_bytes: usize,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            bearer_token: None,
            keywords_file: None,
            connect_timeout: Duration::from_secs(30),
            stall_timeout: Duration::from_secs(90),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            user_agent: concat!("spool/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
