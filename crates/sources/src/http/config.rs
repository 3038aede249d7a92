//! HTTP stream source configuration

use std::time::Duration;

/// Default connect timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default stall timeout (upstream keep-alives normally arrive every 30s)
const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(90);

/// Default maximum record line length (1 MiB)
const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// TCP keep-alive interval for the streaming connection
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

/// HTTP stream source configuration
#[derive(Debug, Clone)]
pub struct HttpStreamConfig {
    /// Streaming endpoint URL
    pub url: String,

    /// Optional bearer token
    pub bearer_token: Option<String>,

    /// Time allowed to connect and receive response headers
    pub connect_timeout: Duration,

    /// Maximum silence between body chunks
    pub stall_timeout: Duration,

    /// Longest accepted record line
    pub max_line_bytes: usize,

    /// `User-Agent` header
    pub user_agent: String,
}

impl HttpStreamConfig {
    /// Create a config for the given URL with defaults
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer_token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            stall_timeout: DEFAULT_STALL_TIMEOUT,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            user_agent: concat!("spool/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set bearer token
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set stall timeout
    #[must_use]
    pub fn with_stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = timeout;
        self
    }

    /// Set connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set maximum line length
    #[must_use]
    pub fn with_max_line_bytes(mut self, max: usize) -> Self {
        self.max_line_bytes = max;
        self
    }
}
