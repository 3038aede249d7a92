//! Source error types
//!
//! Structured errors for stream sources, classified into transient failures
//! (worth a reconnect) and permanent ones (configuration or programming defects).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Maximum response body length kept in a status error
pub const MAX_ERROR_BODY_LENGTH: usize = 256;

/// Stream source errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// Request could not be built or sent
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Connection not established within the connect timeout
    #[error("connect timed out after {timeout:?}")]
    ConnectTimeout { timeout: Duration },

    /// Upstream answered with a non-success status
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Reading the response body failed
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// No bytes arrived within the stall timeout
    #[error("stream stalled: no data for {timeout:?}")]
    Stalled { timeout: Duration },

    /// Upstream sent something that is not a record line
    #[error("malformed framing: {0}")]
    Framing(String),

    /// Upstream closed the stream
    #[error("stream ended by upstream")]
    Ended,

    /// Keyword file could not be read
    #[error("failed to read keyword file '{}': {source}", path.display())]
    KeywordFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Keyword file contains no terms
    #[error("keyword file '{}' contains no keywords", path.display())]
    NoKeywords { path: PathBuf },
}

impl SourceError {
    /// Create a framing error
    pub fn framing(msg: impl Into<String>) -> Self {
        Self::Framing(msg.into())
    }

    /// Create a status error, truncating the body
    pub fn status(status: u16, body: &str) -> Self {
        let body = if body.len() > MAX_ERROR_BODY_LENGTH {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated from {} bytes)", &body[..end], body.len())
        } else {
            body.to_string()
        };
        Self::Status { status, body }
    }

    /// Whether reconnecting may fix this error
    ///
    /// Transport, framing, status, stall and end-of-stream errors are
    /// transient. Keyword file problems and requests that could not even be
    /// built are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_builder(),
            Self::ConnectTimeout { .. }
            | Self::Status { .. }
            | Self::Transport(_)
            | Self::Stalled { .. }
            | Self::Framing(_)
            | Self::Ended => true,
            Self::KeywordFile { .. } | Self::NoKeywords { .. } => false,
        }
    }

    /// Whether the upstream rejected our credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}
