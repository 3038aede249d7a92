//! Pipeline error types
//!
//! Only failures that end the session loop surface here. Transient source
//! errors are handled inside the loop and never reach the caller.
//!
//! Wrapped errors are rendered inline in the message and not exposed as a
//! `source()`, so an `anyhow` chain prints each cause once.

use std::time::Duration;

use thiserror::Error;

use spool_sinks::SinkError;
use spool_sources::SourceError;

/// Fatal session loop errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Too many connection attempts within the limit window
    #[error(
        "reconnect vetoed: {attempts} connection attempts within {}s",
        window.as_secs()
    )]
    ReconnectVetoed { attempts: usize, window: Duration },

    /// Non-transient source failure (e.g. unreadable keyword file)
    #[error("stream source failed: {0}")]
    Source(SourceError),

    /// Output file failure
    #[error("output failed: {0}")]
    Sink(SinkError),

    /// Record could not be re-encoded
    #[error("failed to encode record: {0}")]
    Encode(serde_json::Error),
}

impl From<SinkError> for PipelineError {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

impl PipelineError {
    /// Whether the loop stopped because the reconnect limiter vetoed
    pub fn is_veto(&self) -> bool {
        matches!(self, Self::ReconnectVetoed { .. })
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display() {
        let err = PipelineError::ReconnectVetoed {
            attempts: 10,
            window: Duration::from_secs(3600),
        };
        assert_eq!(
            err.to_string(),
            "reconnect vetoed: 10 connection attempts within 3600s"
        );
        assert!(err.is_veto());

        let err = PipelineError::Source(SourceError::NoKeywords {
            path: PathBuf::from("keywords.txt"),
        });
        assert!(err.to_string().starts_with("stream source failed"));
        assert!(!err.is_veto());

        let err = PipelineError::from(SinkError::NotOpen);
        assert!(err.to_string().contains("no output file is open"));
    }

    #[test]
    fn test_source_message_not_repeated_in_chain() {
        use std::error::Error as _;

        let err = PipelineError::Source(SourceError::NoKeywords {
            path: PathBuf::from("keywords.txt"),
        });
        assert!(err.source().is_none());

        // walk the chain the way `{:#}` renders it
        let mut rendered = err.to_string();
        let mut next = err.source();
        while let Some(cause) = next {
            rendered.push_str(&format!(": {}", cause));
            next = cause.source();
        }
        assert_eq!(rendered.matches("contains no keywords").count(), 1);

        let err = PipelineError::from(SinkError::NotOpen);
        assert!(err.source().is_none());
    }
}
