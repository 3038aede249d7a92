//! HTTP Source - long-lived streaming response
//!
//! Opens a single HTTP request whose response body never ends and decodes it
//! as newline-delimited JSON records.
//!
//! # Protocol
//!
//! ```text
//! GET /1.1/statuses/filter.json?track=rust,tokio
//! Authorization: Bearer <token>
//!
//! HTTP/1.1 200 OK
//! Transfer-Encoding: chunked
//!
//! {"id":1,"text":"..."}\r\n
//! \r\n                         <- keep-alive, skipped
//! {"id":2,"text":"..."}\r\n
//! ```
//!
//! # Failure Modes
//!
//! - Non-2xx status: `SourceError::Status`
//! - No body bytes for `stall_timeout`: `SourceError::Stalled`
//! - Body read error: `SourceError::Transport`
//! - Line is not JSON or too long: `SourceError::Framing`
//! - Body ends: `Ok(None)`
//!
//! # Example
//!
//! ```ignore
//! use spool_sources::http::{HttpStreamConfig, HttpStreamSource};
//!
//! let config = HttpStreamConfig::new("https://stream.example.com/filter")
//!     .with_bearer_token("secret");
//! let mut source = HttpStreamSource::new(config)?;
//! let mut stream = source.connect(None).await?;
//! ```

mod config;
mod framing;

#[cfg(test)]
mod http_test;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::keywords::KeywordFilter;
use crate::record::Record;
use crate::stream::{RecordStream, StreamSource};

pub use config::{HttpStreamConfig, TCP_KEEPALIVE};
pub use framing::LineFramer;

/// Streaming HTTP source
pub struct HttpStreamSource {
    client: reqwest::Client,
    config: HttpStreamConfig,
}

impl HttpStreamSource {
    /// Create a source with a dedicated HTTP client
    ///
    /// # Errors
    ///
    /// Returns `Request` if the HTTP client cannot be built (e.g. TLS backend
    /// initialization failed).
    pub fn new(config: HttpStreamConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .tcp_keepalive(TCP_KEEPALIVE)
            .build()
            .map_err(SourceError::Request)?;

        Ok(Self { client, config })
    }

    /// Get the source configuration
    pub fn config(&self) -> &HttpStreamConfig {
        &self.config
    }
}

#[async_trait]
impl StreamSource for HttpStreamSource {
    type Stream = HttpRecordStream;

    async fn connect(
        &mut self,
        filter: Option<&KeywordFilter>,
    ) -> Result<HttpRecordStream, SourceError> {
        let mut request = self.client.get(&self.config.url);

        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        if let Some(filter) = filter {
            request = request.query(&[("track", filter.track_param())]);
        }

        let timeout = self.config.connect_timeout;
        let response = tokio::time::timeout(timeout, request.send())
            .await
            .map_err(|_| SourceError::ConnectTimeout { timeout })?
            .map_err(SourceError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::status(status.as_u16(), &body));
        }

        info!(
            url = %self.config.url,
            status = status.as_u16(),
            keywords = filter.map_or(0, KeywordFilter::len),
            "stream connected"
        );

        Ok(HttpRecordStream {
            response,
            framer: LineFramer::new(self.config.max_line_bytes),
            stall_timeout: self.config.stall_timeout,
            keepalives: 0,
        })
    }
}

/// An open streaming response
pub struct HttpRecordStream {
    response: reqwest::Response,
    framer: LineFramer,
    stall_timeout: Duration,
    keepalives: u64,
}

impl HttpRecordStream {
    /// Blank keep-alive lines received so far
    pub fn keepalives(&self) -> u64 {
        self.keepalives
    }
}

#[async_trait]
impl RecordStream for HttpRecordStream {
    async fn next_record(&mut self) -> Result<Option<Record>, SourceError> {
        loop {
            while let Some(line) = self.framer.next_line()? {
                if line.iter().all(u8::is_ascii_whitespace) {
                    self.keepalives += 1;
                    continue;
                }

                let value = serde_json::from_slice(&line)
                    .map_err(|e| SourceError::framing(format!("invalid JSON record: {}", e)))?;
                return Ok(Some(Record::new(value)));
            }

            let chunk = match tokio::time::timeout(self.stall_timeout, self.response.chunk()).await
            {
                Err(_) => {
                    return Err(SourceError::Stalled {
                        timeout: self.stall_timeout,
                    });
                }
                Ok(result) => result.map_err(SourceError::Transport)?,
            };

            match chunk {
                Some(bytes) => self.framer.push(&bytes),
                None => {
                    if self.framer.pending() > 0 {
                        debug!(
                            bytes = self.framer.pending(),
                            "discarding partial line at end of stream"
                        );
                    }
                    return Ok(None);
                }
            }
        }
    }
}
