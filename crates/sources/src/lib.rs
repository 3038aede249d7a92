//! Spool - Sources
//!
//! Upstream stream sources that yield decoded records to the ingestion loop.
//!
//! # Available Sources
//!
//! - **HTTP** - long-lived streaming HTTP response carrying newline-delimited JSON
//!
//! # Design Principles
//!
//! - **Two-phase contract**: `StreamSource::connect` establishes a session and
//!   returns a `RecordStream`; `RecordStream::next_record` blocks until the next
//!   record, end of stream, or a transport failure
//! - **Classified errors**: `SourceError::is_transient` separates network
//!   flakiness (retry) from configuration defects (abort)
//! - **Bounded buffering**: `bytes::BytesMut` line framing with a maximum line length
//! - **Stall detection**: each body read is bounded by a timeout
//!
//! # Example
//!
//! ```ignore
//! use spool_sources::{HttpStreamConfig, HttpStreamSource, RecordStream, StreamSource};
//!
//! let mut source = HttpStreamSource::new(HttpStreamConfig::new("https://stream.example.com"))?;
//! let mut stream = source.connect(None).await?;
//!
//! while let Some(record) = stream.next_record().await? {
//!     println!("{}", record.value());
//! }
//! ```

pub mod http;

mod error;
mod keywords;
mod record;
mod stream;

pub use error::SourceError;
pub use http::{HttpRecordStream, HttpStreamConfig, HttpStreamSource};
pub use keywords::KeywordFilter;
pub use record::Record;
pub use stream::{RecordStream, StreamSource};
