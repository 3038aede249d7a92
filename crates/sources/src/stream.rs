//! Stream source traits

use async_trait::async_trait;

use crate::error::SourceError;
use crate::keywords::KeywordFilter;
use crate::record::Record;

/// Something that can open a record stream
#[async_trait]
pub trait StreamSource: Send {
    /// Stream type yielded by a successful connect
    type Stream: RecordStream;

    /// Open a new stream, optionally restricted to a keyword filter
    async fn connect(
        &mut self,
        filter: Option<&KeywordFilter>,
    ) -> Result<Self::Stream, SourceError>;
}

/// An open, unbounded stream of records
#[async_trait]
pub trait RecordStream: Send {
    /// Wait for the next record
    ///
    /// Returns `Ok(None)` when upstream closed the stream. This call may block
    /// for as long as the source's stall timeout allows.
    async fn next_record(&mut self) -> Result<Option<Record>, SourceError>;
}
