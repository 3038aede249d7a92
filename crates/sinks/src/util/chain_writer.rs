//! Chain writers for output data files
//!
//! Provides a trait abstraction for pluggable writers used by the output
//! rotator. Each writer wraps a file and provides buffered writing with
//! optional compression.
//!
//! # Available Writers
//!
//! - `PlainTextWriter` - Buffered JSON lines (no compression)
//! - `Lz4Writer` - LZ4 frame compressed JSON lines
//!
//! # Example
//!
//! ```ignore
//! use std::fs::File;
//! use spool_sinks::util::chain_writer::{ChainWriter, Lz4Writer};
//!
//! let writer = Lz4Writer::new(1024 * 1024);
//! let file = File::create(format!("output{}", writer.file_extension()))?;
//! let mut chain = writer.wrap(file)?;
//!
//! chain.write_all(b"{\"id\":1}\n")?;
//! chain.finish()?;
//! ```

use lz4_flex::frame::FrameEncoder;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Default buffer size for writers (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Trait for pluggable chain writers
///
/// Implementations wrap a file and provide buffered writing with optional
/// compression. The writer owns the underlying file and handles flushing.
pub trait ChainWriter: Send + Sync {
    /// Wrap a file with this writer's buffering/compression strategy
    fn wrap(&self, file: File) -> io::Result<Box<dyn ChainWrite>>;

    /// Get the file extension for this writer type
    fn file_extension(&self) -> &'static str;
}

/// Trait for the actual write operations
///
/// This is object-safe and can be used with `Box<dyn ChainWrite>`.
pub trait ChainWrite: Write + Send {
    /// Finish writing, sync and close the file
    ///
    /// Once this returns, the file size on disk is final.
    fn finish(self: Box<Self>) -> io::Result<()>;
}

/// Flush a `BufWriter` and fsync the file underneath
fn close_buffered(writer: BufWriter<File>) -> io::Result<()> {
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

// ============================================================================
// PlainTextWriter - Buffered text output
// ============================================================================

/// Plain text writer with buffering (no compression)
#[derive(Debug, Clone)]
pub struct PlainTextWriter {
    buffer_size: usize,
}

impl PlainTextWriter {
    /// Create a new plain text writer with the specified buffer size
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

impl Default for PlainTextWriter {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl ChainWriter for PlainTextWriter {
    fn wrap(&self, file: File) -> io::Result<Box<dyn ChainWrite>> {
        Ok(Box::new(PlainTextChain {
            writer: BufWriter::with_capacity(self.buffer_size, file),
        }))
    }

    fn file_extension(&self) -> &'static str {
        ".jsonl"
    }
}

struct PlainTextChain {
    writer: BufWriter<File>,
}

impl Write for PlainTextChain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl ChainWrite for PlainTextChain {
    fn finish(self: Box<Self>) -> io::Result<()> {
        close_buffered(self.writer)
    }
}

// ============================================================================
// Lz4Writer - LZ4 compressed output
// ============================================================================

/// LZ4 compressed writer
///
/// Uses LZ4 frame compression: a good ratio on repetitive JSON with very
/// cheap compression, so it keeps up with the stream on a single core.
#[derive(Debug, Clone)]
pub struct Lz4Writer {
    buffer_size: usize,
}

impl Lz4Writer {
    /// Create a new LZ4 writer with the specified buffer size
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

impl Default for Lz4Writer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl ChainWriter for Lz4Writer {
    fn wrap(&self, file: File) -> io::Result<Box<dyn ChainWrite>> {
        let buf_writer = BufWriter::with_capacity(self.buffer_size, file);
        let encoder = FrameEncoder::new(buf_writer);
        Ok(Box::new(Lz4Chain { encoder }))
    }

    fn file_extension(&self) -> &'static str {
        ".jsonl.lz4"
    }
}

struct Lz4Chain {
    encoder: FrameEncoder<BufWriter<File>>,
}

impl Write for Lz4Chain {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

impl ChainWrite for Lz4Chain {
    fn finish(self: Box<Self>) -> io::Result<()> {
        // Writes the LZ4 end mark; the BufWriter still holds the tail
        let buf_writer = self.encoder.finish()?;
        close_buffered(buf_writer)
    }
}

#[cfg(test)]
#[path = "chain_writer_test.rs"]
mod chain_writer_test;
