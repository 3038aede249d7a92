//! Sink utilities
//!
//! - **chain_writer**: Pluggable writers (plain JSONL, LZ4)
//! - **rate_limited_logger**: Collapses repeated warnings

pub mod chain_writer;
pub mod rate_limited_logger;

pub use chain_writer::{ChainWrite, ChainWriter, DEFAULT_BUFFER_SIZE, Lz4Writer, PlainTextWriter};
pub use rate_limited_logger::{DEFAULT_LOG_INTERVAL, RateLimitedLogger};
