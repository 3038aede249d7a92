//! Spool - Sinks
//!
//! Persists the record stream to rotating, optionally compressed files.
//!
//! # Architecture
//!
//! The session loop hands each record's canonical bytes to the
//! [`OutputRotator`], which owns the single open file. Rotation is counted in
//! records, and every closed file gets a `.stats` sidecar.
//!
//! ```text
//! [Session] --bytes--> [OutputRotator] --> [ChainWrite (LZ4 | plain)] --> [Disk]
//!                            ↓ (records_per_file reached)
//!                      [finish + .stats + .keywords]
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spool_sinks::{OutputRotator, RotatorConfig};
//!
//! let mut rotator = OutputRotator::new(
//!     RotatorConfig::new("dump").with_records_per_file(100_000),
//! );
//! rotator.open(chrono::Local::now())?;
//! ```

mod common;

/// Count-based output file rotation
pub mod rotator;

/// Shared utilities (writers, rate-limited logging)
pub mod util;

pub use common::SinkError;
pub use rotator::{DEFAULT_RECORDS_PER_FILE, OutputRotator, RotationStats, RotatorConfig};
pub use util::RateLimitedLogger;
