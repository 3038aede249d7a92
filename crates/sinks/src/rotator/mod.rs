//! Output rotator - count-based file rotation
//!
//! Owns the single open data file and its counters. Records are appended as
//! canonical bytes; once `records_per_file` is reached the file is closed,
//! its `.stats` sidecar (and `.keywords` dump, if a filter is active) is
//! written, and the next file is opened.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! └── 2026-10/
//!     ├── 20261019_120000.jsonl.lz4
//!     ├── 20261019_120000.stats
//!     ├── 20261019_120000.keywords
//!     └── 20261019_133512.jsonl.lz4   <- currently open
//! ```
//!
//! Names come from local wall-clock time at open. Two opens within the same
//! second produce the same name and the second truncates the first.
//!
//! # Example
//!
//! ```ignore
//! use spool_sinks::{OutputRotator, RotatorConfig};
//!
//! let mut rotator = OutputRotator::new(RotatorConfig::new("dump"));
//! rotator.open(chrono::Local::now())?;
//! rotator.append(b"{\"id\":1}\n")?;
//! rotator.rotate_if_needed(chrono::Local::now(), false, None)?;
//! ```

mod stats;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use spool_sources::KeywordFilter;
use tracing::{debug, info};

use crate::common::SinkError;
use crate::util::chain_writer::{
    ChainWrite, ChainWriter, DEFAULT_BUFFER_SIZE, Lz4Writer, PlainTextWriter,
};

pub use stats::RotationStats;

/// Default records per data file
pub const DEFAULT_RECORDS_PER_FILE: u64 = 100_000;

/// Rotator configuration
#[derive(Debug, Clone)]
pub struct RotatorConfig {
    /// Root directory for month subdirectories
    pub root: PathBuf,

    /// Records per file before rotating
    pub records_per_file: u64,

    /// LZ4-compress data files
    pub compress: bool,

    /// Write buffer size
    pub buffer_size: usize,
}

impl RotatorConfig {
    /// Compressed output under `root` with default thresholds
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            records_per_file: DEFAULT_RECORDS_PER_FILE,
            compress: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    #[must_use]
    pub fn with_records_per_file(mut self, records: u64) -> Self {
        self.records_per_file = records;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// The currently open data file
struct OpenFile {
    /// Path without extension; sidecars hang off this
    base: PathBuf,
    data_path: PathBuf,
    handle: Box<dyn ChainWrite>,
    opened_at: DateTime<Local>,
    records: u64,
    raw_bytes: u64,
}

/// Count-based rotating file writer
pub struct OutputRotator {
    config: RotatorConfig,
    writer: Box<dyn ChainWriter>,
    current: Option<OpenFile>,
    rotations: u64,
}

impl OutputRotator {
    /// Create a rotator; no file is open until [`open`](Self::open)
    pub fn new(config: RotatorConfig) -> Self {
        let writer: Box<dyn ChainWriter> = if config.compress {
            Box::new(Lz4Writer::new(config.buffer_size))
        } else {
            Box::new(PlainTextWriter::new(config.buffer_size))
        };

        Self {
            config,
            writer,
            current: None,
            rotations: 0,
        }
    }

    /// Open a new data file named after `now`
    ///
    /// # Errors
    ///
    /// Fails if a file is already open or the directory or file cannot be
    /// created.
    pub fn open(&mut self, now: DateTime<Local>) -> Result<&Path, SinkError> {
        if let Some(current) = &self.current {
            return Err(SinkError::AlreadyOpen {
                path: current.data_path.clone(),
            });
        }

        let dir = self.config.root.join(now.format("%Y-%m").to_string());
        // create_dir_all treats an existing directory as success
        fs::create_dir_all(&dir).map_err(|e| SinkError::create_dir(&dir, e))?;

        let base = dir.join(now.format("%Y%m%d_%H%M%S").to_string());
        let data_path = with_suffix(&base, self.writer.file_extension());

        let file = File::create(&data_path).map_err(|e| SinkError::open(&data_path, e))?;
        let handle = self
            .writer
            .wrap(file)
            .map_err(|e| SinkError::open(&data_path, e))?;

        debug!(path = %data_path.display(), "opened output file");

        let current = self.current.insert(OpenFile {
            base,
            data_path,
            handle,
            opened_at: now,
            records: 0,
            raw_bytes: 0,
        });
        Ok(&current.data_path)
    }

    /// Count `count` records totalling `byte_len` raw bytes
    ///
    /// No-op when no file is open.
    pub fn record(&mut self, byte_len: u64, count: u64) {
        if let Some(current) = &mut self.current {
            current.records += count;
            current.raw_bytes += byte_len;
        }
    }

    /// Write one canonical record line and count it
    pub fn append(&mut self, line: &[u8]) -> Result<(), SinkError> {
        let current = self.current.as_mut().ok_or(SinkError::NotOpen)?;
        current
            .handle
            .write_all(line)
            .map_err(|e| SinkError::write(&current.data_path, e))?;
        self.record(line.len() as u64, 1);
        Ok(())
    }

    /// Rotate when the threshold is reached or when `stopping`
    ///
    /// Returns the closed file's stats if a rotation happened. With no file
    /// open this does nothing, so a file is finalized exactly once.
    pub fn rotate_if_needed(
        &mut self,
        now: DateTime<Local>,
        stopping: bool,
        filter: Option<&KeywordFilter>,
    ) -> Result<Option<RotationStats>, SinkError> {
        let due = self
            .current
            .as_ref()
            .is_some_and(|c| stopping || c.records >= self.config.records_per_file);
        if !due {
            return Ok(None);
        }
        self.rotate(now, stopping, filter)
    }

    /// Rotate unconditionally
    ///
    /// Closes the open file, even an empty one, and writes its sidecars.
    /// Unless `stopping`, the next file is opened at `now`.
    pub fn rotate(
        &mut self,
        now: DateTime<Local>,
        stopping: bool,
        filter: Option<&KeywordFilter>,
    ) -> Result<Option<RotationStats>, SinkError> {
        let Some(current) = self.current.take() else {
            return Ok(None);
        };

        let stats = finalize(current, now, filter)?;
        self.rotations += 1;

        info!(
            path = %stats.data_path.display(),
            records = stats.records,
            raw_bytes = stats.raw_bytes,
            compressed_bytes = stats.compressed_bytes,
            records_per_sec = stats.records_per_sec(),
            stopping,
            "rotated output file"
        );

        if !stopping {
            self.open(now)?;
        }
        Ok(Some(stats))
    }

    /// Whether a data file is open
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Path of the open data file
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|c| c.data_path.as_path())
    }

    /// Records written to the open file
    pub fn records_since_open(&self) -> u64 {
        self.current.as_ref().map_or(0, |c| c.records)
    }

    /// Raw bytes written to the open file
    pub fn raw_bytes_since_open(&self) -> u64 {
        self.current.as_ref().map_or(0, |c| c.raw_bytes)
    }

    /// Files closed so far
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    pub fn config(&self) -> &RotatorConfig {
        &self.config
    }
}

/// Close the file and write its sidecars
fn finalize(
    current: OpenFile,
    closed_at: DateTime<Local>,
    filter: Option<&KeywordFilter>,
) -> Result<RotationStats, SinkError> {
    let OpenFile {
        base,
        data_path,
        handle,
        opened_at,
        records,
        raw_bytes,
    } = current;

    handle
        .finish()
        .map_err(|e| SinkError::finalize(&data_path, e))?;
    let compressed_bytes = fs::metadata(&data_path)
        .map_err(|e| SinkError::finalize(&data_path, e))?
        .len();

    let stats = RotationStats {
        data_path,
        opened_at,
        closed_at,
        records,
        raw_bytes,
        compressed_bytes,
    };

    let stats_path = with_suffix(&base, ".stats");
    fs::write(&stats_path, stats.render()).map_err(|e| SinkError::sidecar(&stats_path, e))?;

    if let Some(filter) = filter {
        let keywords_path = with_suffix(&base, ".keywords");
        fs::write(&keywords_path, filter.dump())
            .map_err(|e| SinkError::sidecar(&keywords_path, e))?;
    }

    Ok(stats)
}

/// `base` + `suffix`, without treating dots in the base as an extension
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}
