//! Common types for the output sink

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Output sink errors
///
/// Every variant carries the path involved so operators can find the
/// offending file without enabling debug logs.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Output directory could not be created
    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// Data file could not be opened
    #[error("failed to open '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// Write into the open data file failed
    #[error("write to '{}' failed: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Data file could not be flushed and closed
    #[error("failed to finalize '{}': {source}", path.display())]
    Finalize { path: PathBuf, source: io::Error },

    /// `.stats` or `.keywords` sidecar could not be written
    #[error("failed to write sidecar '{}': {source}", path.display())]
    Sidecar { path: PathBuf, source: io::Error },

    /// Append attempted with no data file open
    #[error("no output file is open")]
    NotOpen,

    /// Open attempted while a data file is already open
    #[error("output file '{}' is already open", path.display())]
    AlreadyOpen { path: PathBuf },
}

impl SinkError {
    /// Create a directory creation error
    pub fn create_dir(path: &Path, source: io::Error) -> Self {
        Self::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an open error
    pub fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a write error
    pub fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a finalize error
    pub fn finalize(path: &Path, source: io::Error) -> Self {
        Self::Finalize {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a sidecar error
    pub fn sidecar(path: &Path, source: io::Error) -> Self {
        Self::Sidecar {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;
