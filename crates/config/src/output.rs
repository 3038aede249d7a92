//! Output file configuration

use std::path::PathBuf;

use serde::Deserialize;

/// Compression for output data files
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Uncompressed JSON lines
    None,
    /// LZ4 frame compression (default)
    #[default]
    Lz4,
}

/// Rotating output configuration
///
/// Files land in `<path>/<YYYY-MM>/<YYYYMMDD_HHMMSS>.jsonl[.lz4]`.
///
/// # Example
///
/// ```toml
/// [output]
/// path = "dump/"
/// records_per_file = 100000
/// compression = "lz4"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Dump root directory
    /// Default: dump
    pub path: PathBuf,

    /// Records written before the file is rotated
    /// Default: 100000
    pub records_per_file: u64,

    /// Data file compression
    /// Default: lz4
    pub compression: Compression,

    /// Write buffer size in bytes
    /// Default: 1 MiB
    pub buffer_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dump"),
            records_per_file: 100_000,
            compression: Compression::Lz4,
            buffer_size: 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OutputConfig::default();
        assert_eq!(config.path, PathBuf::from("dump"));
        assert_eq!(config.records_per_file, 100_000);
        assert_eq!(config.compression, Compression::Lz4);
    }

    #[test]
    fn test_compression_none() {
        let config: OutputConfig = toml::from_str(r#"compression = "none""#).unwrap();
        assert_eq!(config.compression, Compression::None);
    }
}
