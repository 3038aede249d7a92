//! Per-file throughput accounting
//!
//! Computed when a data file is closed and written next to it as a
//! `<base>.stats` sidecar.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, Local};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Throughput figures for one closed data file
#[derive(Debug, Clone, PartialEq)]
pub struct RotationStats {
    /// Closed data file
    pub data_path: PathBuf,

    /// When the file was opened
    pub opened_at: DateTime<Local>,

    /// When the file was closed
    pub closed_at: DateTime<Local>,

    /// Records written
    pub records: u64,

    /// Uncompressed bytes written
    pub raw_bytes: u64,

    /// Size of the closed file on disk
    pub compressed_bytes: u64,
}

impl RotationStats {
    /// Seconds the file was open (never negative)
    pub fn elapsed_secs(&self) -> f64 {
        let elapsed = self.closed_at.signed_duration_since(self.opened_at);
        (elapsed.num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    pub fn records_per_sec(&self) -> f64 {
        per_sec(self.records, self.elapsed_secs())
    }

    pub fn records_per_day(&self) -> f64 {
        self.records_per_sec() * SECONDS_PER_DAY
    }

    pub fn raw_bytes_per_sec(&self) -> f64 {
        per_sec(self.raw_bytes, self.elapsed_secs())
    }

    pub fn raw_bytes_per_day(&self) -> f64 {
        self.raw_bytes_per_sec() * SECONDS_PER_DAY
    }

    pub fn compressed_bytes_per_sec(&self) -> f64 {
        per_sec(self.compressed_bytes, self.elapsed_secs())
    }

    pub fn compressed_bytes_per_day(&self) -> f64 {
        self.compressed_bytes_per_sec() * SECONDS_PER_DAY
    }

    /// Raw bytes per compressed byte, 0 for an empty file
    pub fn compression_ratio(&self) -> f64 {
        if self.compressed_bytes == 0 {
            0.0
        } else {
            self.raw_bytes as f64 / self.compressed_bytes as f64
        }
    }

    /// Render the `.stats` sidecar contents
    pub fn render(&self) -> String {
        let file = self
            .data_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let rows: [(&str, String); 14] = [
            ("file", file),
            ("opened", self.opened_at.format("%Y-%m-%d %H:%M:%S %:z").to_string()),
            ("closed", self.closed_at.format("%Y-%m-%d %H:%M:%S %:z").to_string()),
            ("elapsed_secs", format!("{:.3}", self.elapsed_secs())),
            ("records", self.records.to_string()),
            ("records_per_sec", format!("{:.3}", self.records_per_sec())),
            ("records_per_day", format!("{:.0}", self.records_per_day())),
            ("raw_bytes", self.raw_bytes.to_string()),
            ("raw_bytes_per_sec", format!("{:.3}", self.raw_bytes_per_sec())),
            ("raw_bytes_per_day", format!("{:.0}", self.raw_bytes_per_day())),
            ("compressed_bytes", self.compressed_bytes.to_string()),
            ("compressed_bytes_per_sec", format!("{:.3}", self.compressed_bytes_per_sec())),
            ("compressed_bytes_per_day", format!("{:.0}", self.compressed_bytes_per_day())),
            ("compression_ratio", format!("{:.3}", self.compression_ratio())),
        ];

        let mut out = String::with_capacity(rows.len() * 48);
        for (key, value) in rows {
            let _ = writeln!(out, "{:<26}{}", format!("{}:", key), value);
        }
        out
    }
}

fn per_sec(count: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        count as f64 / elapsed_secs
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;
