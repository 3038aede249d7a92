//! Keyword filter
//!
//! An immutable, sorted set of lower-cased filter terms loaded from a plain
//! text file (one term per line, `#` comments and blank lines ignored).
//!
//! The filter carries a SHA-256 content hash so that the `.keywords` dump
//! written next to each output file identifies exactly which filter produced
//! the data.

use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::SourceError;

/// Lower-cased, deduplicated, sorted filter terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordFilter {
    terms: BTreeSet<String>,
    hash: String,
}

impl KeywordFilter {
    /// Build a filter from terms
    ///
    /// Terms are trimmed and lower-cased; empty terms are dropped.
    /// Returns `None` when nothing remains.
    pub fn from_terms<I, S>(terms: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: BTreeSet<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if terms.is_empty() {
            return None;
        }

        let hash = content_hash(&terms);
        Some(Self { terms, hash })
    }

    /// Parse keyword file contents
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_terms(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Load and parse a keyword file
    ///
    /// # Errors
    ///
    /// Returns `KeywordFile` if the file cannot be read and `NoKeywords` if it
    /// contains no terms.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|e| SourceError::KeywordFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&text).ok_or_else(|| SourceError::NoKeywords {
            path: path.to_path_buf(),
        })
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always false; an empty filter cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in sorted order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Hex-encoded SHA-256 over the sorted terms
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Comma-joined terms for the upstream `track` parameter
    pub fn track_param(&self) -> String {
        self.terms().collect::<Vec<_>>().join(",")
    }

    /// Render the `.keywords` dump: a JSON header comment then one term per line
    pub fn dump(&self) -> String {
        let body: usize = self.terms.iter().map(|t| t.len() + 1).sum();
        let mut out = String::with_capacity(64 + body);
        let _ = writeln!(
            out,
            "# {{\"keyword_count\": {}, \"hash\": \"{}\"}}",
            self.len(),
            self.hash
        );
        for term in &self.terms {
            out.push_str(term);
            out.push('\n');
        }
        out
    }
}

fn content_hash(terms: &BTreeSet<String>) -> String {
    let mut hasher = Sha256::new();
    for term in terms {
        hasher.update(term.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
