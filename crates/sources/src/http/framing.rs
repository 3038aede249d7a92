//! Newline-delimited record framing
//!
//! Accumulates body chunks and splits them into lines. Chunk boundaries do
//! not line up with record boundaries, so partial lines stay buffered until
//! their terminating `\n` arrives.

use bytes::{Bytes, BytesMut};

use crate::error::SourceError;

/// Splits a byte stream into `\n`-terminated lines
#[derive(Debug)]
pub struct LineFramer {
    buffer: BytesMut,

    /// Bytes already searched for a newline
    scanned: usize,

    max_line_bytes: usize,
}

impl LineFramer {
    /// Create a framer that rejects lines longer than `max_line_bytes`
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(64 * 1024),
            scanned: 0,
            max_line_bytes,
        }
    }

    /// Append a body chunk
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Take the next complete line, without its terminator
    ///
    /// Trailing `\r` is stripped. Blank lines are returned as empty `Bytes`;
    /// callers decide whether they are keep-alives.
    ///
    /// # Errors
    ///
    /// Returns a framing error once the buffered partial line exceeds the
    /// maximum line length.
    pub fn next_line(&mut self) -> Result<Option<Bytes>, SourceError> {
        let found = self.buffer[self.scanned..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|pos| self.scanned + pos);

        match found {
            Some(pos) => {
                let mut line = self.buffer.split_to(pos + 1);
                self.scanned = 0;
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(pos - 1);
                }
                if line.len() > self.max_line_bytes {
                    return Err(too_long(line.len(), self.max_line_bytes));
                }
                Ok(Some(line.freeze()))
            }
            None => {
                self.scanned = self.buffer.len();
                // +1 leaves room for a `\r` whose `\n` is still in flight
                if self.buffer.len() > self.max_line_bytes + 1 {
                    return Err(too_long(self.buffer.len(), self.max_line_bytes));
                }
                Ok(None)
            }
        }
    }

    /// Bytes of an incomplete trailing line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn too_long(len: usize, max: usize) -> SourceError {
    SourceError::framing(format!("line of {} bytes exceeds limit of {}", len, max))
}

#[cfg(test)]
#[path = "framing_test.rs"]
mod framing_test;
