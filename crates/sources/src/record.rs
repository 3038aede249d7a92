//! Decoded upstream record

use serde_json::Value;

/// One decoded unit from the upstream stream
///
/// Content is opaque to the ingestion loop; it is only re-encoded into its
/// canonical line form before being written out.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    value: Value,
}

impl Record {
    /// Wrap a decoded JSON value
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Borrow the decoded value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Append the canonical line form (compact JSON + `\n`) to `buf`
    pub fn encode_line(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(&mut *buf, &self.value)?;
        buf.push(b'\n');
        Ok(())
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
