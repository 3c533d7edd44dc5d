//! Records and delivery targets
//!
//! A record is an opaque byte string. The batcher never looks inside it; only
//! its length matters for the batch limits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One opaque record awaiting delivery.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Record(Vec<u8>);

impl Record {
    /// Wrap raw bytes as a record.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    /// Byte length of the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Preview only; payloads can be close to a megabyte.
        const PREVIEW: usize = 32;
        if self.0.len() <= PREVIEW {
            write!(f, "Record({:?})", String::from_utf8_lossy(&self.0))
        } else {
            write!(
                f,
                "Record({:?}.. {} bytes)",
                String::from_utf8_lossy(&self.0[..PREVIEW]),
                self.0.len()
            )
        }
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Record {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<&[u8]> for Record {
    fn from(data: &[u8]) -> Self {
        Self(data.to_vec())
    }
}

impl From<String> for Record {
    fn from(data: String) -> Self {
        Self(data.into_bytes())
    }
}

impl From<&str> for Record {
    fn from(data: &str) -> Self {
        Self(data.as_bytes().to_vec())
    }
}

/// Total byte size of a run of records.
pub fn packet_size(records: &[Record]) -> usize {
    records.iter().map(Record::len).sum()
}

/// Logical destination of every bulk write in a session, e.g. a delivery stream name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryTarget(String);

impl DeliveryTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeliveryTarget {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DeliveryTarget {
    fn from(name: String) -> Self {
        Self(name)
    }
}
