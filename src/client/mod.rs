//! Bulk-write capability
//!
//! The batcher never talks to a network itself. Every request goes through a
//! [`PutRecordBatch`] implementation injected at construction time. It takes
//! an ordered batch that already satisfies the destination limits and
//! answers with one outcome per record.
//!
//! Transport concerns (connection handling, throttling backoff,
//! authentication) belong to the implementation, not to the batcher.

pub mod jsonl;
pub mod memory;

use std::error::Error as StdError;
use std::fmt;

use crate::batcher::{DeliveryTarget, Record};

pub use jsonl::JsonLinesClient;
pub use memory::{RecordedCall, RecordingClient};

/// Result of a single record within a bulk write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The destination took the record and assigned it an identifier.
    Accepted { record_id: String },
    /// The destination refused the record this time around.
    Rejected {
        error_code: Option<String>,
        error_message: Option<String>,
    },
}

impl RecordOutcome {
    pub fn accepted(record_id: impl Into<String>) -> Self {
        RecordOutcome::Accepted {
            record_id: record_id.into(),
        }
    }

    /// A rejection without any detail from the destination.
    pub fn rejected() -> Self {
        RecordOutcome::Rejected {
            error_code: None,
            error_message: None,
        }
    }

    pub fn rejected_with(code: impl Into<String>, message: impl Into<String>) -> Self {
        RecordOutcome::Rejected {
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, RecordOutcome::Accepted { .. })
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_accepted()
    }

    pub fn record_id(&self) -> Option<&str> {
        match self {
            RecordOutcome::Accepted { record_id } => Some(record_id),
            RecordOutcome::Rejected { .. } => None,
        }
    }
}

/// Answer to one bulk write.
///
/// `records` lines up positionally with the request. `failed_count` is the
/// destination's own tally of rejections and must match `records`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    pub failed_count: usize,
    pub records: Vec<RecordOutcome>,
}

impl PutOutcome {
    pub fn new(failed_count: usize, records: Vec<RecordOutcome>) -> Self {
        Self {
            failed_count,
            records,
        }
    }

    /// Build an outcome whose `failed_count` is derived from `records`.
    pub fn from_records(records: Vec<RecordOutcome>) -> Self {
        let failed_count = records.iter().filter(|r| r.is_rejected()).count();
        Self {
            failed_count,
            records,
        }
    }

    /// Number of entries that are rejections.
    pub fn rejected_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_rejected()).count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0
    }
}

/// Failure of the bulk-write capability itself, as opposed to per-record
/// rejections reported inside a [`PutOutcome`].
#[derive(Debug)]
pub struct ClientError {
    message: String,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ClientError {
    pub fn new(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl StdError for ClientError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn StdError + 'static))
    }
}

/// The injected bulk-write capability.
pub trait PutRecordBatch {
    /// Write `records` to `target` in one request.
    ///
    /// `records` is never empty and always satisfies the session's limits.
    fn put_record_batch(
        &mut self,
        target: &DeliveryTarget,
        records: &[Record],
    ) -> Result<PutOutcome, ClientError>;
}

impl<T: PutRecordBatch + ?Sized> PutRecordBatch for &mut T {
    fn put_record_batch(
        &mut self,
        target: &DeliveryTarget,
        records: &[Record],
    ) -> Result<PutOutcome, ClientError> {
        (**self).put_record_batch(target, records)
    }
}

impl<T: PutRecordBatch + ?Sized> PutRecordBatch for Box<T> {
    fn put_record_batch(
        &mut self,
        target: &DeliveryTarget,
        records: &[Record],
    ) -> Result<PutOutcome, ClientError> {
        (**self).put_record_batch(target, records)
    }
}
