//! Batcher error types
//!
//! Error codes:
//! - BATCH_RECORD_TOO_LARGE (ERROR severity)
//! - BATCH_RETRIES_EXHAUSTED (FATAL severity)
//! - BATCH_CLIENT_FAILED (FATAL severity)
//! - BATCH_MALFORMED_OUTCOME (FATAL severity)
//! - BATCH_INVALID_LIMITS (ERROR severity)
//! - BATCH_INVALID_CONFIG (ERROR severity)
//!
//! FATAL errors abort the flush in progress. ERROR errors are reported to the
//! caller and leave the session usable.

use std::fmt;

use thiserror::Error;

use super::record::Record;
use crate::client::ClientError;

/// Severity levels for batcher errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, session continues
    Error,
    /// The in-progress flush is aborted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Stable error codes, one per [`BatchError`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchErrorCode {
    RecordTooLarge,
    RetriesExhausted,
    ClientFailed,
    MalformedOutcome,
    InvalidLimits,
    InvalidConfig,
}

impl BatchErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            BatchErrorCode::RecordTooLarge => "BATCH_RECORD_TOO_LARGE",
            BatchErrorCode::RetriesExhausted => "BATCH_RETRIES_EXHAUSTED",
            BatchErrorCode::ClientFailed => "BATCH_CLIENT_FAILED",
            BatchErrorCode::MalformedOutcome => "BATCH_MALFORMED_OUTCOME",
            BatchErrorCode::InvalidLimits => "BATCH_INVALID_LIMITS",
            BatchErrorCode::InvalidConfig => "BATCH_INVALID_CONFIG",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            BatchErrorCode::RecordTooLarge => Severity::Error,
            BatchErrorCode::RetriesExhausted => Severity::Fatal,
            BatchErrorCode::ClientFailed => Severity::Fatal,
            BatchErrorCode::MalformedOutcome => Severity::Fatal,
            BatchErrorCode::InvalidLimits => Severity::Error,
            BatchErrorCode::InvalidConfig => Severity::Error,
        }
    }
}

impl fmt::Display for BatchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while admitting, splitting or delivering records
#[derive(Debug, Error)]
pub enum BatchError {
    /// The record can never be delivered through the bulk-write path.
    ///
    /// Callers that still need the data delivered must route it out of band,
    /// e.g. by uploading it to the destination's backing store directly.
    #[error("record of {} bytes exceeds the per-record limit of {max_bytes_per_record} bytes", .record.len())]
    RecordTooLarge {
        record: Record,
        max_bytes_per_record: usize,
    },

    /// A sub-batch still reported failures once the retry budget was spent
    #[error("{failed_count} records still failed to send after {attempts} tries")]
    RetriesExhausted { failed_count: usize, attempts: u32 },

    /// The bulk-write capability itself failed
    #[error("bulk write failed: {0}")]
    Client(#[from] ClientError),

    /// The capability answered with an outcome that does not line up with the request
    #[error(
        "malformed put outcome: {received} results for {expected} records, \
         failed_count {reported_failed} but {counted_failed} rejections"
    )]
    MalformedOutcome {
        expected: usize,
        received: usize,
        reported_failed: usize,
        counted_failed: usize,
    },

    #[error("invalid batch limits: {0}")]
    InvalidLimits(String),

    #[error("invalid batcher configuration: {0}")]
    InvalidConfig(String),
}

impl BatchError {
    /// Returns the error code
    pub fn code(&self) -> BatchErrorCode {
        match self {
            BatchError::RecordTooLarge { .. } => BatchErrorCode::RecordTooLarge,
            BatchError::RetriesExhausted { .. } => BatchErrorCode::RetriesExhausted,
            BatchError::Client(_) => BatchErrorCode::ClientFailed,
            BatchError::MalformedOutcome { .. } => BatchErrorCode::MalformedOutcome,
            BatchError::InvalidLimits(_) => BatchErrorCode::InvalidLimits,
            BatchError::InvalidConfig(_) => BatchErrorCode::InvalidConfig,
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Returns whether this error aborted a flush
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// The rejected record, for `RecordTooLarge`
    pub fn record(&self) -> Option<&Record> {
        match self {
            BatchError::RecordTooLarge { record, .. } => Some(record),
            _ => None,
        }
    }

    /// Hands the rejected record back to the caller, for `RecordTooLarge`
    pub fn into_record(self) -> Option<Record> {
        match self {
            BatchError::RecordTooLarge { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Result type for batcher operations
pub type BatchResult<T> = Result<T, BatchError>;
