//! Destination limits for bulk writes
//!
//! A bulk write is bounded three ways:
//! - records per request
//! - bytes per request
//! - bytes per individual record
//!
//! Both batch bounds are exclusive: a batch qualifies only when it is strictly
//! below each of them. The same holds for a single record.

use super::errors::{BatchError, BatchResult};
use super::record::{packet_size, Record};

/// Default cap on the summed size of one request (4 MiB).
pub const MAX_BYTES_PER_BATCH: usize = 4 * 1024 * 1024;
/// Default cap on the number of records in one request.
pub const MAX_RECORDS_PER_BATCH: usize = 500;
/// Default cap on the size of a single record (1000 KiB).
pub const MAX_BYTES_PER_RECORD: usize = 1000 * 1024;

/// Immutable limit triple for one destination.
///
/// Invariants (checked by [`BatchLimits::new`]):
/// - `max_bytes_per_record < max_bytes_per_batch`
/// - `max_records_per_batch >= 2`
///
/// Together they guarantee that a batch of one admitted record never
/// overflows, which is what makes splitting terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    max_bytes_per_batch: usize,
    max_records_per_batch: usize,
    max_bytes_per_record: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_bytes_per_batch: MAX_BYTES_PER_BATCH,
            max_records_per_batch: MAX_RECORDS_PER_BATCH,
            max_bytes_per_record: MAX_BYTES_PER_RECORD,
        }
    }
}

impl BatchLimits {
    /// Create validated limits.
    pub fn new(
        max_bytes_per_batch: usize,
        max_records_per_batch: usize,
        max_bytes_per_record: usize,
    ) -> BatchResult<Self> {
        if max_bytes_per_record == 0 {
            return Err(BatchError::InvalidLimits(
                "max_bytes_per_record must be > 0".to_string(),
            ));
        }
        if max_bytes_per_record >= max_bytes_per_batch {
            return Err(BatchError::InvalidLimits(format!(
                "max_bytes_per_record ({}) must be below max_bytes_per_batch ({})",
                max_bytes_per_record, max_bytes_per_batch
            )));
        }
        if max_records_per_batch < 2 {
            return Err(BatchError::InvalidLimits(format!(
                "max_records_per_batch must be >= 2, got {}",
                max_records_per_batch
            )));
        }

        Ok(Self {
            max_bytes_per_batch,
            max_records_per_batch,
            max_bytes_per_record,
        })
    }

    pub fn max_bytes_per_batch(&self) -> usize {
        self.max_bytes_per_batch
    }

    pub fn max_records_per_batch(&self) -> usize {
        self.max_records_per_batch
    }

    pub fn max_bytes_per_record(&self) -> usize {
        self.max_bytes_per_record
    }

    /// Whether a single record may be admitted.
    pub fn admits(&self, record: &Record) -> bool {
        record.len() < self.max_bytes_per_record
    }

    /// Whether a candidate batch breaks the record-count or byte-size limit.
    pub fn overflows(&self, records: &[Record]) -> bool {
        if records.len() >= self.max_records_per_batch {
            return true;
        }

        packet_size(records) >= self.max_bytes_per_batch
    }
}
