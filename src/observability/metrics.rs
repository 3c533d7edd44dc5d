//! Metrics registry for a batching session
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only when the session is created

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of one batching session.
///
/// Counters are atomics so they can be bumped through a shared reference
/// while the session is mutably borrowed by a flush.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Records admitted to the buffer
    records_appended: AtomicU64,
    /// Records refused for exceeding the per-record limit
    records_rejected_too_large: AtomicU64,
    /// Non-empty flushes started
    flushes: AtomicU64,
    /// Flushes that ended in an error
    flushes_failed: AtomicU64,
    /// Sub-batches the destination fully accepted
    batches_sent: AtomicU64,
    /// Bulk-write calls, retries included
    put_calls: AtomicU64,
    /// Records the destination accepted
    records_delivered: AtomicU64,
    /// Bytes the destination accepted
    bytes_delivered: AtomicU64,
    /// Records resubmitted after a rejection
    records_retried: AtomicU64,
    /// Sub-batches that ran out of retries
    retries_exhausted: AtomicU64,
}

impl MetricsRegistry {
    /// Create a registry with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_records_appended(&self) {
        self.records_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_rejected_too_large(&self) {
        self.records_rejected_too_large.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_flushes(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_flushes_failed(&self) {
        self.flushes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_batches_sent(&self) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_put_calls(&self) {
        self.put_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a set of accepted records and their summed size
    pub fn add_delivered(&self, records: u64, bytes: u64) {
        self.records_delivered.fetch_add(records, Ordering::Relaxed);
        self.bytes_delivered.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_records_retried(&self, records: u64) {
        self.records_retried.fetch_add(records, Ordering::Relaxed);
    }

    pub fn increment_retries_exhausted(&self) {
        self.retries_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn put_calls(&self) -> u64 {
        self.put_calls.load(Ordering::Relaxed)
    }

    pub fn records_delivered(&self) -> u64 {
        self.records_delivered.load(Ordering::Relaxed)
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_appended: self.records_appended.load(Ordering::Relaxed),
            records_rejected_too_large: self.records_rejected_too_large.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            flushes_failed: self.flushes_failed.load(Ordering::Relaxed),
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            put_calls: self.put_calls.load(Ordering::Relaxed),
            records_delivered: self.records_delivered.load(Ordering::Relaxed),
            bytes_delivered: self.bytes_delivered.load(Ordering::Relaxed),
            records_retried: self.records_retried.load(Ordering::Relaxed),
            retries_exhausted: self.retries_exhausted.load(Ordering::Relaxed),
        }
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub records_appended: u64,
    pub records_rejected_too_large: u64,
    pub flushes: u64,
    pub flushes_failed: u64,
    pub batches_sent: u64,
    pub put_calls: u64,
    pub records_delivered: u64,
    pub bytes_delivered: u64,
    pub records_retried: u64,
    pub retries_exhausted: u64,
}
