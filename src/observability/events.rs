//! Observable batcher events
//!
//! Every log line the batcher emits carries one of these as its `event` field,
//! so the stream can be filtered without parsing messages.

use std::fmt;

/// Observable events in a batching session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Admission
    /// Record refused at append time for being too large
    AppendRejected,

    // Flush lifecycle
    /// Flush started on a non-empty buffer
    FlushBegin,
    /// Every sub-batch was accepted, buffer cleared
    FlushComplete,
    /// Flush aborted, unsent records kept in the buffer
    FlushFailed,

    // Batches
    /// Buffer partitioned into sub-batches
    BatchSplit,
    /// Bulk write issued
    BatchSend,
    /// Bulk write came back with some records rejected
    BatchPartialFailure,
    /// Rejected records resubmitted
    BatchRetry,
    /// Every record of a sub-batch accepted
    BatchDelivered,

    // Failures
    /// Retry budget spent with records still rejected (FATAL)
    RetriesExhausted,
    /// Bulk-write capability failed outright (FATAL)
    ClientFailed,

    // CLI
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Input fully consumed
    InputDrained,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::AppendRejected => "APPEND_REJECTED",
            Event::FlushBegin => "FLUSH_BEGIN",
            Event::FlushComplete => "FLUSH_COMPLETE",
            Event::FlushFailed => "FLUSH_FAILED",
            Event::BatchSplit => "BATCH_SPLIT",
            Event::BatchSend => "BATCH_SEND",
            Event::BatchPartialFailure => "BATCH_PARTIAL_FAILURE",
            Event::BatchRetry => "BATCH_RETRY",
            Event::BatchDelivered => "BATCH_DELIVERED",
            Event::RetriesExhausted => "RETRIES_EXHAUSTED",
            Event::ClientFailed => "CLIENT_FAILED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::InputDrained => "INPUT_DRAINED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
