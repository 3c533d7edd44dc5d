//! firehose-batcher - limit-respecting bulk writes with partial-failure retries
//!
//! Records are appended to a [`batcher::BatchingSession`], which on flush
//! splits them into requests the destination will accept and pushes each
//! through an injected [`client::PutRecordBatch`] capability.

pub mod batcher;
pub mod cli;
pub mod client;
pub mod observability;

pub use batcher::{BatchError, BatchResult, BatcherConfig, BatchingSession, Record};
pub use client::{PutOutcome, PutRecordBatch, RecordOutcome};
