//! Record batching for bulk-write destinations
//!
//! Adapts an unbounded stream of opaque records into bulk writes that respect
//! a destination's hard limits, and retries only what a write rejected.
//!
//! # Components
//!
//! - Accumulator (`RecordBuffer`): ordered buffer, owns admission checks
//! - Splitter: halves overflowing runs until every batch fits
//! - Retrying sender: resubmits rejected records, bounded by `max_retries`
//! - Session (`BatchingSession`): ties the three to an injected client
//!
//! # Guarantees
//!
//! - Every batch sent has fewer records than `max_records_per_batch` and
//!   fewer bytes than `max_bytes_per_batch`
//! - A successful flush sends each buffered record, in buffer order
//! - A retry resends exactly the records the previous attempt rejected
//! - No delivery guarantee beyond at-least-once: a record accepted by the
//!   destination but reported rejected will be sent again

mod accumulator;
mod config;
mod errors;
mod limits;
mod record;
mod sender;
mod session;
mod splitter;

pub use accumulator::RecordBuffer;
pub use config::BatcherConfig;
pub use errors::{BatchError, BatchErrorCode, BatchResult, Severity};
pub use limits::{BatchLimits, MAX_BYTES_PER_BATCH, MAX_BYTES_PER_RECORD, MAX_RECORDS_PER_BATCH};
pub use record::{packet_size, DeliveryTarget, Record};
pub use sender::{retain_rejected, RetryingSender, SendFailure, SendReport, DEFAULT_MAX_RETRIES};
pub use session::{BatchingSession, FlushReport};
pub use splitter::Splitter;
