//! Observability for firehose-batcher
//!
//! This module provides:
//! - Structured logging (`tracing`, JSON or text on stderr)
//! - Typed events, carried in every line's `event` field
//! - Per-session counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on batching or delivery
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use firehose_batcher::observability::{init_logging, Event, LogFormat, Severity};
//!
//! init_logging(Severity::Info, LogFormat::Json);
//! tracing::info!(event = %Event::FlushBegin, records = 42, "flush started");
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{init_logging, subscriber, LogFormat, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
