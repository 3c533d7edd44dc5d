//! Batching session
//!
//! Ties the accumulator, splitter and retrying sender together around one
//! injected bulk-write client.
//!
//! Flow:
//! 1. `append` admits records into the buffer
//! 2. `flush` splits the whole buffer into limit-satisfying batches
//! 3. each batch goes through the retrying sender, in buffer order
//! 4. the buffer is cleared only once every batch was accepted
//!
//! The first batch that fails aborts the flush; later batches are not
//! attempted. The buffer then holds exactly the records not known to be
//! accepted (the failing batch's still-rejected records followed by every
//! batch that was never attempted), so calling `flush` again resends only
//! those.

use super::accumulator::RecordBuffer;
use super::config::BatcherConfig;
use super::errors::{BatchError, BatchResult};
use super::limits::BatchLimits;
use super::record::{DeliveryTarget, Record};
use super::sender::{RetryingSender, SendFailure};
use super::splitter::Splitter;
use crate::client::PutRecordBatch;
use crate::observability::{Event, MetricsRegistry};

/// Summary of a successful flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    /// Records delivered by this flush
    pub records: usize,
    /// Batches the buffer was split into
    pub batches: usize,
    /// Bulk-write calls made, retries included
    pub put_calls: u64,
}

/// One batching session writing to a single delivery target.
#[derive(Debug)]
pub struct BatchingSession<C> {
    target: DeliveryTarget,
    buffer: RecordBuffer,
    splitter: Splitter,
    sender: RetryingSender,
    client: C,
    metrics: MetricsRegistry,
}

impl<C: PutRecordBatch> BatchingSession<C> {
    /// Session with default limits and retry budget.
    pub fn new(target: impl Into<DeliveryTarget>, client: C) -> Self {
        let limits = BatchLimits::default();
        Self {
            target: target.into(),
            buffer: RecordBuffer::new(limits),
            splitter: Splitter::new(limits),
            sender: RetryingSender::default(),
            client,
            metrics: MetricsRegistry::new(),
        }
    }

    /// Session built from validated configuration.
    pub fn from_config(config: &BatcherConfig, client: C) -> BatchResult<Self> {
        config.validate()?;
        let limits = config.limits()?;
        Ok(Self {
            target: config.delivery_target.clone(),
            buffer: RecordBuffer::new(limits),
            splitter: Splitter::new(limits),
            sender: RetryingSender::new(config.max_retries)?,
            client,
            metrics: MetricsRegistry::new(),
        })
    }

    /// Replace the limits. Only allowed while the buffer is empty, since
    /// already-admitted records were checked against the old ones. On error
    /// the session is left as it was.
    pub fn set_limits(&mut self, limits: BatchLimits) -> BatchResult<()> {
        if !self.buffer.is_empty() {
            return Err(BatchError::InvalidConfig(
                "limits cannot change while records are buffered".to_string(),
            ));
        }
        self.buffer = RecordBuffer::new(limits);
        self.splitter = Splitter::new(limits);
        Ok(())
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> BatchResult<Self> {
        self.sender = RetryingSender::new(max_retries)?;
        Ok(self)
    }

    /// Admit one record, or hand it back inside `RecordTooLarge`.
    pub fn append(&mut self, record: impl Into<Record>) -> BatchResult<()> {
        let record = record.into();
        let len = record.len();
        match self.buffer.append(record) {
            Ok(()) => {
                self.metrics.increment_records_appended();
                Ok(())
            }
            Err(e) => {
                self.metrics.increment_records_rejected_too_large();
                tracing::warn!(
                    event = %Event::AppendRejected,
                    delivery_target = %self.target,
                    bytes = len,
                    max_bytes_per_record = self.buffer.limits().max_bytes_per_record(),
                    "record too large for bulk write"
                );
                Err(e)
            }
        }
    }

    /// Admit records in order, stopping at the first one that is too large.
    pub fn extend<I, R>(&mut self, records: I) -> BatchResult<()>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        for record in records {
            self.append(record)?;
        }
        Ok(())
    }

    /// Number of buffered records waiting for a flush.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffered_bytes(&self) -> usize {
        self.buffer.total_bytes()
    }

    pub fn buffered_records(&self) -> &[Record] {
        self.buffer.records()
    }

    /// Send every buffered record.
    ///
    /// An empty buffer is a no-op that makes no bulk-write call.
    pub fn flush(&mut self) -> BatchResult<FlushReport> {
        if self.buffer.is_empty() {
            return Ok(FlushReport::default());
        }

        let records = self.buffer.take();
        let put_calls_before = self.metrics.put_calls();
        self.metrics.increment_flushes();
        tracing::info!(
            event = %Event::FlushBegin,
            delivery_target = %self.target,
            records = records.len(),
            "flush started"
        );

        let batches = self.splitter.split(&records);
        tracing::debug!(
            event = %Event::BatchSplit,
            delivery_target = %self.target,
            records = records.len(),
            batches = batches.len(),
            "buffer split into batches"
        );

        let mut sent = 0usize;
        for (index, batch) in batches.iter().enumerate() {
            match self
                .sender
                .send(&mut self.client, &self.target, batch, &self.metrics)
            {
                Ok(_) => {
                    self.metrics.increment_batches_sent();
                    sent += batch.len();
                }
                Err(SendFailure { error, mut unsent }) => {
                    let untouched = &records[sent + batch.len()..];
                    unsent.extend_from_slice(untouched);
                    tracing::error!(
                        event = %Event::FlushFailed,
                        delivery_target = %self.target,
                        batch = index,
                        batches = batches.len(),
                        retained = unsent.len(),
                        error = %error,
                        "flush aborted"
                    );
                    self.metrics.increment_flushes_failed();
                    self.buffer.restore(unsent);
                    return Err(error);
                }
            }
        }

        let report = FlushReport {
            records: records.len(),
            batches: batches.len(),
            put_calls: self.metrics.put_calls() - put_calls_before,
        };
        tracing::info!(
            event = %Event::FlushComplete,
            delivery_target = %self.target,
            records = report.records,
            batches = report.batches,
            put_calls = report.put_calls,
            "flush complete"
        );
        Ok(report)
    }

    pub fn delivery_target(&self) -> &DeliveryTarget {
        &self.target
    }

    pub fn limits(&self) -> &BatchLimits {
        self.splitter.limits()
    }

    pub fn max_retries(&self) -> u32 {
        self.sender.max_retries()
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Tear the session down, returning the client.
    ///
    /// Buffered records that were never flushed are dropped.
    pub fn into_client(self) -> C {
        self.client
    }
}
