//! Retrying sender
//!
//! Drives one limit-satisfying batch through the bulk-write capability.
//!
//! The destination may accept part of a request and reject the rest, e.g.
//! while it is throttling. Only the rejected records are resubmitted, in
//! their original relative order, until either nothing is rejected or the
//! retry budget is spent.
//!
//! The pending set is rebuilt on every attempt by [`retain_rejected`]. The
//! first attempt borrows the caller's slice; later attempts own the
//! (shrinking) rejected subset.

use std::borrow::Cow;

use super::errors::{BatchError, BatchResult};
use super::record::{packet_size, DeliveryTarget, Record};
use crate::client::{PutOutcome, PutRecordBatch, RecordOutcome};
use crate::observability::{Event, MetricsRegistry};

/// Default number of attempts before a batch is given up on.
pub const DEFAULT_MAX_RETRIES: u32 = 100;

/// Summary of a batch that was fully accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReport {
    /// Bulk-write calls made, first attempt included
    pub attempts: u32,
    /// Records in the batch
    pub records_delivered: usize,
    /// Record resubmissions across all retries
    pub records_retried: usize,
}

/// Failure of one batch, with the records still not known to be accepted.
#[derive(Debug)]
pub struct SendFailure {
    pub error: BatchError,
    /// Records of the batch that were not accepted, in order
    pub unsent: Vec<Record>,
}

/// Sends batches with partial-failure retries.
#[derive(Debug, Clone, Copy)]
pub struct RetryingSender {
    max_retries: u32,
}

impl Default for RetryingSender {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryingSender {
    /// Create a sender making at most `max_retries` calls per batch.
    ///
    /// `max_retries` counts every call, the first included, so 0 is
    /// rejected with `InvalidConfig` instead of being treated as a single
    /// call that is never retried.
    pub fn new(max_retries: u32) -> BatchResult<Self> {
        if max_retries == 0 {
            return Err(BatchError::InvalidConfig(
                "max_retries must be >= 1".to_string(),
            ));
        }
        Ok(Self { max_retries })
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Deliver `batch` to `target`, resubmitting rejected records.
    ///
    /// Each call to this method starts counting attempts from zero.
    pub fn send<C>(
        &self,
        client: &mut C,
        target: &DeliveryTarget,
        batch: &[Record],
        metrics: &MetricsRegistry,
    ) -> Result<SendReport, SendFailure>
    where
        C: PutRecordBatch + ?Sized,
    {
        let mut pending: Cow<'_, [Record]> = Cow::Borrowed(batch);
        let mut attempts: u32 = 0;
        let mut records_retried = 0usize;

        loop {
            tracing::trace!(
                event = %Event::BatchSend,
                delivery_target = %target,
                records = pending.len(),
                bytes = packet_size(&pending),
                attempt = attempts + 1,
                "sending batch"
            );
            metrics.increment_put_calls();

            let outcome = match client.put_record_batch(target, &pending) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(
                        event = %Event::ClientFailed,
                        delivery_target = %target,
                        records = pending.len(),
                        error = %e,
                        "bulk write failed"
                    );
                    return Err(SendFailure {
                        error: BatchError::Client(e),
                        unsent: pending.into_owned(),
                    });
                }
            };

            if let Err(error) = check_outcome(&pending, &outcome) {
                tracing::error!(
                    event = %Event::ClientFailed,
                    delivery_target = %target,
                    error = %error,
                    "bulk write returned a malformed outcome"
                );
                return Err(SendFailure {
                    error,
                    unsent: pending.into_owned(),
                });
            }

            let delivered: Vec<&Record> = pending
                .iter()
                .zip(&outcome.records)
                .filter(|(_, result)| result.is_accepted())
                .map(|(record, _)| record)
                .collect();
            metrics.add_delivered(
                delivered.len() as u64,
                delivered.iter().map(|r| r.len() as u64).sum(),
            );

            if outcome.failed_count == 0 {
                tracing::debug!(
                    event = %Event::BatchDelivered,
                    delivery_target = %target,
                    records = batch.len(),
                    attempts = attempts + 1,
                    "batch delivered"
                );
                return Ok(SendReport {
                    attempts: attempts + 1,
                    records_delivered: batch.len(),
                    records_retried,
                });
            }

            attempts += 1;
            log_partial_failure(target, &outcome, attempts);

            if attempts >= self.max_retries {
                tracing::error!(
                    event = %Event::RetriesExhausted,
                    delivery_target = %target,
                    failed_count = outcome.failed_count,
                    attempts,
                    "records still failed to send after all tries"
                );
                metrics.increment_retries_exhausted();
                return Err(SendFailure {
                    error: BatchError::RetriesExhausted {
                        failed_count: outcome.failed_count,
                        attempts,
                    },
                    unsent: retain_rejected(&pending, &outcome.records),
                });
            }

            pending = Cow::Owned(retain_rejected(&pending, &outcome.records));
            records_retried += pending.len();
            metrics.add_records_retried(pending.len() as u64);
            tracing::debug!(
                event = %Event::BatchRetry,
                delivery_target = %target,
                records = pending.len(),
                attempt = attempts + 1,
                "retrying rejected records"
            );
        }
    }
}

/// The records of `pending` whose outcome was a rejection, in order.
///
/// `outcomes` must line up positionally with `pending`.
pub fn retain_rejected(pending: &[Record], outcomes: &[RecordOutcome]) -> Vec<Record> {
    pending
        .iter()
        .zip(outcomes)
        .filter(|(_, outcome)| outcome.is_rejected())
        .map(|(record, _)| record.clone())
        .collect()
}

/// Verify that an outcome can be interpreted against the request it answers.
fn check_outcome(pending: &[Record], outcome: &PutOutcome) -> BatchResult<()> {
    let counted_failed = outcome.rejected_count();
    if outcome.records.len() != pending.len() || outcome.failed_count != counted_failed {
        return Err(BatchError::MalformedOutcome {
            expected: pending.len(),
            received: outcome.records.len(),
            reported_failed: outcome.failed_count,
            counted_failed,
        });
    }
    Ok(())
}

fn log_partial_failure(target: &DeliveryTarget, outcome: &PutOutcome, attempt: u32) {
    // Only the first rejection's reason is logged.
    let first_reason = outcome.records.iter().find_map(|r| match r {
        RecordOutcome::Rejected {
            error_code,
            error_message,
        } => Some(format!(
            "{}: {}",
            error_code.as_deref().unwrap_or("unknown"),
            error_message.as_deref().unwrap_or("")
        )),
        RecordOutcome::Accepted { .. } => None,
    });

    tracing::warn!(
        event = %Event::BatchPartialFailure,
        delivery_target = %target,
        failed_count = outcome.failed_count,
        records = outcome.records.len(),
        attempt,
        reason = first_reason.as_deref().unwrap_or(""),
        "destination rejected part of the batch"
    );
}
