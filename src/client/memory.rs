//! In-memory bulk-write client
//!
//! Keeps every request it receives and answers through a pluggable responder.
//! Used for dry runs and as the test double for the batcher.

use uuid::Uuid;

use super::{ClientError, PutOutcome, PutRecordBatch, RecordOutcome};
use crate::batcher::{DeliveryTarget, Record};

type Responder = Box<dyn FnMut(usize, &[Record]) -> Result<PutOutcome, ClientError> + Send>;

/// One request observed by a [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub target: DeliveryTarget,
    pub records: Vec<Record>,
}

/// A client that records requests instead of sending them.
pub struct RecordingClient {
    calls: Vec<RecordedCall>,
    responder: Responder,
}

impl std::fmt::Debug for RecordingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingClient")
            .field("calls", &self.calls.len())
            .finish_non_exhaustive()
    }
}

impl Default for RecordingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingClient {
    /// A client that accepts every record.
    pub fn new() -> Self {
        Self::with_responder(|_, records| Ok(accept_all(records)))
    }

    /// A client that answers each request with `responder(call_index, records)`.
    ///
    /// `call_index` counts from zero across the client's lifetime.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(usize, &[Record]) -> Result<PutOutcome, ClientError> + Send + 'static,
    {
        Self {
            calls: Vec::new(),
            responder: Box::new(responder),
        }
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Records of every request, concatenated in send order.
    pub fn sent_records(&self) -> Vec<Record> {
        self.calls
            .iter()
            .flat_map(|call| call.records.iter().cloned())
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl PutRecordBatch for RecordingClient {
    fn put_record_batch(
        &mut self,
        target: &DeliveryTarget,
        records: &[Record],
    ) -> Result<PutOutcome, ClientError> {
        let call_index = self.calls.len();
        self.calls.push(RecordedCall {
            target: target.clone(),
            records: records.to_vec(),
        });
        (self.responder)(call_index, records)
    }
}

/// An outcome accepting every record with a fresh identifier.
pub fn accept_all(records: &[Record]) -> PutOutcome {
    PutOutcome::from_records(
        records
            .iter()
            .map(|_| RecordOutcome::accepted(Uuid::new_v4().simple().to_string()))
            .collect(),
    )
}
