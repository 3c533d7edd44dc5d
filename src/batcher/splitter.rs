//! Batch splitting
//!
//! Partitions an ordered run of records into contiguous sub-batches that each
//! satisfy the destination limits.
//!
//! A run that overflows is cut into slices of `len / 2` records (the last
//! slice holds whatever is left over) and every slice is split again, in
//! order. Halving is not optimal bin-packing and may issue a few more
//! requests than strictly necessary, but it always terminates: an admitted
//! record never overflows on its own, and every step shrinks the run.
//!
//! The recursion is unrolled into an explicit worklist so that very large
//! buffers cannot exhaust the stack.

use super::limits::BatchLimits;
use super::record::Record;

/// Splits record runs into limit-satisfying batches.
#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    limits: BatchLimits,
}

impl Splitter {
    pub fn new(limits: BatchLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &BatchLimits {
        &self.limits
    }

    /// Whether `records` must be split further before it can be sent.
    pub fn overflows(&self, records: &[Record]) -> bool {
        self.limits.overflows(records)
    }

    /// Split `records` into sendable batches.
    ///
    /// The batches borrow from `records`, are never empty, and concatenate
    /// back to `records` in order.
    pub fn split<'a>(&self, records: &'a [Record]) -> Vec<&'a [Record]> {
        let mut batches = Vec::new();
        // LIFO: slices are pushed in reverse so the leftmost is processed first.
        let mut worklist: Vec<&'a [Record]> = vec![records];

        while let Some(run) = worklist.pop() {
            if run.is_empty() {
                continue;
            }

            if run.len() > 1 && self.overflows(run) {
                let slice_len = run.len() / 2;
                worklist.extend(run.chunks(slice_len).rev());
            } else {
                batches.push(run);
            }
        }

        batches
    }
}
