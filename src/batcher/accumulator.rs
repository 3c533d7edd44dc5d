//! Record accumulator
//!
//! An ordered, in-memory buffer of admitted records awaiting a flush.
//! Admission validation happens here and only here: a record that passed
//! [`RecordBuffer::append`] is guaranteed to fit in a batch on its own.

use super::errors::{BatchError, BatchResult};
use super::limits::BatchLimits;
use super::record::Record;

/// Buffer of admitted records, in append order.
#[derive(Debug)]
pub struct RecordBuffer {
    limits: BatchLimits,
    records: Vec<Record>,
    total_bytes: usize,
}

impl RecordBuffer {
    /// Create an empty buffer admitting records under `limits`.
    pub fn new(limits: BatchLimits) -> Self {
        Self {
            limits,
            records: Vec::new(),
            total_bytes: 0,
        }
    }

    /// Append a record to the end of the buffer.
    ///
    /// Fails with `RecordTooLarge`, handing the record back, when it is at or
    /// above the per-record limit. The buffer is untouched in that case.
    pub fn append(&mut self, record: Record) -> BatchResult<()> {
        if !self.limits.admits(&record) {
            return Err(BatchError::RecordTooLarge {
                record,
                max_bytes_per_record: self.limits.max_bytes_per_record(),
            });
        }

        self.total_bytes += record.len();
        self.records.push(record);
        Ok(())
    }

    /// Append records in order, stopping at the first one that is too large.
    ///
    /// Records before the offending one stay admitted.
    pub fn extend<I>(&mut self, records: I) -> BatchResult<()>
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            self.append(record)?;
        }
        Ok(())
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summed byte size of the buffered records.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn limits(&self) -> &BatchLimits {
        &self.limits
    }

    /// Remove and return every buffered record, leaving the buffer empty.
    pub(crate) fn take(&mut self) -> Vec<Record> {
        self.total_bytes = 0;
        std::mem::take(&mut self.records)
    }

    /// Put records back at the front of the buffer, ahead of anything
    /// appended since they were taken.
    pub(crate) fn restore(&mut self, mut records: Vec<Record>) {
        let restored_bytes: usize = records.iter().map(Record::len).sum();
        records.append(&mut self.records);
        self.records = records;
        self.total_bytes += restored_bytes;
    }

    /// Drop every buffered record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.total_bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_limits() -> BatchLimits {
        BatchLimits::new(100, 10, 8).unwrap()
    }

    #[test]
    fn test_buffer_new_empty() {
        let buffer = RecordBuffer::new(small_limits());
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.total_bytes(), 0);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut buffer = RecordBuffer::new(small_limits());
        buffer.append(Record::from("one")).unwrap();
        buffer.append(Record::from("two")).unwrap();
        buffer.append(Record::from("three")).unwrap();

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.total_bytes(), 11);
        assert_eq!(
            buffer.records(),
            &[Record::from("one"), Record::from("two"), Record::from("three")]
        );
    }

    #[test]
    fn test_append_rejects_record_at_limit() {
        let mut buffer = RecordBuffer::new(small_limits());
        buffer.append(Record::from("ok")).unwrap();

        let err = buffer.append(Record::from("12345678")).unwrap_err();

        assert_eq!(err.record(), Some(&Record::from("12345678")));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.total_bytes(), 2);
    }

    #[test]
    fn test_append_admits_record_just_below_limit() {
        let mut buffer = RecordBuffer::new(small_limits());
        buffer.append(Record::from("1234567")).unwrap();
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_extend_stops_at_first_oversized_record() {
        let mut buffer = RecordBuffer::new(small_limits());
        let result = buffer.extend(vec![
            Record::from("a"),
            Record::from("b"),
            Record::from("far too large"),
            Record::from("c"),
        ]);

        assert!(result.is_err());
        assert_eq!(buffer.records(), &[Record::from("a"), Record::from("b")]);
    }

    #[test]
    fn test_take_empties_buffer() {
        let mut buffer = RecordBuffer::new(small_limits());
        buffer.append(Record::from("a")).unwrap();
        buffer.append(Record::from("b")).unwrap();

        let taken = buffer.take();

        assert_eq!(taken.len(), 2);
        assert!(buffer.is_empty());
        assert_eq!(buffer.total_bytes(), 0);
    }

    #[test]
    fn test_restore_goes_before_newer_records() {
        let mut buffer = RecordBuffer::new(small_limits());
        buffer.append(Record::from("a")).unwrap();
        let taken = buffer.take();
        buffer.append(Record::from("b")).unwrap();

        buffer.restore(taken);

        assert_eq!(buffer.records(), &[Record::from("a"), Record::from("b")]);
        assert_eq!(buffer.total_bytes(), 2);
    }

    #[test]
    fn test_clear() {
        let mut buffer = RecordBuffer::new(small_limits());
        buffer.append(Record::from("a")).unwrap();
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.total_bytes(), 0);
    }
}
