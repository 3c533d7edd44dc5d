//! JSON-lines bulk-write client
//!
//! Appends one line per request to any [`Write`] sink:
//!
//! ```text
//! {"delivery_target":"some-stream","records":["SGVsbG8gMQ==","SGVsbG8gMg=="]}
//! ```
//!
//! Records are base64 encoded since they are opaque bytes. Every record is
//! accepted once its line has been written and flushed.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use super::memory::accept_all;
use super::{ClientError, PutOutcome, PutRecordBatch};
use crate::batcher::{DeliveryTarget, Record};

#[derive(Serialize)]
struct BatchLine<'a> {
    delivery_target: &'a str,
    records: Vec<String>,
}

/// Client writing each bulk write as a JSON line.
#[derive(Debug)]
pub struct JsonLinesClient<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesClient<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PutRecordBatch for JsonLinesClient<W> {
    fn put_record_batch(
        &mut self,
        target: &DeliveryTarget,
        records: &[Record],
    ) -> Result<PutOutcome, ClientError> {
        let line = BatchLine {
            delivery_target: target.as_str(),
            records: records.iter().map(|r| STANDARD.encode(r.as_bytes())).collect(),
        };

        serde_json::to_writer(&mut self.writer, &line)
            .map_err(|e| ClientError::new("failed to encode batch line", e))?;
        self.writer
            .write_all(b"\n")
            .and_then(|_| self.writer.flush())
            .map_err(|e| ClientError::new("failed to write batch line", e))?;

        Ok(accept_all(records))
    }
}

/// Decode one line written by [`JsonLinesClient`] back into its records.
pub fn decode_line(line: &str) -> Result<(DeliveryTarget, Vec<Record>), ClientError> {
    #[derive(serde::Deserialize)]
    struct OwnedLine {
        delivery_target: DeliveryTarget,
        records: Vec<String>,
    }

    let parsed: OwnedLine = serde_json::from_str(line)
        .map_err(|e| ClientError::new("invalid batch line", e))?;
    let records = parsed
        .records
        .iter()
        .map(|encoded| {
            STANDARD
                .decode(encoded)
                .map(Record::from)
                .map_err(|e| ClientError::new("invalid base64 record", e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((parsed.delivery_target, records))
}
