//! Record input and JSON responses for the CLI
//!
//! - Input: one record per line, raw bytes, newline stripped
//! - Output: single JSON object via stdout

use std::io::{self, BufRead, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::batcher::Record;

/// Read newline-delimited records.
///
/// Lines are taken as raw bytes, so input need not be UTF-8. A trailing
/// `\r` is kept as part of the record.
pub fn read_records<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<Record>> {
    reader
        .split(b'\n')
        .map(|line| line.map(Record::from).map_err(CliError::from))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_records_splits_on_newline() {
        let input = Cursor::new(b"first\nsecond\n\nfourth".to_vec());

        let records: Vec<Record> = read_records(input).collect::<CliResult<_>>().unwrap();

        assert_eq!(
            records,
            vec![
                Record::from("first"),
                Record::from("second"),
                Record::from(""),
                Record::from("fourth"),
            ]
        );
    }

    #[test]
    fn test_read_records_keeps_binary() {
        let input = Cursor::new(vec![0xff, 0x00, b'\n', 0xfe]);
        let records: Vec<Record> = read_records(input).collect::<CliResult<_>>().unwrap();
        assert_eq!(records[0].as_bytes(), &[0xff, 0x00]);
        assert_eq!(records[1].as_bytes(), &[0xfe]);
    }
}
