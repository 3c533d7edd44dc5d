//! CLI command implementations
//!
//! `send` drives one batching session from a newline-delimited record
//! source into a JSON-lines sink. `check-config` only validates.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::batcher::{BatchError, BatcherConfig, BatchingSession, DeliveryTarget};
use crate::client::JsonLinesClient;
use crate::observability::{init_logging, Event, LogFormat, MetricsSnapshot};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_records, write_response};

/// Outcome of a `send` run
#[derive(Debug, Clone, Serialize)]
pub struct SendSummary {
    pub delivery_target: DeliveryTarget,
    /// Lines read from the input
    pub records_read: u64,
    /// Session counters; oversized input lines show up as
    /// `records_rejected_too_large`, bulk writes as `put_calls`
    pub metrics: MetricsSnapshot,
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_logging(cli.log_level, format);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Send {
            config,
            input,
            output,
            flush_every,
        } => send(&config, input.as_deref(), &output, flush_every),
        Command::CheckConfig { config } => check_config(&config),
    }
}

fn load_config(path: &Path) -> CliResult<BatcherConfig> {
    let config = BatcherConfig::load(path)?;
    tracing::info!(
        event = %Event::ConfigLoaded,
        path = %path.display(),
        delivery_target = %config.delivery_target,
        max_retries = config.max_retries,
        "configuration loaded"
    );
    Ok(config)
}

/// Batch records from `input` (stdin when absent) into `output`
pub fn send(
    config_path: &Path,
    input: Option<&Path>,
    output: &Path,
    flush_every: usize,
) -> CliResult<()> {
    let config = load_config(config_path)?;

    let writer = BufWriter::new(File::create(output).map_err(|e| {
        CliError::io_error(format!("failed to create {}: {}", output.display(), e))
    })?);

    let summary = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                CliError::io_error(format!("failed to open {}: {}", path.display(), e))
            })?;
            send_records(&config, BufReader::new(file), writer, flush_every)?
        }
        None => {
            let stdin = io::stdin();
            send_records(&config, stdin.lock(), writer, flush_every)?
        }
    };

    write_response(serde_json::to_value(&summary)?)
}

/// Read every record from `reader` and deliver it through a session
/// writing to `writer`.
///
/// Oversized records are skipped with a warning. The session is flushed
/// whenever `flush_every` records are buffered (if non-zero) and once more
/// at end of input.
pub fn send_records<R, W>(
    config: &BatcherConfig,
    reader: R,
    writer: W,
    flush_every: usize,
) -> CliResult<SendSummary>
where
    R: BufRead,
    W: Write,
{
    let mut session = BatchingSession::from_config(config, JsonLinesClient::new(writer))?;
    let mut records_read = 0u64;

    for record in read_records(reader) {
        let record = record?;
        records_read += 1;

        match session.append(record) {
            Ok(()) => {}
            Err(BatchError::RecordTooLarge { .. }) => continue,
            Err(e) => return Err(e.into()),
        }

        if flush_every > 0 && session.buffered() >= flush_every {
            session.flush()?;
        }
    }

    tracing::info!(
        event = %Event::InputDrained,
        records_read,
        skipped = session.metrics().snapshot().records_rejected_too_large,
        buffered = session.buffered(),
        "input drained"
    );
    session.flush()?;

    Ok(SendSummary {
        delivery_target: session.delivery_target().clone(),
        records_read,
        metrics: session.metrics().snapshot(),
    })
}

/// Validate a configuration file and print the effective settings
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    write_response(json!({
        "valid": true,
        "config": serde_json::to_value(&config)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batcher::Record;
    use crate::client::jsonl::decode_line;
    use std::fs;
    use std::io::Cursor;

    fn config(target: &str) -> BatcherConfig {
        BatcherConfig::new(target)
    }

    #[test]
    fn test_send_records_single_flush() {
        let input = Cursor::new(b"Hello 1\nHello 2\nHello 3\n".to_vec());
        let mut out = Vec::new();

        let summary = send_records(&config("stream"), input, &mut out, 0).unwrap();

        assert_eq!(summary.records_read, 3);
        assert_eq!(summary.metrics.records_rejected_too_large, 0);
        assert_eq!(summary.metrics.put_calls, 1);

        let text = String::from_utf8(out).unwrap();
        let (target, records) = decode_line(text.lines().next().unwrap()).unwrap();
        assert_eq!(target.as_str(), "stream");
        assert_eq!(
            records,
            vec![Record::from("Hello 1"), Record::from("Hello 2"), Record::from("Hello 3")]
        );
    }

    #[test]
    fn test_send_records_flush_every() {
        let input = Cursor::new(b"a\nb\nc\nd\ne".to_vec());
        let mut out = Vec::new();

        let summary = send_records(&config("s"), input, &mut out, 2).unwrap();

        assert_eq!(summary.records_read, 5);
        assert_eq!(summary.metrics.put_calls, 3);
        assert_eq!(summary.metrics.flushes, 3);
    }

    #[test]
    fn test_send_records_skips_oversized() {
        let mut cfg = config("s");
        cfg.max_bytes_per_record = 4;
        cfg.max_bytes_per_batch = 100;
        let input = Cursor::new(b"ok\nmuch too long\nfin\n".to_vec());
        let mut out = Vec::new();

        let summary = send_records(&cfg, input, &mut out, 0).unwrap();

        assert_eq!(summary.records_read, 3);
        assert_eq!(summary.metrics.records_rejected_too_large, 1);
        assert_eq!(summary.metrics.records_delivered, 2);
    }

    #[test]
    fn test_send_records_empty_input_writes_nothing() {
        let mut out = Vec::new();
        let summary = send_records(&config("s"), Cursor::new(Vec::new()), &mut out, 0).unwrap();
        assert_eq!(summary.records_read, 0);
        assert_eq!(summary.metrics.put_calls, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_config_maps_to_config_error() {
        let mut cfg = config("s");
        cfg.max_retries = 0;
        let err = send_records(&cfg, Cursor::new(Vec::new()), Vec::new(), 0).unwrap_err();
        assert_eq!(err.code_str(), "BATCHER_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/batcher.json")).unwrap_err();
        assert_eq!(err.code_str(), "BATCHER_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_send_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("batcher.json");
        let input_path = dir.path().join("input.txt");
        let output_path = dir.path().join("out.jsonl");
        fs::write(&config_path, r#"{"delivery_target": "file-stream"}"#).unwrap();
        fs::write(&input_path, "x\ny\n").unwrap();

        send(&config_path, Some(&input_path), &output_path, 0).unwrap();

        let written = fs::read_to_string(&output_path).unwrap();
        assert_eq!(written.lines().count(), 1);
        let (target, records) = decode_line(written.lines().next().unwrap()).unwrap();
        assert_eq!(target.as_str(), "file-stream");
        assert_eq!(records.len(), 2);
    }
}
