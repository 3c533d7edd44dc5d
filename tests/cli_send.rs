//! CLI send path end to end: config file, record file, JSON-lines output.

use std::fs;
use std::io::Cursor;

use firehose_batcher::batcher::BatcherConfig;
use firehose_batcher::cli::{run_command, send_records, Command};
use firehose_batcher::client::jsonl::decode_line;
use firehose_batcher::Record;
use tempfile::tempdir;

#[test]
fn test_send_command_writes_batches() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("batcher.json");
    let input = dir.path().join("records.txt");
    let output = dir.path().join("batches.jsonl");
    fs::write(
        &config,
        r#"{"delivery_target": "cli-stream", "max_records_per_batch": 10}"#,
    )
    .unwrap();
    let lines: Vec<String> = (0..25).map(|i| format!("line {}", i)).collect();
    fs::write(&input, lines.join("\n")).unwrap();

    run_command(Command::Send {
        config,
        input: Some(input),
        output: output.clone(),
        flush_every: 0,
    })
    .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let mut delivered = Vec::new();
    for line in written.lines() {
        let (target, records) = decode_line(line).unwrap();
        assert_eq!(target.as_str(), "cli-stream");
        assert!(records.len() < 10);
        delivered.extend(records);
    }
    let expected: Vec<Record> = lines.iter().map(|l| Record::from(l.as_str())).collect();
    assert_eq!(delivered, expected);
}

#[test]
fn test_send_command_rejects_bad_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("batcher.json");
    fs::write(&config, r#"{"delivery_target": "s", "max_retries": 0}"#).unwrap();

    let err = run_command(Command::Send {
        config,
        input: None,
        output: dir.path().join("out.jsonl"),
        flush_every: 0,
    })
    .unwrap_err();

    assert_eq!(err.code_str(), "BATCHER_CLI_CONFIG_ERROR");
}

#[test]
fn test_send_records_summary() {
    let config = BatcherConfig::new("summary-stream");
    let mut out = Vec::new();

    let summary = send_records(&config, Cursor::new(b"a\nb\nc".to_vec()), &mut out, 1).unwrap();

    assert_eq!(summary.records_read, 3);
    assert_eq!(summary.metrics.put_calls, 3);
    assert_eq!(summary.metrics.records_delivered, 3);
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
}

#[test]
fn test_check_config_accepts_valid_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("batcher.json");
    fs::write(&config, r#"{"delivery_target": "s"}"#).unwrap();

    run_command(Command::CheckConfig { config }).unwrap();
}
