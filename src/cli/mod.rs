//! CLI module for firehose-batcher
//!
//! Provides command-line interface for:
//! - send: Batch newline-delimited records into JSON-lines bulk writes
//! - check-config: Validate a configuration file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, run, run_command, send, send_records, SendSummary};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_records, write_error, write_response};
