//! CLI argument definitions using clap
//!
//! Commands:
//! - firehose-batcher send --config <path> --output <path> [--input <path>] [--flush-every <n>]
//! - firehose-batcher check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// firehose-batcher - batch newline-delimited records into bulk writes
#[derive(Parser, Debug)]
#[command(name = "firehose-batcher")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Minimum log severity: trace, debug, info, warn, error
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Severity,

    /// Emit logs as JSON lines instead of plain text
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read records (one per line) and write them as JSON-lines bulk writes
    Send {
        /// Path to configuration file
        #[arg(long, default_value = "./batcher.json")]
        config: PathBuf,

        /// Record source; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// File receiving one JSON line per bulk write
        #[arg(long)]
        output: PathBuf,

        /// Flush after this many buffered records (0 flushes only at end of input)
        #[arg(long, default_value_t = 0)]
        flush_every: usize,
    },

    /// Validate a configuration file and print the effective settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./batcher.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
