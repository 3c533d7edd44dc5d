//! firehose-batcher CLI entry point
//!
//! Parses arguments and dispatches to the CLI module. Failures are
//! reported as a JSON error on stdout and as text on stderr, then the
//! process exits non-zero.

use firehose_batcher::cli;

fn main() {
    if let Err(e) = cli::run() {
        let _ = cli::write_error(e.code_str(), e.message());
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
