//! Structured logging setup
//!
//! The batcher emits events through `tracing` with an `event` field naming
//! an [`Event`](super::Event). This module only decides where those lines
//! go and how they look:
//! - one line per event, on stderr
//! - JSON or plain text
//! - minimum severity from configuration, overridable with `RUST_LOG`

use std::fmt;
use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-request detail
    Trace = 0,
    /// Per-batch detail: splits, retries, deliveries
    Debug = 1,
    /// Normal operations
    Info = 2,
    /// Recoverable issues
    Warn = 3,
    /// Operation failures
    Error = 4,
    /// The flush in progress was aborted
    Fatal = 5,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// The `tracing` filter directive admitting this severity and above.
    ///
    /// `tracing` has no level above ERROR, so FATAL events are logged at ERROR.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error | Severity::Fatal => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Line format of emitted logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

/// Build a subscriber writing to `writer`.
pub fn subscriber<W>(
    filter: EnvFilter,
    format: LogFormat,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync + 'static>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(writer),
            ),
        ),
        LogFormat::Text => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(writer),
            ),
        ),
    }
}

/// Install the process-wide subscriber on stderr.
///
/// Returns false when a subscriber was already installed; the existing one
/// stays in place.
pub fn init_logging(severity: Severity, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(severity.filter_directive()));

    subscriber(filter, format, std::io::stderr).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Event;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("INFO".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warn));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_debug_level_excludes_trace() {
        assert_eq!("debug".parse::<Severity>(), Ok(Severity::Debug));

        let captured = Captured::default();
        let filter = EnvFilter::new(Severity::Debug.filter_directive());
        let sub = subscriber(filter, LogFormat::Text, captured.clone());

        tracing::subscriber::with_default(sub, || {
            tracing::trace!(event = %Event::BatchSend, "sending batch");
            tracing::debug!(event = %Event::BatchRetry, "retrying rejected records");
        });

        let output = captured.contents();
        assert!(!output.contains("BATCH_SEND"));
        assert!(output.contains("event=BATCH_RETRY"));
    }

    #[test]
    fn test_fatal_filters_as_error() {
        assert_eq!(Severity::Fatal.filter_directive(), "error");
    }

    #[test]
    fn test_json_lines_carry_event_field() {
        let captured = Captured::default();
        let sub = subscriber(EnvFilter::new("info"), LogFormat::Json, captured.clone());

        tracing::subscriber::with_default(sub, || {
            tracing::info!(event = %Event::FlushBegin, records = 3, "flush started");
            tracing::debug!(event = %Event::BatchSend, "filtered out");
        });

        let output = captured.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["fields"]["event"], "FLUSH_BEGIN");
        assert_eq!(parsed["fields"]["records"], 3);
        assert_eq!(parsed["fields"]["message"], "flush started");
    }

    #[test]
    fn test_text_format() {
        let captured = Captured::default();
        let sub = subscriber(EnvFilter::new("warn"), LogFormat::Text, captured.clone());

        tracing::subscriber::with_default(sub, || {
            tracing::warn!(event = %Event::AppendRejected, bytes = 10, "record too large");
        });

        let output = captured.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("event=APPEND_REJECTED"));
    }
}
