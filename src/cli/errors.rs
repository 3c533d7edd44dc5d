//! CLI-specific error types

use std::fmt;
use std::io;

use crate::batcher::{BatchError, BatchErrorCode};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (input, output, stdout)
    IoError,
    /// A flush could not deliver its records
    DeliveryFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "BATCHER_CLI_CONFIG_ERROR",
            Self::IoError => "BATCHER_CLI_IO_ERROR",
            Self::DeliveryFailed => "BATCHER_CLI_DELIVERY_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Delivery failed
    pub fn delivery_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DeliveryFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<BatchError> for CliError {
    fn from(e: BatchError) -> Self {
        match e.code() {
            BatchErrorCode::InvalidConfig | BatchErrorCode::InvalidLimits => {
                Self::config_error(e.to_string())
            }
            code => Self::delivery_failed(format!("{}: {}", code, e)),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_config_errors_map_to_config_error() {
        let err = CliError::from(BatchError::InvalidLimits("bad".to_string()));
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_delivery_errors_keep_batch_code() {
        let err = CliError::from(BatchError::RetriesExhausted {
            failed_count: 2,
            attempts: 100,
        });
        assert_eq!(err.code_str(), "BATCHER_CLI_DELIVERY_FAILED");
        assert!(err.message().starts_with("BATCH_RETRIES_EXHAUSTED"));
    }

    #[test]
    fn test_display() {
        let err = CliError::io_error("stdin closed");
        assert_eq!(err.to_string(), "BATCHER_CLI_IO_ERROR: stdin closed");
    }
}
