//! Batcher configuration
//!
//! JSON file format (every field but `delivery_target` is optional):
//!
//! ```json
//! {
//!   "delivery_target": "some-stream",
//!   "max_retries": 100,
//!   "max_bytes_per_batch": 4194304,
//!   "max_records_per_batch": 500,
//!   "max_bytes_per_record": 1024000
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{BatchError, BatchResult};
use super::limits::{BatchLimits, MAX_BYTES_PER_BATCH, MAX_BYTES_PER_RECORD, MAX_RECORDS_PER_BATCH};
use super::record::DeliveryTarget;
use super::sender::DEFAULT_MAX_RETRIES;

/// Construction-time settings of a batching session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatcherConfig {
    /// Destination of every bulk write (required)
    pub delivery_target: DeliveryTarget,

    /// Bulk-write calls per batch before giving up, first call included
    /// (default 100, must be at least 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Exclusive cap on the summed size of one request (default 4 MiB)
    #[serde(default = "default_max_bytes_per_batch")]
    pub max_bytes_per_batch: usize,

    /// Exclusive cap on records per request (default 500)
    #[serde(default = "default_max_records_per_batch")]
    pub max_records_per_batch: usize,

    /// Exclusive cap on the size of one record (default 1000 KiB)
    #[serde(default = "default_max_bytes_per_record")]
    pub max_bytes_per_record: usize,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_max_bytes_per_batch() -> usize {
    MAX_BYTES_PER_BATCH
}
fn default_max_records_per_batch() -> usize {
    MAX_RECORDS_PER_BATCH
}
fn default_max_bytes_per_record() -> usize {
    MAX_BYTES_PER_RECORD
}

impl BatcherConfig {
    /// Configuration with every default for `delivery_target`.
    pub fn new(delivery_target: impl Into<DeliveryTarget>) -> Self {
        Self {
            delivery_target: delivery_target.into(),
            max_retries: default_max_retries(),
            max_bytes_per_batch: default_max_bytes_per_batch(),
            max_records_per_batch: default_max_records_per_batch(),
            max_bytes_per_record: default_max_bytes_per_record(),
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> BatchResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BatchError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Parse and validate configuration from a JSON document
    pub fn from_json_str(content: &str) -> BatchResult<Self> {
        let config: BatcherConfig = serde_json::from_str(content)
            .map_err(|e| BatchError::InvalidConfig(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BatchResult<()> {
        if self.delivery_target.as_str().trim().is_empty() {
            return Err(BatchError::InvalidConfig(
                "delivery_target must not be empty".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(BatchError::InvalidConfig(
                "max_retries must be >= 1".to_string(),
            ));
        }

        self.limits().map(|_| ())
    }

    /// The validated limit triple.
    pub fn limits(&self) -> BatchResult<BatchLimits> {
        BatchLimits::new(
            self.max_bytes_per_batch,
            self.max_records_per_batch,
            self.max_bytes_per_record,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config = BatcherConfig::from_json_str(r#"{"delivery_target": "some-stream"}"#).unwrap();
        assert_eq!(config, BatcherConfig::new("some-stream"));
        assert_eq!(config.max_retries, 100);
        assert_eq!(config.limits().unwrap(), BatchLimits::default());
    }

    #[test]
    fn test_overrides() {
        let config = BatcherConfig::from_json_str(
            r#"{
                "delivery_target": "s",
                "max_retries": 3,
                "max_bytes_per_batch": 1000,
                "max_records_per_batch": 10,
                "max_bytes_per_record": 100
            }"#,
        )
        .unwrap();
        let limits = config.limits().unwrap();
        assert_eq!(config.max_retries, 3);
        assert_eq!(limits.max_bytes_per_batch(), 1000);
        assert_eq!(limits.max_records_per_batch(), 10);
        assert_eq!(limits.max_bytes_per_record(), 100);
    }

    #[test]
    fn test_missing_target_rejected() {
        let err = BatcherConfig::from_json_str(r#"{"max_retries": 3}"#).unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_target_rejected() {
        assert!(BatcherConfig::from_json_str(r#"{"delivery_target": "  "}"#).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = BatcherConfig::from_json_str(r#"{"delivery_target": "s", "max_retry": 3}"#)
            .unwrap_err();
        assert!(err.to_string().contains("max_retry"));
    }

    #[test]
    fn test_zero_retries_rejected() {
        assert!(BatcherConfig::from_json_str(r#"{"delivery_target": "s", "max_retries": 0}"#)
            .is_err());
    }

    #[test]
    fn test_inconsistent_limits_rejected() {
        let err = BatcherConfig::from_json_str(
            r#"{"delivery_target": "s", "max_bytes_per_batch": 10, "max_bytes_per_record": 10}"#,
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::InvalidLimits(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"delivery_target": "from-file", "max_retries": 7}}"#).unwrap();

        let config = BatcherConfig::load(file.path()).unwrap();

        assert_eq!(config.delivery_target.as_str(), "from-file");
        assert_eq!(config.max_retries, 7);
    }

    #[test]
    fn test_load_missing_file() {
        let err = BatcherConfig::load(Path::new("/nonexistent/batcher.json")).unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig(_)));
    }
}
