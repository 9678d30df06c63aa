//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError / StoreError (this module)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartStore logs it and carries on:                                     │
//! │    load failure  → empty cart                                          │
//! │    save failure  → cart stays in memory, listeners still run           │
//! │                                                                         │
//! │  ConfigError is the only error callers see (startup).                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use panzo_core::ValidationError;
use thiserror::Error;

/// Durable key-value storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the operation (quota exceeded, storage disabled).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be used by this backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(ValidationError),
}

/// Cart snapshot persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The persisted snapshot is not valid JSON or has the wrong shape.
    #[error("Snapshot is malformed: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    /// The snapshot carries a timestamp that is not a usable epoch value.
    #[error("Snapshot timestamp is invalid: {0}")]
    InvalidTimestamp(String),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is invalid: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] ValidationError),

    /// No explicit path and no platform config directory.
    #[error("No config path available")]
    NoConfigPath,

    /// No explicit storage dir and no platform data directory.
    #[error("No data directory available for cart storage")]
    NoDataDir,
}

/// Result type for storage backends.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for snapshot persistence.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_wraps_into_store_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let store_err: StoreError = StorageError::from(io).into();
        assert!(matches!(store_err, StoreError::Storage(StorageError::Io(_))));
        assert_eq!(store_err.to_string(), "Storage I/O failed: read-only");
    }

    #[test]
    fn test_config_error_from_validation() {
        let err: ConfigError = ValidationError::Required {
            field: "storage key".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid config: storage key is required");
    }
}
