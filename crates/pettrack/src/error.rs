//! Error types for pettrack.
//!
//! This module defines all error types used throughout the pettrack crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for pettrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Reading a key from the key-value store failed.
    #[error("failed to read key '{key}': {message}")]
    StorageRead {
        /// The key being read.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Writing a key to the key-value store failed.
    #[error("failed to write key '{key}': {message}")]
    StorageWrite {
        /// The key being written.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Record Errors ===
    /// A record failed field validation.
    #[error("invalid {record}: {message}")]
    Validation {
        /// Kind of record being validated.
        record: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// No record exists with the given identifier.
    #[error("{record} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        record: &'static str,
        /// The identifier that was not found.
        id: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for pettrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a validation error for the given record kind.
    #[must_use]
    pub fn validation(record: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            record,
            message: message.into(),
        }
    }

    /// Create a not-found error for the given record kind.
    #[must_use]
    pub fn not_found(record: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            record,
            id: id.into(),
        }
    }

    /// Create a storage read error.
    #[must_use]
    pub fn storage_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error.
    #[must_use]
    pub fn storage_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from rejected record input.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error is a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::validation("pet", "weight must be greater than 0");
        assert_eq!(err.to_string(), "invalid pet: weight must be greater than 0");

        let err = Error::not_found("pet", "abc");
        assert_eq!(err.to_string(), "pet not found: abc");
    }

    #[test]
    fn test_error_is_validation_error() {
        assert!(Error::validation("pet", "blank name").is_validation_error());
        assert!(!Error::internal("test").is_validation_error());
    }

    #[test]
    fn test_error_is_not_found() {
        assert!(Error::not_found("vaccination", "v1").is_not_found());
        assert!(!Error::validation("pet", "x").is_not_found());
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_storage_errors_name_the_key() {
        let err = Error::storage_write("pets", "disk full");
        let msg = err.to_string();
        assert!(msg.contains("pets"));
        assert!(msg.contains("disk full"));

        let err = Error::storage_read("theme", "locked");
        assert!(err.to_string().contains("theme"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "empty database path".to_string(),
        };
        assert!(err.to_string().contains("empty database path"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
