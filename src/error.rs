//! Error types with actionable diagnostics.
//!
//! Every variant carries enough context for the operator to fix the run
//! without reading the source.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for blurdistill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a training run.
#[derive(Error, Debug)]
pub enum Error {
    /// A startup option has no usable meaning (unsupported depth, zero batch size).
    #[error("Invalid configuration value for '{field}': {message}\n  → {suggestion}")]
    ConfigValue { field: String, message: String, suggestion: String },

    /// Dataset files are missing under the data root.
    #[error("Dataset not found: {path}\n  → Download and extract the CIFAR binary version into --data-root")]
    DatasetNotFound { path: PathBuf },

    /// Dataset file exists but does not have the expected record layout.
    #[error("Malformed dataset file {path}: {message}")]
    DatasetFormat { path: PathBuf, message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Checkpoint contents do not match the model.
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Create a configuration error.
    pub fn config(
        field: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::ConfigValue {
            field: field.into(),
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Check if this error is fixable by changing startup options or files.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigValue { .. } | Self::DatasetNotFound { .. } | Self::DatasetFormat { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io { context: "filesystem operation failed".to_string(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = Error::config("depth", "unsupported depth 50", "Use one of 9, 18, 34");
        let msg = err.to_string();
        assert!(msg.contains("depth"));
        assert!(msg.contains("Use one of 9, 18, 34"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_io_error_keeps_context() {
        let err = Error::io(
            "writing summary.log",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("writing summary.log"));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_dataset_not_found_is_user_error() {
        let err = Error::DatasetNotFound { path: PathBuf::from("/nowhere") };
        assert!(err.is_user_error());
        assert!(err.to_string().contains("/nowhere"));
    }
}
