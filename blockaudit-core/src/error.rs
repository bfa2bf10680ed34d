//! Typed error handling for blockaudit.
//!
//! Library consumers can match on these to tell a fatal misconfiguration
//! apart from a field the page store merely cannot search.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for audit and search operations.
#[derive(Error, Debug)]
pub enum AuditError {
    /// I/O error when reading a snapshot or config file
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Content snapshot could not be decoded
    #[error("Snapshot error in {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// Required host configuration is missing (e.g. no default site)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The page store cannot evaluate a pushed-down predicate on this field
    #[error("Cannot apply {lookup} lookup to {page_type}.{field}")]
    UnsupportedPredicate {
        page_type: String,
        field: String,
        lookup: &'static str,
    },

    /// Search pattern failed to compile
    #[error("Invalid pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    /// A content value visited a path its schema does not declare
    #[error("Value path {path} is not declared by the schema of field {field}")]
    SchemaMismatch { field: String, path: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl AuditError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a snapshot decoding error.
    pub fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unsupported `iregex` predicate error.
    pub fn unsupported_regex(page_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnsupportedPredicate {
            page_type: page_type.into(),
            field: field.into(),
            lookup: "iregex",
        }
    }

    /// Create a pattern error from a regex compile failure.
    pub fn pattern(pattern: impl Into<String>, err: &regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }

    /// Create a schema/value desynchronization fault.
    pub fn schema_mismatch(field: impl Into<String>, path: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            field: field.into(),
            path: path.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the run can skip the affected
    /// field and continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnsupportedPredicate { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Snapshot { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for audit results.
pub type AuditResult<T> = Result<T, AuditError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> AuditResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> AuditResult<T> {
        self.map_err(|e| AuditError::io(path, e))
    }
}
