//! Error types
//!
//! Structural errors from rubric editing, validation failures raised before a
//! save, storage failures, and the `ApiError` façade the service and CLI layers
//! return.

use thiserror::Error;

/// Structural editing and lookup errors.
///
/// Every operation that returns one of these has left the tree untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Invalid path: '{path}' does not resolve to a grading component")]
    InvalidPath { path: String },

    #[error("Key not found: '{key}' is not a child of '{parent}'")]
    KeyNotFound { parent: String, key: String },

    #[error("Invalid component key: '{key}' (keys must be non-empty and contain no '.')")]
    InvalidKey { key: String },
}

impl TreeError {
    pub(crate) fn invalid_path(path: impl Into<String>) -> Self {
        TreeError::InvalidPath { path: path.into() }
    }

    pub(crate) fn key_not_found(parent: impl Into<String>, key: impl Into<String>) -> Self {
        TreeError::KeyNotFound {
            parent: parent.into(),
            key: key.into(),
        }
    }
}

/// A single problem that blocks a save.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    #[error("Component '{full_key}' has an empty label")]
    EmptyLabel { full_key: String },

    #[error("Top-level weights sum to {total}, expected {expected}")]
    WeightTotal { total: f64, expected: f64 },
}

/// Pre-save validation failure carrying every issue found.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Grading configuration is invalid: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Persistence errors raised by store adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Invalid document identifier: {0}")]
    InvalidIdentifier(String),
}

/// Top-level error returned by the service and CLI layers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Reserved component '{0}' cannot be renamed or removed")]
    ReservedComponent(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
