//! Core error types for the CMS settings library.
//!
//! This module defines backend-agnostic error types. Store-specific errors
//! (HTTP, JSON, in-memory) are converted to these types by the store crates.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the settings library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Document store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid form state: {0}")]
    InvalidState(String),
}

/// Backend-agnostic error type for document store operations.
///
/// Every variant carries a human-readable detail string so that store
/// implementations can convert their own errors without leaking types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The caller is not allowed to read or write the document.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The store could not be reached or timed out.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// Internal/unexpected store error.
    #[error("Internal document store error: {0}")]
    Internal(String),
}

/// Validation errors for form input and stored document parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ValidationError {
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl Error {
    /// Returns true when the error means the settings document is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound(_)))
    }
}
