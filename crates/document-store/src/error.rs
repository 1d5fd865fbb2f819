//! Error types for the document store crate.

use cms_core::errors::StoreError;
use thiserror::Error;

/// Result type alias for document store operations.
pub type Result<T> = std::result::Result<T, DocumentStoreError>;

/// Errors that can occur while talking to a document store.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API error response from the store service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The addressed document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Invalid request (bad configuration, malformed data, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication error (missing or invalid token)
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl DocumentStoreError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }
}

impl From<DocumentStoreError> for StoreError {
    fn from(err: DocumentStoreError) -> Self {
        let detail = err.to_string();
        match err {
            DocumentStoreError::NotFound(_) => StoreError::NotFound(detail),
            DocumentStoreError::Auth(_) => StoreError::PermissionDenied(detail),
            DocumentStoreError::Api { status, .. } => match status {
                404 => StoreError::NotFound(detail),
                401 | 403 => StoreError::PermissionDenied(detail),
                408 | 429 | 500..=599 => StoreError::Unavailable(detail),
                _ => StoreError::Internal(detail),
            },
            DocumentStoreError::Http(_) => StoreError::Unavailable(detail),
            DocumentStoreError::Json(_) | DocumentStoreError::InvalidRequest(_) => {
                StoreError::Internal(detail)
            }
        }
    }
}

impl From<DocumentStoreError> for cms_core::Error {
    fn from(err: DocumentStoreError) -> Self {
        cms_core::Error::Store(err.into())
    }
}
