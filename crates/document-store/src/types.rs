//! Wire types for the document store REST API.

use cms_core::store::Document;
use serde::{Deserialize, Serialize};

/// A document as sent to and returned by the REST API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentBody {
    pub fields: Document,
}

impl DocumentBody {
    pub fn new(fields: Document) -> Self {
        Self { fields }
    }
}

/// Error payload returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
}
