use async_trait::async_trait;

use super::{Document, DocumentPath};
use crate::errors::Result;

/// Narrow interface to the remote document store.
///
/// Last write wins; there are no version checks or transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document. Returns `None` when it does not exist.
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>>;

    /// Merge `fields` into an existing document.
    ///
    /// Fails with `StoreError::NotFound` when the document does not exist.
    async fn update_document(&self, path: &DocumentPath, fields: Document) -> Result<()>;

    /// Create or replace a document.
    async fn set_document(&self, path: &DocumentPath, document: Document) -> Result<()>;
}
