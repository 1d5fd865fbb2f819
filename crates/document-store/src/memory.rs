//! In-memory document store.
//!
//! Same write semantics as the hosted store: updates merge top-level fields
//! into an existing document and fail when it is missing; last write wins.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cms_core::errors::StoreError;
use cms_core::store::{Document, DocumentPath, DocumentStore};
use dashmap::DashMap;
use log::debug;

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: DashMap<DocumentPath, Document>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without counting it as a write.
    pub fn insert(&self, path: DocumentPath, document: Document) {
        self.documents.insert(path, document);
    }

    /// Current contents of a document, without counting it as a read.
    pub fn get(&self, path: &DocumentPath) -> Option<Document> {
        self.documents.get(path).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of `get_document` calls served.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `update_document` and `set_document` calls served.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(&self, path: &DocumentPath) -> cms_core::Result<Option<Document>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(path))
    }

    async fn update_document(&self, path: &DocumentPath, fields: Document) -> cms_core::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        match self.documents.get_mut(path) {
            Some(mut entry) => {
                debug!("Merging {} fields into {}", fields.len(), path);
                entry.value_mut().extend(fields);
                Ok(())
            }
            None => Err(StoreError::NotFound(path.to_string()).into()),
        }
    }

    async fn set_document(&self, path: &DocumentPath, document: Document) -> cms_core::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.documents.insert(path.clone(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(uid: &str) -> DocumentPath {
        DocumentPath::user_settings(uid).unwrap()
    }

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_document_returns_none() {
        let store = InMemoryDocumentStore::new();
        assert!(store.get_document(&path("u1")).await.unwrap().is_none());
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let store = InMemoryDocumentStore::new();
        store.insert(path("u1"), doc(json!({ "theme": "dark", "language": "en" })));

        store
            .update_document(&path("u1"), doc(json!({ "theme": "light", "timezone": "UTC" })))
            .await
            .unwrap();

        let stored = store.get(&path("u1")).unwrap();
        assert_eq!(stored.get("theme"), Some(&json!("light")));
        assert_eq!(stored.get("language"), Some(&json!("en")));
        assert_eq!(stored.get("timezone"), Some(&json!("UTC")));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .update_document(&path("ghost"), doc(json!({ "theme": "dark" })))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_replaces_document() {
        let store = InMemoryDocumentStore::new();
        store.insert(path("u1"), doc(json!({ "theme": "dark", "language": "en" })));

        store
            .set_document(&path("u1"), doc(json!({ "theme": "system" })))
            .await
            .unwrap();

        assert_eq!(store.get(&path("u1")), Some(doc(json!({ "theme": "system" }))));
        assert_eq!(store.len(), 1);
    }
}
