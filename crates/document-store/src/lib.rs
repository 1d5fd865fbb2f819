//! CMS Document Store - backends for the core `DocumentStore` trait.
//!
//! Two backends are provided: a REST client for the hosted document store
//! and an in-memory store with the same write semantics.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cms_document_store::RestDocumentStore;
//!
//! let store = RestDocumentStore::new("https://docs.example.com")?
//!     .with_token("access_token");
//! let path = DocumentPath::user_settings("uid")?;
//! let doc = store.get_document(&path).await?;
//! ```

mod client;
mod error;
mod memory;
mod types;

pub use client::RestDocumentStore;
pub use error::{DocumentStoreError, Result};
pub use memory::InMemoryDocumentStore;
pub use types::*;
