//! Document store module - addressing types and the store trait.
//!
//! The store itself is an external product. Core only knows it through the
//! narrow [`DocumentStore`] trait, implemented by the `document-store` crate.

mod store_model;
mod store_traits;

pub use store_model::{Document, DocumentPath};
pub use store_traits::DocumentStore;
