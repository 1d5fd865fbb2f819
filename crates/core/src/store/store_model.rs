//! Document addressing and payload types.

use std::fmt;

use serde_json::{Map, Value};

use crate::constants::USER_SETTINGS_COLLECTION;
use crate::errors::{Result, ValidationError};

/// A semi-structured record as held by the document store.
pub type Document = Map<String, Value>;

/// Address of a single document: `{collection}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: String,
    id: String,
}

impl DocumentPath {
    /// Builds a path, rejecting empty segments and segments containing `/`.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        let id = id.into();
        for segment in [&collection, &id] {
            if segment.trim().is_empty() || segment.contains('/') {
                return Err(ValidationError::InvalidPath(format!("{}/{}", collection, id)).into());
            }
        }
        Ok(Self { collection, id })
    }

    /// Path of the settings document owned by `uid`.
    pub fn user_settings(uid: &str) -> Result<Self> {
        Self::new(USER_SETTINGS_COLLECTION, uid)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
