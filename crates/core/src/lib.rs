//! CMS Core - settings models, sync service, and the traits that connect
//! them to the outside world.
//!
//! This crate is store-agnostic. The document store, the auth provider and
//! the toast surface are reached through traits implemented by the
//! `document-store` crate and by runtime hosts.

pub mod auth;
pub mod constants;
pub mod errors;
pub mod notify;
pub mod settings;
pub mod store;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
