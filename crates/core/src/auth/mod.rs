//! Authentication context - who is signed in.
//!
//! Session handling lives in the external auth provider; runtime adapters
//! implement [`AuthContext`] and pass it to whoever needs the current user.

mod auth_model;
mod auth_traits;

pub use auth_model::AuthUser;
pub use auth_traits::{AdminOnlyAuth, AuthContext, StaticAuth};
