//! Toast notifications.
//!
//! Core reports the outcome of user-triggered operations through the
//! [`Notifier`] trait. Runtime adapters decide how a toast is shown.

mod sink;
mod toast;

pub use sink::*;
pub use toast::*;
