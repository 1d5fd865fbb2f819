use std::sync::Arc;

use log::warn;

use super::AuthUser;

/// Source of the current user identity.
pub trait AuthContext: Send + Sync {
    /// The signed-in user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<AuthUser>;
}

/// Fixed identity, for in-process hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<AuthUser>,
}

impl StaticAuth {
    pub fn signed_in(user: AuthUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

impl AuthContext for StaticAuth {
    fn current_user(&self) -> Option<AuthUser> {
        self.user.clone()
    }
}

/// Admits only the configured administrator account.
///
/// Any other signed-in user is reported as signed out.
pub struct AdminOnlyAuth {
    inner: Arc<dyn AuthContext>,
    admin_uid: String,
}

impl AdminOnlyAuth {
    pub fn new(inner: Arc<dyn AuthContext>, admin_uid: impl Into<String>) -> Self {
        Self {
            inner,
            admin_uid: admin_uid.into(),
        }
    }
}

impl AuthContext for AdminOnlyAuth {
    fn current_user(&self) -> Option<AuthUser> {
        let user = self.inner.current_user()?;
        if user.uid == self.admin_uid {
            Some(user)
        } else {
            warn!("Rejecting non-admin user {}", user.uid);
            None
        }
    }
}
