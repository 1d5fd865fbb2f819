//! Request identity.
//!
//! The server sits behind an auth proxy that has already verified the
//! session and forwards the uid in a header.

use axum::{extract::FromRequestParts, http::request::Parts};
use cms_core::auth::{AuthContext, AuthUser};

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Identity forwarded by the upstream proxy for one request.
#[derive(Debug, Clone, Default)]
pub struct HeaderAuth {
    user: Option<AuthUser>,
}

impl HeaderAuth {
    pub fn from_parts(parts: &Parts) -> Result<Self, ApiError> {
        let header = |name: &str| -> Result<Option<String>, ApiError> {
            match parts.headers.get(name) {
                None => Ok(None),
                Some(value) => value
                    .to_str()
                    .map(|v| Some(v.trim().to_string()).filter(|v| !v.is_empty()))
                    .map_err(|_| ApiError::BadRequest(format!("Invalid {} header", name))),
            }
        };

        let Some(uid) = header(USER_ID_HEADER)? else {
            return Ok(Self::default());
        };
        let mut user = AuthUser::new(uid);
        user.email = header(USER_EMAIL_HEADER)?;
        Ok(Self { user: Some(user) })
    }
}

impl<S> FromRequestParts<S> for HeaderAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        HeaderAuth::from_parts(parts)
    }
}

impl AuthContext for HeaderAuth {
    fn current_user(&self) -> Option<AuthUser> {
        self.user.clone()
    }
}
