//! Authentication by identity gateway headers.
//!
//! Chirp does not run its own sign in flow. An identity gateway in front of
//! the API verifies the user's session and forwards the user's ID in the
//! `X-Identity-User-Id` header. The user record itself is looked up in the
//! user directory that the identity provider keeps in sync.
//!
//! When a proxy secret is configured, the gateway must also send it in
//! `X-Identity-Proxy-Secret`; requests carrying a user ID but no matching
//! secret are rejected instead of being treated as anonymous.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderMap, request::Parts};
use chirp_common::caller::Caller;
use chirp_db::storage::{Storage, UserStore};
use tracing::{debug, instrument};

use crate::auth::{error::AuthError, provider::AuthProvider};

pub const USER_ID_HEADER: &str = "x-identity-user-id";
pub const PROXY_SECRET_HEADER: &str = "x-identity-proxy-secret";

pub struct IdentityHeaderAuthProvider {
    db: Arc<dyn Storage>,
    proxy_secret: Option<String>,
}

impl IdentityHeaderAuthProvider {
    pub fn new(db: Arc<dyn Storage>, proxy_secret: Option<String>) -> Self {
        Self { db, proxy_secret }
    }

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get(name)?
            .to_str()
            .ok()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn check_proxy_secret(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let Some(expected) = &self.proxy_secret else {
            return Ok(());
        };

        match Self::header(headers, PROXY_SECRET_HEADER) {
            Some(given) if given == expected => Ok(()),
            _ => Err(AuthError::UntrustedProxy),
        }
    }
}

#[async_trait]
impl AuthProvider for IdentityHeaderAuthProvider {
    #[instrument(skip(self, parts), fields(scheme = "identity-header"))]
    async fn authenticate(&self, parts: &Parts) -> Result<Caller, AuthError> {
        let user_id =
            Self::header(&parts.headers, USER_ID_HEADER).ok_or(AuthError::MissingCredentials)?;

        self.check_proxy_secret(&parts.headers)?;

        let user = UserStore::get(&*self.db, user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        debug!(user_id = %user.id, "User authenticated");

        Ok(Caller::Authenticated(Arc::new(user)))
    }

    fn scheme(&self) -> &'static str {
        "identity-header"
    }
}
