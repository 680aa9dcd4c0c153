use axum::http::request::Parts;
use chirp_common::caller::Caller;
use tracing::{debug, instrument, trace};

use super::{error::AuthError, provider::AuthProvider};

/// Coordinates multiple authentication providers in priority order.
///
/// Providers are tried in registration order. A provider answering
/// `MissingCredentials` passes the request on to the next one; any other
/// error stops the search.
pub struct AuthManager {
    providers: Vec<Box<dyn AuthProvider>>,
}

impl AuthManager {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with_provider<P: AuthProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Try each provider in order until one succeeds
    #[instrument(skip_all)]
    pub async fn authenticate(&self, parts: &Parts) -> Result<Caller, AuthError> {
        for provider in &self.providers {
            trace!(scheme = provider.scheme(), "Trying auth provider");

            match provider.authenticate(parts).await {
                Ok(caller) => {
                    debug!(scheme = provider.scheme(), "Auth succeeded");
                    return Ok(caller);
                }
                Err(AuthError::MissingCredentials) => {
                    trace!(scheme = provider.scheme(), "No credentials for this scheme");
                    continue;
                }
                Err(e) => {
                    debug!(scheme = provider.scheme(), error = %e, "Auth failed");
                    return Err(e);
                }
            }
        }

        Err(AuthError::MissingCredentials)
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::Request;
    use chirp_db::models::IdentityUser;

    use super::*;

    enum Outcome {
        Missing,
        Invalid,
        User(&'static str),
    }

    struct FixedProvider {
        outcome: Outcome,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AuthProvider for FixedProvider {
        async fn authenticate(&self, _parts: &Parts) -> Result<Caller, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Missing => Err(AuthError::MissingCredentials),
                Outcome::Invalid => Err(AuthError::InvalidCredentials),
                Outcome::User(id) => {
                    Ok(Caller::Authenticated(Arc::new(IdentityUser::new(id, "img"))))
                }
            }
        }

        fn scheme(&self) -> &'static str {
            "fixed"
        }
    }

    fn provider(outcome: Outcome) -> (FixedProvider, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            FixedProvider {
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn parts() -> Parts {
        Request::builder().body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn falls_through_missing_credentials() {
        let (first, first_calls) = provider(Outcome::Missing);
        let (second, _) = provider(Outcome::User("u1"));
        let manager = AuthManager::new().with_provider(first).with_provider(second);

        let caller = manager.authenticate(&parts()).await.unwrap();
        assert_eq!(caller.api_caller().unwrap().id(), "u1");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stops_at_first_hard_failure() {
        let (first, _) = provider(Outcome::Invalid);
        let (second, second_calls) = provider(Outcome::User("u1"));
        let manager = AuthManager::new().with_provider(first).with_provider(second);

        let err = manager.authenticate(&parts()).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_providers_means_missing_credentials() {
        let err = AuthManager::default().authenticate(&parts()).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }
}
