use std::sync::Arc;

use chirp_db::storage::Storage;

use crate::{
    auth::{AuthManager, IdentityHeaderAuthProvider},
    config::ChirpApiConfig,
    feed::FeedService,
};

/// Request-scoped state handed to every handler.
#[derive(Clone)]
pub struct ApiContext {
    pub config: ChirpApiConfig,
    pub db: Arc<dyn Storage>,
    pub auth_manager: Arc<AuthManager>,
    pub feed: FeedService,
}

impl ApiContext {
    pub fn new(config: ChirpApiConfig, db: Arc<dyn Storage>) -> Self {
        let auth_manager = AuthManager::new().with_provider(IdentityHeaderAuthProvider::new(
            db.clone(),
            config.identity_proxy_secret.clone(),
        ));
        let feed = FeedService::new(db.clone(), config.feed_cache_ttl());

        Self {
            config,
            db,
            auth_manager: Arc::new(auth_manager),
            feed,
        }
    }
}
