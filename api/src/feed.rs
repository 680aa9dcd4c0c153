//! Assembles the feed: posts joined with their authors, newest first.
//!
//! Pages are cached for a short time. Submitting a post must call
//! [`FeedService::invalidate`] so the next read sees it.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chirp_common::{
    params::PaginationParams,
    views::{ClientUser, FeedEntry, JoinError},
};
use chirp_db::{
    models::DbPost,
    storage::{PostStore, StoreError, Storage, UserFilter, UserStore},
};
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

const FEED_CACHE_CAPACITY: u64 = 1_000;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("author {author_id} of post {post_id} not found")]
    AuthorNotFound { post_id: String, author_id: String },

    #[error(transparent)]
    Join(#[from] JoinError),
}

/// One page of joined feed entries.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub entries: Vec<FeedEntry>,
    pub next_token: Option<String>,
}

/// Pages are keyed by the invalidation generation they were loaded under, so
/// a load that finishes after [`FeedService::invalidate`] is never served.
type FeedCacheKey = (u64, PaginationParams);

#[derive(Clone)]
pub struct FeedService {
    db: Arc<dyn Storage>,
    cache: Cache<FeedCacheKey, Arc<FeedPage>>,
    generation: Arc<AtomicU64>,
}

impl FeedService {
    pub fn new(db: Arc<dyn Storage>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(FEED_CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();

        Self {
            db,
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A page of the feed, from cache when possible.
    ///
    /// Fails as a whole if any post's author cannot be found; a feed is never
    /// served with rows missing.
    #[instrument(skip(self))]
    pub async fn list_entries(
        &self,
        pagination: PaginationParams,
    ) -> Result<Arc<FeedPage>, Arc<FeedError>> {
        let generation = self.generation.load(Ordering::Acquire);
        self.cache
            .try_get_with((generation, pagination.clone()), self.load(pagination))
            .await
    }

    /// A single post with its author, for permalinks.
    #[instrument(skip(self))]
    pub async fn get_entry(&self, post_id: &str) -> Result<Option<FeedEntry>, FeedError> {
        let Some(post) = PostStore::get(&*self.db, post_id).await? else {
            return Ok(None);
        };

        let mut entries = self.join(vec![post]).await?;
        Ok(entries.pop())
    }

    /// Drop every cached page, including any still being loaded.
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "Invalidating feed cache");
        self.cache.invalidate_all();
    }

    async fn load(&self, pagination: PaginationParams) -> Result<Arc<FeedPage>, FeedError> {
        let page = PostStore::list(&*self.db, pagination).await?;
        let entries = self.join(page.posts).await?;

        Ok(Arc::new(FeedPage {
            entries,
            next_token: page.next_token,
        }))
    }

    /// Pair each post with the public view of its author, keeping post order.
    async fn join(&self, posts: Vec<DbPost>) -> Result<Vec<FeedEntry>, FeedError> {
        let mut author_ids: Vec<String> = posts.iter().map(|p| p.author_id.clone()).collect();
        author_ids.sort();
        author_ids.dedup();

        if author_ids.is_empty() {
            return Ok(vec![]);
        }

        let limit = author_ids.len() as u64;
        let authors: HashMap<String, ClientUser> = UserStore::list(
            &*self.db,
            UserFilter {
                id: Some(author_ids),
            },
            PaginationParams {
                next_token: None,
                limit: Some(limit),
            },
        )
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), ClientUser::from(u)))
        .collect();

        posts
            .into_iter()
            .map(|post| {
                let author = authors
                    .get(&post.author_id)
                    .cloned()
                    .ok_or_else(|| FeedError::AuthorNotFound {
                        post_id: post.id.to_string(),
                        author_id: post.author_id.clone(),
                    })?;

                Ok(FeedEntry::new(post.into(), author)?)
            })
            .collect()
    }
}
