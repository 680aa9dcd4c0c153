//! Process-local storage, for development and tests.

use std::{
    collections::{BTreeMap, HashMap},
    ops::Bound,
};

use async_trait::async_trait;
use chirp_common::params::PaginationParams;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::{
    models::{DbPost, DbUlid, IdentityUser},
    storage::{
        PostPage, PostStore, StoreError, Storage, UserFilter, UserStore, page_of, parse_page_token,
    },
};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    users: RwLock<HashMap<String, IdentityUser>>,
    posts: RwLock<BTreeMap<DbUlid, DbPost>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn get(&self, id: &str) -> Result<Option<IdentityUser>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: UserFilter,
        pagination: PaginationParams,
    ) -> Result<Vec<IdentityUser>, StoreError> {
        let users = self.users.read().await;

        let mut matched: Vec<IdentityUser> = users
            .values()
            .filter(|u| filter.id.as_ref().is_none_or(|ids| ids.contains(&u.id)))
            .cloned()
            .collect();

        matched.sort_by(|a, b| a.id.cmp(&b.id));
        matched.truncate(pagination.effective_limit() as usize);
        Ok(matched)
    }

    async fn upsert(&self, user: IdentityUser) -> Result<IdentityUser, StoreError> {
        self.users.write().await.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

#[async_trait]
impl PostStore for MemoryStorage {
    async fn get(&self, id: &str) -> Result<Option<DbPost>, StoreError> {
        let Ok(id) = id.parse::<DbUlid>() else {
            return Ok(None);
        };

        Ok(self.posts.read().await.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list(&self, pagination: PaginationParams) -> Result<PostPage, StoreError> {
        let before = parse_page_token(pagination.next_token.as_deref())?;
        let limit = pagination.effective_limit();
        let upper = before.map_or(Bound::Unbounded, Bound::Excluded);

        let posts = self.posts.read().await;
        let page: Vec<DbPost> = posts
            .range((Bound::Unbounded, upper))
            .rev()
            .take(limit as usize)
            .map(|(_, p)| p.clone())
            .collect();

        Ok(page_of(page, limit))
    }

    async fn create(&self, post: DbPost) -> Result<DbPost, StoreError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(StoreError::Conflict(format!("post {} already exists", post.id)));
        }

        posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeDelta, Utc};

    use super::*;

    async fn seeded() -> MemoryStorage {
        let store = MemoryStorage::new();
        let now = Utc::now();
        for (i, author) in ["u1", "u2", "u1", "u2", "u1"].iter().enumerate() {
            let at = now - TimeDelta::minutes(10 - i as i64);
            PostStore::create(&store, DbPost::with_created_at(*author, format!("post {i}"), at))
                .await
                .unwrap();
        }
        store
    }

    fn page(limit: u64, next_token: Option<String>) -> PaginationParams {
        PaginationParams {
            next_token,
            limit: Some(limit),
        }
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = seeded().await;
        let page = PostStore::list(&store, PaginationParams::default()).await.unwrap();

        let contents: Vec<_> = page.posts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, ["post 4", "post 3", "post 2", "post 1", "post 0"]);
        assert_eq!(page.next_token, None);
    }

    #[tokio::test]
    async fn paginates_with_tokens() {
        let store = seeded().await;

        let first = PostStore::list(&store, page(2, None)).await.unwrap();
        assert_eq!(first.posts.len(), 2);
        let token = first.next_token.clone().unwrap();
        assert_eq!(token, first.posts[1].id.to_string());

        let second = PostStore::list(&store, page(2, Some(token))).await.unwrap();
        let contents: Vec<_> = second.posts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, ["post 2", "post 1"]);

        let third = PostStore::list(&store, page(2, second.next_token)).await.unwrap();
        assert_eq!(third.posts.len(), 1);
        assert_eq!(third.next_token, None);
    }

    #[tokio::test]
    async fn rejects_garbage_tokens() {
        let store = seeded().await;
        let err = PostStore::list(&store, page(2, Some("nope".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPageToken(t) if t == "nope"));
    }

    #[tokio::test]
    async fn get_post_by_string_id() {
        let store = MemoryStorage::new();
        let created = PostStore::create(&store, DbPost::new("u1", "hi")).await.unwrap();

        let found = PostStore::get(&store, &created.id.to_string()).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(PostStore::get(&store, "not-an-id").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_post_ids_conflict() {
        let store = MemoryStorage::new();
        let post = DbPost::new("u1", "hi");
        PostStore::create(&store, post.clone()).await.unwrap();
        assert!(matches!(
            PostStore::create(&store, post).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn users_filter_by_id() {
        let store = MemoryStorage::new();
        for id in ["u1", "u2", "u3"] {
            store.upsert(IdentityUser::new(id, "img")).await.unwrap();
        }

        let by_id = UserStore::list(
            &store,
            UserFilter {
                id: Some(vec!["u1".into(), "u2".into()]),
            },
            PaginationParams::default(),
        )
        .await
        .unwrap();
        let ids: Vec<_> = by_id.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["u1", "u2"]);

        let everyone = UserStore::list(&store, UserFilter::default(), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(everyone.len(), 3);

        assert!(UserStore::get(&store, "u9").await.unwrap().is_none());
    }
}
