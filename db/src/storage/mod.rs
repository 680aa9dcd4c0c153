use std::fmt::Debug;

use async_trait::async_trait;
use chirp_common::params::PaginationParams;
use thiserror::Error;

use crate::models::{DbPost, DbUlid, IdentityUser};

pub mod memory;
pub mod mongodb;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query Error: {0}")]
    MongoDB(#[from] ::mongodb::error::Error),

    #[error("Invalid page token: {0}")]
    InvalidPageToken(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait Storage: UserStore + PostStore + Debug + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub id: Option<Vec<String>>,
}

/// Read access to the identity provider's user directory.
#[async_trait]
pub trait UserStore {
    async fn get(&self, id: &str) -> Result<Option<IdentityUser>, StoreError>;
    async fn list(
        &self,
        filter: UserFilter,
        pagination: PaginationParams,
    ) -> Result<Vec<IdentityUser>, StoreError>;

    /// Insert or replace a user record, as synced from the identity provider.
    async fn upsert(&self, user: IdentityUser) -> Result<IdentityUser, StoreError>;
}

/// A page of posts, newest first.
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub posts: Vec<DbPost>,

    /// Pass back as `next_token` to continue after the last post of this page.
    pub next_token: Option<String>,
}

#[async_trait]
pub trait PostStore {
    async fn get(&self, id: &str) -> Result<Option<DbPost>, StoreError>;

    /// List posts newest first. `pagination.next_token` is the ID of the last
    /// post of the previous page.
    async fn list(&self, pagination: PaginationParams) -> Result<PostPage, StoreError>;

    async fn create(&self, post: DbPost) -> Result<DbPost, StoreError>;
}

pub(crate) fn parse_page_token(token: Option<&str>) -> Result<Option<DbUlid>, StoreError> {
    token
        .map(|t| {
            t.parse::<DbUlid>()
                .map_err(|_| StoreError::InvalidPageToken(t.to_string()))
        })
        .transpose()
}

pub(crate) fn page_of(posts: Vec<DbPost>, limit: u64) -> PostPage {
    let next_token = if posts.len() as u64 == limit {
        posts.last().map(|p| p.id.to_string())
    } else {
        None
    };

    PostPage { posts, next_token }
}
