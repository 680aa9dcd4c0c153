use async_trait::async_trait;
use bson::doc;
use chirp_common::params::PaginationParams;
use futures::TryStreamExt;
use mongodb::{
    Client, Database,
    error::{ErrorKind, WriteFailure},
    options::FindOptions,
};
use tracing::instrument;

use crate::{
    models::{DbPost, DbUlid, IdentityUser},
    storage::{
        PostPage, PostStore, StoreError, Storage, UserFilter, UserStore, page_of,
        parse_page_token,
    },
};

#[derive(Debug)]
pub struct MongoDBStorage(Client);

impl MongoDBStorage {
    pub async fn new(uri: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self(client))
    }

    fn get_db(&self) -> Database {
        self.0
            .default_database()
            .unwrap_or_else(|| self.0.database("chirp"))
    }
}

pub const MONGODB_COLLECTION_USERS: &str = "users";
pub const MONGODB_COLLECTION_POSTS: &str = "posts";

const DUPLICATE_KEY: i32 = 11000;

#[async_trait]
impl Storage for MongoDBStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        self.get_db().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoDBStorage {
    async fn get(&self, id: &str) -> Result<Option<IdentityUser>, StoreError> {
        let users = UserStore::list(
            self,
            UserFilter {
                id: Some(vec![id.to_string()]),
            },
            PaginationParams {
                next_token: None,
                limit: Some(1),
            },
        )
        .await?;

        Ok(users.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: UserFilter,
        pagination: PaginationParams,
    ) -> Result<Vec<IdentityUser>, StoreError> {
        let collection = self
            .get_db()
            .collection::<IdentityUser>(MONGODB_COLLECTION_USERS);

        let find_options = FindOptions::builder()
            .limit(pagination.effective_limit() as i64)
            .sort(doc! { "_id": 1 });

        let mut filter_doc = doc! {};
        if let Some(ids) = filter.id {
            filter_doc.insert("_id", doc! { "$in": ids });
        }

        collection
            .find(filter_doc)
            .with_options(find_options.build())
            .await?
            .try_collect()
            .await
            .map_err(StoreError::MongoDB)
    }

    async fn upsert(&self, user: IdentityUser) -> Result<IdentityUser, StoreError> {
        self.get_db()
            .collection::<IdentityUser>(MONGODB_COLLECTION_USERS)
            .replace_one(doc! { "_id": user.id.as_str() }, &user)
            .upsert(true)
            .await?;

        Ok(user)
    }
}

#[async_trait]
impl PostStore for MongoDBStorage {
    async fn get(&self, id: &str) -> Result<Option<DbPost>, StoreError> {
        let Ok(id) = id.parse::<DbUlid>() else {
            return Ok(None);
        };

        self.get_db()
            .collection::<DbPost>(MONGODB_COLLECTION_POSTS)
            .find_one(doc! { "_id": id })
            .await
            .map_err(StoreError::MongoDB)
    }

    #[instrument(skip(self))]
    async fn list(&self, pagination: PaginationParams) -> Result<PostPage, StoreError> {
        let before = parse_page_token(pagination.next_token.as_deref())?;
        let limit = pagination.effective_limit();

        let collection = self
            .get_db()
            .collection::<DbPost>(MONGODB_COLLECTION_POSTS);

        // ULIDs sort by creation time, so `_id` descending is newest first.
        let find_options = FindOptions::builder()
            .limit(limit as i64)
            .sort(doc! { "_id": -1 });

        let mut filter_doc = doc! {};
        if let Some(before) = before {
            filter_doc.insert("_id", doc! { "$lt": before });
        }

        let posts: Vec<DbPost> = collection
            .find(filter_doc)
            .with_options(find_options.build())
            .await?
            .try_collect()
            .await?;

        Ok(page_of(posts, limit))
    }

    async fn create(&self, post: DbPost) -> Result<DbPost, StoreError> {
        let result = self
            .get_db()
            .collection::<DbPost>(MONGODB_COLLECTION_POSTS)
            .insert_one(&post)
            .await;

        match result {
            Ok(_) => Ok(post),
            Err(e) if is_duplicate_key(&e) => {
                Err(StoreError::Conflict(format!("post {} already exists", post.id)))
            }
            Err(e) => Err(StoreError::MongoDB(e)),
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}
