use chrono::{DateTime, Utc};
use chirp_common::views::Post;
use serde::{Deserialize, Serialize};

use crate::models::DbUlid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbPost {
    /// Also encodes when the post was created.
    #[serde(rename = "_id")]
    pub id: DbUlid,

    pub content: String,

    /// Identity provider ID of the author.
    pub author_id: String,
}

impl DbPost {
    pub fn new(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: DbUlid::new(),
            content: content.into(),
            author_id: author_id.into(),
        }
    }

    /// A post backdated to `created_at`.
    pub fn with_created_at(
        author_id: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DbUlid::at(created_at),
            content: content.into(),
            author_id: author_id.into(),
        }
    }

    /// Get the creation time of this post based on the ULID's timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.id.datetime()
    }
}

impl From<DbPost> for Post {
    fn from(value: DbPost) -> Self {
        Self {
            id: value.id.to_string(),
            created_at: value.created_at(),
            content: value.content,
            author_id: value.author_id,
        }
    }
}
