use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::ClientUser;

/// A published post. Posts cannot be edited once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// The unique identifier for this post.
    pub id: String,

    /// The text of the post, exactly as it was submitted.
    pub content: String,

    pub created_at: DateTime<Utc>,

    /// Identifier of the user that wrote this post.
    pub author_id: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("post {post_id} belongs to {expected}, but author {actual} was supplied")]
pub struct JoinError {
    pub post_id: String,
    pub expected: String,
    pub actual: String,
}

/// A post paired with the public view of its author.
///
/// Entries can only be built through [`FeedEntry::new`], which checks that
/// the author really is the one the post points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeedEntry {
    post: Post,
    author: ClientUser,
}

impl FeedEntry {
    pub fn new(post: Post, author: ClientUser) -> Result<Self, JoinError> {
        if post.author_id != author.id {
            return Err(JoinError {
                post_id: post.id,
                expected: post.author_id,
                actual: author.id,
            });
        }

        Ok(Self { post, author })
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn author(&self) -> &ClientUser {
        &self.author
    }

    pub fn into_parts(self) -> (Post, ClientUser) {
        (self.post, self.author)
    }
}

impl<'de> Deserialize<'de> for FeedEntry {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            post: Post,
            author: ClientUser,
        }

        let raw = Raw::deserialize(d)?;
        FeedEntry::new(raw.post, raw.author).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn post(author_id: &str) -> Post {
        Post {
            id: "p1".into(),
            content: "hi".into(),
            created_at: Utc::now(),
            author_id: author_id.into(),
        }
    }

    fn user(id: &str) -> ClientUser {
        ClientUser {
            id: id.into(),
            username: Some("alice".into()),
            profile_image_url: "img1".into(),
            first_name: None,
        }
    }

    #[test]
    fn entry_accepts_matching_author() {
        let entry = FeedEntry::new(post("u1"), user("u1")).unwrap();
        assert_eq!(entry.post().id, "p1");
        assert_eq!(entry.author().id, "u1");
    }

    #[test]
    fn entry_rejects_mismatched_author() {
        let err = FeedEntry::new(post("u1"), user("u2")).unwrap_err();
        assert_eq!(
            err,
            JoinError {
                post_id: "p1".into(),
                expected: "u1".into(),
                actual: "u2".into(),
            }
        );
    }

    #[test]
    fn deserializing_enforces_join() {
        let good = serde_json::json!({
            "post": post("u1"),
            "author": user("u1"),
        });
        assert!(serde_json::from_value::<FeedEntry>(good).is_ok());

        let bad = serde_json::json!({
            "post": post("u1"),
            "author": user("u2"),
        });
        assert!(serde_json::from_value::<FeedEntry>(bad).is_err());
    }
}
