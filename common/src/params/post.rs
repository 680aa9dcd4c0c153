use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Longest post accepted, in characters.
pub const MAX_POST_LENGTH: usize = 280;

pub const CONTENT_EMPTY_MESSAGE: &str = "Post content must not be empty";
pub const CONTENT_TOO_LONG_MESSAGE: &str = "Post content must be at most 280 characters";
pub const CONTENT_NOT_TEXT_MESSAGE: &str = "Post content must be text";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePostParams {
    /// The text of the post. Must contain something other than whitespace
    /// and be at most 280 characters long.
    ///
    /// A missing field reads as empty so it fails validation like `""`.
    #[serde(default)]
    pub content: String,
}

/// A request body that failed validation, with messages per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed for: {}", .field_errors.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// The first message recorded for `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

impl CreatePostParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();

        if self.content.trim().is_empty() {
            errors.add("content", CONTENT_EMPTY_MESSAGE);
        } else if self.content.chars().count() > MAX_POST_LENGTH {
            errors.add("content", CONTENT_TOO_LONG_MESSAGE);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
