use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Handle shown for authors that have neither a username nor a first name.
pub const DEFAULT_HANDLE: &str = "User";

/// The public view of a user. This is the only user shape that is ever
/// serialized into a response; anything else the identity provider knows
/// about a user stays on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientUser {
    /// The identity provider's identifier for this user.
    pub id: String,

    /// The user's chosen username, if they have set one.
    pub username: Option<String>,

    /// URL of the user's avatar.
    pub profile_image_url: String,

    /// The user's first name, if the identity provider has one.
    pub first_name: Option<String>,
}

impl ClientUser {
    /// The handle this user is displayed under. See [`resolve_handle`].
    pub fn handle(&self) -> &str {
        resolve_handle(self)
    }
}

/// Resolve the display handle for an author.
///
/// The first non-empty value of `username`, then `first_name`, wins. Authors
/// with neither get [`DEFAULT_HANDLE`]. The returned value carries no `@`
/// prefix; callers add it when rendering a label.
pub fn resolve_handle(author: &ClientUser) -> &str {
    non_empty(author.username.as_deref())
        .or_else(|| non_empty(author.first_name.as_deref()))
        .unwrap_or(DEFAULT_HANDLE)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
