use std::{collections::BTreeMap, fmt::Display};

use chrono::{DateTime, Utc};
use chirp_common::{
    caller::{ApiCaller, CallerKind, Permission},
    views::ClientUser,
};
use serde::{Deserialize, Serialize};

/// A user as the identity provider knows them.
///
/// This record carries contact details and private metadata. It must never be
/// serialized into an API response; use [`IdentityUser::project`] to get the
/// public [`ClientUser`] view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: String,
    #[serde(default)]
    pub email_addresses: Vec<String>,
    #[serde(default)]
    pub private_metadata: BTreeMap<String, String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Display for IdentityUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IdentityUser {{ id: {}, username: {:?} }}",
            self.id, self.username
        )
    }
}

impl IdentityUser {
    /// A user with only the fields every identity record has.
    pub fn new(id: impl Into<String>, profile_image_url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            username: None,
            first_name: None,
            last_name: None,
            profile_image_url: profile_image_url.into(),
            email_addresses: vec![],
            private_metadata: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The subset of this user that may be shown to other users.
    pub fn project(&self) -> ClientUser {
        ClientUser {
            id: self.id.clone(),
            username: self.username.clone(),
            profile_image_url: self.profile_image_url.clone(),
            first_name: self.first_name.clone(),
        }
    }
}

impl From<&IdentityUser> for ClientUser {
    fn from(value: &IdentityUser) -> Self {
        value.project()
    }
}

impl From<IdentityUser> for ClientUser {
    fn from(value: IdentityUser) -> Self {
        Self {
            id: value.id,
            username: value.username,
            profile_image_url: value.profile_image_url,
            first_name: value.first_name,
        }
    }
}

impl ApiCaller for IdentityUser {
    fn kind(&self) -> CallerKind {
        CallerKind::User
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn permissions(&self) -> Vec<Permission> {
        // Every signed in user may post.
        vec![Permission::PostsCreate]
    }

    fn profile(&self) -> ClientUser {
        self.project()
    }
}

#[cfg(test)]
mod test {
    use chirp_common::views::resolve_handle;

    use super::*;

    fn identity(
        id: &str,
        username: Option<&str>,
        first_name: Option<&str>,
        img: &str,
    ) -> IdentityUser {
        let mut user = IdentityUser::new(id, img);
        user.username = username.map(Into::into);
        user.first_name = first_name.map(Into::into);
        user.last_name = Some("Secret".into());
        user.email_addresses = vec![format!("{id}@example.com")];
        user.private_metadata.insert("plan".into(), "pro".into());
        user
    }

    #[test]
    fn projects_full_user() {
        let user = identity("u1", Some("alice"), Some("Alice"), "img1");
        let client = user.project();

        assert_eq!(
            client,
            ClientUser {
                id: "u1".into(),
                username: Some("alice".into()),
                profile_image_url: "img1".into(),
                first_name: Some("Alice".into()),
            }
        );
        assert_eq!(resolve_handle(&client), "alice");
    }

    #[test]
    fn projection_scenarios_resolve_handles() {
        let bob = identity("u2", None, Some("Bob"), "img2");
        assert_eq!(resolve_handle(&bob.project()), "Bob");

        let anon = identity("u3", None, None, "img3");
        assert_eq!(resolve_handle(&anon.project()), "User");
    }

    #[test]
    fn projection_exposes_only_public_fields() {
        let user = identity("u1", Some("alice"), Some("Alice"), "img1");
        let json = serde_json::to_value(ClientUser::from(user)).unwrap();

        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["firstName", "id", "profileImageUrl", "username"]);
        assert!(!json.to_string().contains("example.com"));
        assert!(!json.to_string().contains("Secret"));
    }

    #[test]
    fn owned_and_borrowed_projection_agree() {
        let user = identity("u2", None, Some("Bob"), "img2");
        assert_eq!(ClientUser::from(&user), ClientUser::from(user.clone()));
        assert_eq!(user.profile(), user.project());
    }
}
