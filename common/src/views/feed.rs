use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FeedEntry, resolve_handle};
use crate::time::relative_time;

/// Separator placed between the handle and the timestamp in a byline.
pub const BYLINE_SEPARATOR: char = '\u{00B7}';

/// A single row of the feed, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedRow {
    /// Avatar of the post's author.
    pub avatar_url: String,

    /// The author's handle, prefixed with `@`.
    pub handle_label: String,

    /// Route of the author's profile page.
    pub handle_link: String,

    /// When the post was written, relative to the time the row was rendered.
    pub time_label: String,

    /// Permalink route of the post.
    pub time_link: String,

    /// The post text, verbatim.
    pub body: String,
}

impl FeedRow {
    /// The line shown above the post body, e.g. `@alice · 3 hours ago`.
    pub fn byline(&self) -> String {
        format!(
            "{} {BYLINE_SEPARATOR} {}",
            self.handle_label, self.time_label
        )
    }
}

/// Route of a user's profile page.
pub fn profile_path(handle: &str) -> String {
    format!("/@{handle}")
}

/// Route of a single post.
pub fn permalink_path(post_id: &str) -> String {
    format!("/post/{post_id}")
}

/// Render a feed entry as of `now`.
pub fn render_row(entry: &FeedEntry, now: DateTime<Utc>) -> FeedRow {
    let post = entry.post();
    let author = entry.author();

    // Label and link must agree on the fallback, so resolve exactly once.
    let handle = resolve_handle(author);

    FeedRow {
        avatar_url: author.profile_image_url.clone(),
        handle_label: format!("@{handle}"),
        handle_link: profile_path(handle),
        time_label: relative_time(post.created_at, now),
        time_link: permalink_path(&post.id),
        body: post.content.clone(),
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeDelta;

    use super::*;
    use crate::views::{ClientUser, Post};

    fn entry(
        username: Option<&str>,
        first_name: Option<&str>,
        age: TimeDelta,
        now: DateTime<Utc>,
    ) -> FeedEntry {
        let author = ClientUser {
            id: "u1".into(),
            username: username.map(Into::into),
            profile_image_url: "img1".into(),
            first_name: first_name.map(Into::into),
        };
        let post = Post {
            id: "p1".into(),
            content: "hi".into(),
            created_at: now - age,
            author_id: "u1".into(),
        };

        FeedEntry::new(post, author).unwrap()
    }

    #[test]
    fn renders_row_for_named_author() {
        let now = Utc::now();
        let alice = entry(Some("alice"), Some("Alice"), TimeDelta::seconds(3600), now);
        let row = render_row(&alice, now);

        assert_eq!(row.avatar_url, "img1");
        assert_eq!(row.handle_label, "@alice");
        assert_eq!(row.handle_link, "/@alice");
        assert_eq!(row.time_label, "an hour ago");
        assert_eq!(row.time_link, "/post/p1");
        assert_eq!(row.body, "hi");
    }

    #[test]
    fn label_and_link_share_the_fallback() {
        let now = Utc::now();
        let cases = [
            (Some("alice"), Some("Alice"), "alice"),
            (None, Some("Bob"), "Bob"),
            (Some(""), Some("Bob"), "Bob"),
            (None, None, "User"),
            (Some(""), Some(""), "User"),
        ];

        for (username, first_name, handle) in cases {
            let row = render_row(&entry(username, first_name, TimeDelta::zero(), now), now);
            assert_eq!(row.handle_label, format!("@{handle}"));
            assert_eq!(row.handle_link, format!("/@{handle}"));
            assert_eq!(
                row.handle_label.trim_start_matches('@'),
                row.handle_link.trim_start_matches("/@")
            );
        }
    }

    #[test]
    fn body_is_verbatim() {
        let now = Utc::now();
        let mut e = entry(Some("alice"), None, TimeDelta::zero(), now);
        let (mut post, author) = e.clone().into_parts();
        post.content = "  <b>not escaped</b> 🎉\n".into();
        e = FeedEntry::new(post, author).unwrap();

        assert_eq!(render_row(&e, now).body, "  <b>not escaped</b> 🎉\n");
    }

    #[test]
    fn byline_uses_middle_dot() {
        let now = Utc::now();
        let row = render_row(&entry(Some("alice"), None, TimeDelta::hours(3), now), now);
        assert_eq!(row.byline(), "@alice \u{00B7} 3 hours ago");
    }
}
