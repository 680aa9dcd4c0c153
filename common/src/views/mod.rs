//! Output views for the various functions within Chirp.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod feed;
pub use feed::*;

mod post;
pub use post::*;

mod user;
pub use user::*;

/// A page of records. This is returned by the various list endpoints to
/// allow clients to page through large sets of records.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T> {
    pub items: Vec<T>,

    /// The token to pass as `nextToken` to fetch the following page, if
    /// there is one.
    pub next_token: Option<String>,

    /// The maximum number of results that were requested.
    pub limit: Option<u64>,
}

/// An error response for an API endpoint. This is used to return errors to the
/// client in a consistent format.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// An optional error code that can be used to identify the type of error
    /// that occurred.
    pub code: Option<String>,

    /// A human-readable message describing the error that occurred.
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Validation messages keyed by the request field they apply to.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, Vec<String>>,
}
