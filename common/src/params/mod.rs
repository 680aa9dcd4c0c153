//! Input parameters for the various functions within Chirp.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

mod post;
pub use post::*;

/// Largest page size any list endpoint will return.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Parameters for paginating through a list of records. This is used by the
/// various list endpoints to allow clients to paginate through large sets of
/// records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// The next page token, if any. This is acquired by requesting a paginated
    /// set of records and looking at the `nextToken` field.
    pub next_token: Option<String>,

    /// The maximum number of results to return.
    pub limit: Option<u64>,
}

impl PaginationParams {
    /// The page size to actually use, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}
