use axum::{
    Json,
    extract::{Query, State},
};
use chirp_common::{
    params::PaginationParams,
    views::{FeedRow, PaginatedList, render_row},
};
use chrono::Utc;

use crate::{context::ApiContext, error::ApiError};

#[utoipa::path(
    get,
    path = "/api/v1/feed",
    tags = ["feed"],
    params(PaginationParams),
    responses((
        status = 200,
        description = "Feed rows ready for display, newest first",
        body = PaginatedList<FeedRow>,
    ))
)]
pub async fn get_feed(
    State(ctx): State<ApiContext>,
    Query(query): Query<PaginationParams>,
) -> Result<Json<PaginatedList<FeedRow>>, ApiError> {
    let limit = query.effective_limit();
    let page = ctx.feed.list_entries(query).await?;

    // Relative times are rendered per request, never cached.
    let now = Utc::now();

    Ok(Json(PaginatedList {
        items: page.entries.iter().map(|e| render_row(e, now)).collect(),
        next_token: page.next_token.clone(),
        limit: Some(limit),
    }))
}
