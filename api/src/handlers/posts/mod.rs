use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use chirp_common::{
    caller::Permission,
    params::{CONTENT_NOT_TEXT_MESSAGE, CreatePostParams, PaginationParams, ValidationError},
    views::{FeedEntry, PaginatedList, Post},
};
use chirp_db::{models::DbPost, storage::PostStore};
use tracing::info;

use crate::{auth::Auth, context::ApiContext, error::ApiError};


#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tags = ["posts"],
    params(PaginationParams),
    responses((
        status = 200,
        description = "Posts with their authors, newest first",
        body = PaginatedList<FeedEntry>,
    ))
)]
pub async fn list_posts(
    State(ctx): State<ApiContext>,
    Query(query): Query<PaginationParams>,
) -> Result<Json<PaginatedList<FeedEntry>>, ApiError> {
    let limit = query.effective_limit();
    let page = ctx.feed.list_entries(query).await?;

    Ok(Json(PaginatedList {
        items: page.entries.clone(),
        next_token: page.next_token.clone(),
        limit: Some(limit),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tags = ["posts"],
    request_body(content = CreatePostParams, content_type = "application/json"),
    responses(
        (status = 201, description = "Post created", body = Post),
        (
            status = 400,
            description = "Content failed validation",
            body = chirp_common::views::ApiErrorResponse,
        ),
    )
)]
pub async fn create_post(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    body: Result<Json<CreatePostParams>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    caller.require(Permission::PostsCreate)?;

    let Json(body) = body.map_err(body_rejection)?;
    body.validate()?;

    let author_id = caller.api_caller()?.id();
    let created = PostStore::create(&*ctx.db, DbPost::new(author_id, body.content)).await?;

    info!(post_id = %created.id, author_id = %created.author_id, "Post created");
    ctx.feed.invalidate();

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// A body that parsed as JSON but not as [`CreatePostParams`] can only have a
/// bad `content`, so report it as a field error.
fn body_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(_) => {
            let mut errors = ValidationError::default();
            errors.add("content", CONTENT_NOT_TEXT_MESSAGE);
            errors.into()
        }
        other => ApiError::InvalidBody(other),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tags = ["posts"],
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post with its author", body = FeedEntry),
        (status = 404, description = "Not found"),
    )
)]
pub async fn get_post(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<FeedEntry>, ApiError> {
    let entry = ctx.feed.get_entry(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(entry))
}
