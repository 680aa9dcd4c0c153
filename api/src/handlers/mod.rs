use axum::{Json, extract::State};

use crate::{context::ApiContext, error::ApiError};

pub mod auth;
pub mod feed;
pub mod posts;

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tags = ["health"],
    responses((status = 200, description = "Service and storage are reachable", body = String))
)]
pub async fn health_check(
    State(ctx): State<ApiContext>,
) -> Result<Json<&'static str>, ApiError> {
    ctx.db.ping().await?;
    Ok(Json("Healthy"))
}
