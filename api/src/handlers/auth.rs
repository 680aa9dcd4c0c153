use axum::Json;
use chirp_common::views::ClientUser;

use crate::{auth::Auth, error::ApiError};

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tags = ["auth"],
    responses((status = 200, description = "The signed in user", body = ClientUser))
)]
pub async fn auth_whoami(Auth(caller): Auth) -> Result<Json<ClientUser>, ApiError> {
    Ok(Json(caller.api_caller()?.profile()))
}
