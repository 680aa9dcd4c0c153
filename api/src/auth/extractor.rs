use std::future::Future;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use chirp_common::caller::{Caller, CallerError};

use super::AuthError;
use crate::{context::ApiContext, error::ApiError};

/// Extractor for handlers that need a signed in user.
///
/// Rejects the request with 401 when no provider recognises the caller.
///
/// ```rust,ignore
/// pub async fn create_post(
///     Auth(caller): Auth,
///     Json(body): Json<CreatePostParams>,
/// ) -> Result<Json<Post>, ApiError> {
///     caller.require(Permission::PostsCreate)?;
///     // ...
/// }
/// ```
pub struct Auth(pub Caller);

impl FromRequestParts<ApiContext> for Auth {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &ApiContext,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth_manager = Arc::clone(&state.auth_manager);
        async move {
            let caller = auth_manager.authenticate(parts).await.map_err(|e| match e {
                AuthError::Storage(se) => ApiError::Storage(se),
                e => ApiError::CallerError(CallerError::unauthorized(Some(e.to_string()))),
            })?;
            Ok(Auth(caller))
        }
    }
}
