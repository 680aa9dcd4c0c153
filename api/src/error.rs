use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
};
use chirp_common::{caller::CallerError, params::ValidationError, views::ApiErrorResponse};
use chirp_db::storage::StoreError;
use thiserror::Error;

use crate::feed::FeedError;

const INTERNAL_MESSAGE: &str = "Something went wrong on our end. Please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidBody(JsonRejection),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Feed(#[from] Arc<FeedError>),

    #[error(transparent)]
    CallerError(#[from] CallerError),
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Storage(se) => Self::Storage(se),
            other => Self::Feed(Arc::new(other)),
        }
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody(rejection) => rejection.status(),
            Self::Storage(se) => storage_status(se),
            Self::Feed(fe) => match &**fe {
                FeedError::Storage(se) => storage_status(se),
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CallerError(ce) => match ce {
                CallerError::Forbidden { .. } => StatusCode::FORBIDDEN,
                CallerError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            },
        }
    }
}

fn storage_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::InvalidPageToken(_) => StatusCode::BAD_REQUEST,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn storage_code_message(err: &StoreError) -> (&'static str, String) {
    match err {
        StoreError::InvalidPageToken(_) => {
            ("BadRequest", "The page token is not valid.".into())
        }
        StoreError::Conflict(_) => ("Conflict", "The resource already exists.".into()),
        _ => ("InternalError", INTERNAL_MESSAGE.into()),
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(err: ApiError) -> Self {
        let (code, message) = match &err {
            ApiError::NotFound => ("NotFound", "The requested resource was not found.".into()),
            ApiError::Validation(_) => (
                "ValidationFailed",
                "The request did not pass validation.".into(),
            ),
            ApiError::InvalidBody(rejection) => ("BadRequest", rejection.body_text()),
            ApiError::Storage(se) => storage_code_message(se),
            ApiError::Feed(fe) => match &**fe {
                FeedError::Storage(se) => storage_code_message(se),
                _ => ("InternalError", INTERNAL_MESSAGE.into()),
            },
            ApiError::CallerError(ce) => match ce {
                CallerError::Forbidden { .. } => (
                    "Forbidden",
                    "You do not have permission to perform this action.".into(),
                ),
                CallerError::Unauthorized { .. } => (
                    "Unauthorized",
                    "You are not authenticated to perform this action.".into(),
                ),
            },
        };

        let field_errors = match &err {
            ApiError::Validation(ve) => ve.field_errors.clone(),
            _ => BTreeMap::new(),
        };

        ApiErrorResponse {
            code: Some(code.into()),
            message,

            #[cfg(debug_assertions)]
            details: Some(err.to_string()),

            #[cfg(not(debug_assertions))]
            details: None,

            field_errors,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("Error returned by handler: {self}");
        } else {
            tracing::debug!("Request rejected: {self}");
        }

        (status_code, Json(ApiErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use chirp_common::{
        caller::Permission,
        params::{CONTENT_EMPTY_MESSAGE, CreatePostParams},
        views::JoinError,
    };

    use super::*;

    #[test]
    fn validation_errors_carry_field_messages() {
        let err = CreatePostParams {
            content: String::new(),
        }
        .validate()
        .unwrap_err();
        let api = ApiError::from(err);
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);

        let body = ApiErrorResponse::from(api);
        assert_eq!(body.code.as_deref(), Some("ValidationFailed"));
        assert_eq!(body.field_errors["content"], [CONTENT_EMPTY_MESSAGE]);
    }

    #[test]
    fn feed_failures_are_generic_internal_errors() {
        let api = ApiError::from(FeedError::Join(JoinError {
            post_id: "p1".into(),
            expected: "u1".into(),
            actual: "u2".into(),
        }));
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = ApiErrorResponse::from(api);
        assert_eq!(body.message, INTERNAL_MESSAGE);
        assert!(body.field_errors.is_empty());
    }

    #[test]
    fn caller_errors_map_to_auth_statuses() {
        assert_eq!(
            ApiError::from(CallerError::unauthorized(None)).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(CallerError::forbidden(Permission::PostsCreate)).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn bad_page_token_is_a_client_error() {
        let api = ApiError::from(FeedError::Storage(StoreError::InvalidPageToken("x".into())));
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);
    }
}
