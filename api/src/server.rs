use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
};
use chirp_common::views::ApiErrorResponse;
use chirp_db::storage::{Storage, memory::MemoryStorage, mongodb::MongoDBStorage};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span};
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{Info, License, OpenApi, RefOr, path::Operation},
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{config::ChirpApiConfig, context::ApiContext, handlers};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the router against the storage backend named by the config.
pub async fn make(cfg: ChirpApiConfig) -> anyhow::Result<(Router, OpenApi)> {
    let db: Arc<dyn Storage> = match &cfg.mongodb_uri {
        Some(uri) => {
            info!("Using MongoDB storage");
            Arc::new(
                MongoDBStorage::new(uri)
                    .await
                    .context("failed to connect to MongoDB")?,
            )
        }
        None => {
            info!("No MongoDB URI configured, using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    };

    make_with_storage(cfg, db)
}

pub fn make_with_storage(
    cfg: ChirpApiConfig,
    db: Arc<dyn Storage>,
) -> anyhow::Result<(Router, OpenApi)> {
    let allowed_origin = cfg
        .public_url
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid public URL {:?}", cfg.public_url))?;

    let context = ApiContext::new(cfg, db);

    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                let span = info_span!(
                    "http_request",
                    method = req.method().to_string(),
                    request_id = Option::<&str>::None,
                    path = Option::<&str>::None,
                );

                if let Some(request_id) = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                {
                    span.record("request_id", request_id);
                }

                if let Some(path) = req.extensions().get::<MatchedPath>() {
                    span.record("path", path.as_str())
                } else {
                    span.record("path", req.uri().path())
                };

                span
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_credentials(true)
                .allow_origin(allowed_origin),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id));

    let openapi = OpenApi::builder()
        .info(
            Info::builder()
                .title("Chirp API Reference")
                .version(env!("CARGO_PKG_VERSION"))
                .license(Some(
                    License::builder()
                        .name("Apache 2.0 License")
                        .identifier(Some(env!("CARGO_PKG_LICENSE")))
                        .build(),
                )),
        )
        .build();

    let (r, mut a) = OpenApiRouter::with_openapi(openapi)
        .routes(routes!(handlers::health_check))
        .routes(routes!(handlers::auth::auth_whoami))
        .routes(routes!(handlers::posts::list_posts, handlers::posts::create_post))
        .routes(routes!(handlers::posts::get_post))
        .routes(routes!(handlers::feed::get_feed))
        .layer(middleware)
        .with_state(context)
        .split_for_parts();

    if let Some(components) = a.components.as_mut() {
        components
            .schemas
            .entry(ApiErrorResponse::name().into_owned())
            .or_insert_with(ApiErrorResponse::schema);
    }

    a.paths.paths.iter_mut().for_each(|(_path, item)| {
        apply_default_errors(&mut item.get);
        apply_default_errors(&mut item.post);
        apply_default_errors(&mut item.patch);
        apply_default_errors(&mut item.put);
        apply_default_errors(&mut item.delete);
    });

    Ok((r, a))
}

fn apply_default_errors(item: &mut Option<Operation>) {
    let Some(item) = item else {
        return;
    };

    for (status, summary) in [
        ("401", "Unauthorized"),
        ("403", "Forbidden"),
        ("500", "Internal server error"),
    ] {
        item.responses
            .responses
            .entry(status.into())
            .or_insert_with(|| {
                RefOr::Ref(
                    utoipa::openapi::Ref::builder()
                        .summary(summary)
                        .ref_location_from_schema_name(ApiErrorResponse::name())
                        .build(),
                )
            });
    }
}
