use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

/// Routes plus request tracing and the per-request deadline. Dropping a
/// handler on timeout also drops its open transaction, which rolls it back.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/users/create", post(handlers::users::create_user))
        .route("/api/auth", post(handlers::auth::login));

    // Upload bodies are capped by `CappedBody`, not by axum's default limit.
    let asset_routes = Router::new()
        .route(
            "/api/upload-asset/{name}",
            post(handlers::assets::upload_asset).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/api/upload-asset/",
            post(handlers::assets::upload_missing_name),
        )
        .route(
            "/api/asset/{name}",
            get(handlers::assets::fetch_asset).delete(handlers::assets::delete_asset),
        )
        .route("/api/list-assets", get(handlers::assets::list_assets));

    Router::new()
        .merge(public_routes)
        .merge(asset_routes)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
}
