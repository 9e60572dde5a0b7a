//! Axum router construction.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    let assets = ServeDir::new(state.web_dir.as_path());

    Router::new()
        .route("/", get(handlers::index))
        .route("/encrypt", post(handlers::encrypt_query))
        .route("/decrypt", post(handlers::decrypt_query))
        .route("/api/encrypt", post(handlers::encrypt_json))
        .route("/api/decrypt", post(handlers::decrypt_json))
        .route("/health", get(handlers::health))
        .nest_service("/web", assets)
        .fallback(handlers::not_found)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_span))
        .layer(SetRequestIdLayer::x_request_id(middleware::RequestUuid))
        .with_state(state)
}
