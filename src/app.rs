//! Router for the shell server.

use axum::{
    Router, middleware,
    routing::{any, get},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

use crate::{
    handlers::{proxy_api, runtime_config, serve_shell},
    middleware::log_requests,
    state::AppState,
};

/// `/config.json`, the API proxy under `state.api_path`, and the bundle as
/// fallback.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/config.json", get(runtime_config))
        .route(&format!("{}/{{*path}}", state.api_path), any(proxy_api))
        .fallback(get(serve_shell))
        .layer(middleware::from_fn(log_requests))
        .layer(CompressionLayer::new())
        .with_state(state)
}
