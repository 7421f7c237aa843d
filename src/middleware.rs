//! Request logging middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use nanoid::nanoid;
use std::time::Instant;
use tracing::info;

use crate::colors::colored_id;

/// Short id attached to every request for log correlation.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// When the request entered the server.
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

impl RequestStart {
    pub fn elapsed_ms(&self) -> u128 {
        self.0.elapsed().as_millis()
    }
}

/// Tags the request with a [`RequestId`] and [`RequestStart`], logs the
/// arrival, and logs the final status on the way out.
pub async fn log_requests(mut req: Request<Body>, next: Next) -> Response {
    let id = nanoid!(5);
    let start = RequestStart(Instant::now());
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    req.extensions_mut().insert(RequestId(id.clone()));
    req.extensions_mut().insert(start);

    info!("{} → {} {}", colored_id(&id), method, path);
    let response = next.run(req).await;
    info!(
        "{} ← {} {} ({}ms)",
        colored_id(&id),
        method,
        response.status(),
        start.elapsed_ms()
    );
    response
}
