//! HTTP request handlers.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Extension, Path, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header},
    response::Response,
};
use owo_colors::OwoColorize;
use std::{
    path::{Component, PathBuf},
    sync::Arc,
    time::Instant,
};
use tokio::fs;
use tracing::{debug, error, info};

use crate::{
    colors::colored_id,
    config::RuntimeConfig,
    middleware::{RequestId, RequestStart},
    state::AppState,
};

/// Maps a request path onto the bundle directory. Paths that try to climb
/// out of it are refused.
fn bundle_path(static_dir: &std::path::Path, request_path: &str) -> Option<PathBuf> {
    let relative = PathBuf::from(request_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    let mut path = static_dir.join(relative);
    if path.is_dir() {
        path.push("index.html");
    }
    Some(path)
}

fn file_response(content: Vec<u8>, file_path: &std::path::Path) -> Response {
    let mime_type = mime_guess::from_path(file_path).first_or_octet_stream();
    let mut response = Response::new(Body::from(content));
    if let Ok(value) = HeaderValue::from_str(mime_type.as_ref()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

/// Serves the console bundle.
///
/// Existing files are returned with their MIME type. A path that is not a
/// file but matches a console route (e.g. `/agent/3fa9|pi`) gets
/// `index.html`, so deep links and page reloads land in the app.
pub async fn serve_shell(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(id)): Extension<RequestId>,
    uri: Uri,
) -> Result<Response, StatusCode> {
    let Some(file_path) = bundle_path(&state.static_dir, uri.path()) else {
        debug!("{} rejected path {}", colored_id(&id), uri.path());
        return Err(StatusCode::NOT_FOUND);
    };

    if let Ok(content) = fs::read(&file_path).await {
        debug!("{} {} {}", colored_id(&id), "STATIC".green(), file_path.display());
        return Ok(file_response(content, &file_path));
    }

    let Some(matched) = state.routes.resolve(uri.path()) else {
        return Err(StatusCode::NOT_FOUND);
    };

    let index = state.static_dir.join("index.html");
    match fs::read(&index).await {
        Ok(content) => {
            info!(
                "{} {} {} → {}",
                colored_id(&id),
                "ROUTE".cyan(),
                matched.name,
                matched.view
            );
            Ok(file_response(content, &index))
        }
        Err(e) => {
            error!("index.html missing from {:?}: {}", state.static_dir, e);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Answers with the runtime configuration the console reads at startup.
pub async fn runtime_config(State(state): State<Arc<AppState>>) -> Json<RuntimeConfig> {
    Json(state.config.clone())
}

fn is_hop_by_hop_request(name: &str) -> bool {
    matches!(name, "host" | "accept-encoding" | "connection" | "keep-alive")
}

fn is_hop_by_hop_response(name: &str) -> bool {
    matches!(
        name,
        "transfer-encoding" | "content-encoding" | "connection" | "keep-alive"
    )
}

/// Forwards an API call to the backend, streaming the answer back.
#[allow(clippy::too_many_arguments)]
pub async fn proxy_api(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Extension(RequestId(id)): Extension<RequestId>,
    Extension(start): Extension<RequestStart>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let api_url = format!(
        "{}{}/{}",
        state.api_base_url,
        state.api_path,
        path.trim_start_matches('/')
    );
    let full_url = match uri.query() {
        Some(query) => format!("{}?{}", api_url, query),
        None => api_url,
    };

    let mut forwarded = HeaderMap::new();
    for (key, value) in headers.iter() {
        if !is_hop_by_hop_request(key.as_str()) {
            forwarded.append(key.clone(), value.clone());
        }
    }

    info!("{} → {} {} {}", colored_id(&id), "API".yellow(), method, full_url);
    let upstream_start = Instant::now();

    let response = state
        .http
        .request(method, &full_url)
        .headers(forwarded)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            error!("{} backend unreachable: {}", colored_id(&id), e);
            StatusCode::BAD_GATEWAY
        })?;

    info!(
        "{} ← {} {} ({}ms upstream, {}ms total)",
        colored_id(&id),
        "API".yellow(),
        response.status(),
        upstream_start.elapsed().as_millis(),
        start.elapsed_ms()
    );

    let mut builder = Response::builder().status(response.status());
    for (key, value) in response.headers().iter() {
        if !is_hop_by_hop_response(key.as_str()) {
            builder = builder.header(key, value);
        }
    }

    builder
        .body(Body::from_stream(response.bytes_stream()))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
