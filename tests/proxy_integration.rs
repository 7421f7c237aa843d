//! Integration tests for the API proxy

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    routing::get,
};
use std::{path::PathBuf, sync::Arc};
use sun_fe::{
    app::app,
    config::RuntimeConfig,
    routes::{RouteSet, RouteTable},
    state::AppState,
};

async fn bundle_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sun-fe-proxy-{}", nanoid::nanoid!(8)));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("index.html"), "<div id=app></div>")
        .await
        .unwrap();
    dir
}

async fn spawn(router: Router) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn spawn_shell(backend: &str) -> std::net::SocketAddr {
    let state = Arc::new(AppState::new(
        backend,
        "/api",
        bundle_dir().await,
        Arc::new(RouteTable::standard(RouteSet::Full).unwrap()),
        RuntimeConfig::default(),
    ));
    let addr = spawn(app(state)).await;
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    addr
}

#[tokio::test]
async fn test_proxy_backend_unavailable() {
    let shell = spawn_shell("http://127.0.0.1:1").await;

    let response = reqwest::get(format!("http://{}/api/user", shell))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_proxy_forwards_method_body_and_query() {
    let backend = Router::new()
        .route(
            "/api/user/agents",
            get(|request: Request<Body>| async move {
                let query = request.uri().query().unwrap_or("").to_string();
                let mut response = Response::new(Body::from(format!("Query: {}", query)));
                response.headers_mut().insert(
                    "x-backend",
                    header::HeaderValue::from_static("sun"),
                );
                response
            })
            .post(|request: Request<Body>| async move {
                let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
                    .await
                    .unwrap();
                format!("Echo: {}", String::from_utf8(bytes.to_vec()).unwrap())
            }),
        );
    let backend_addr = spawn(backend).await;
    let shell = spawn_shell(&backend_addr.to_string()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/api/user/agents?page=2&tag=pi", shell))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-backend").unwrap(), "sun");
    let text = response.text().await.unwrap();
    assert!(text.contains("page=2"));
    assert!(text.contains("tag=pi"));

    let response = client
        .post(format!("http://{}/api/user/agents", shell))
        .form(&[("tag", "home pi")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Echo: tag=home+pi");
}

#[tokio::test]
async fn test_proxy_filters_hop_by_hop_headers() {
    let backend = Router::new().route(
        "/api/headers",
        get(|request: Request<Body>| async move {
            let mut response = Response::new(Body::from("Headers received"));
            for (name, value) in request.headers().iter() {
                response.headers_mut().insert(name.clone(), value.clone());
            }
            response
        }),
    );
    let backend_addr = spawn(backend).await;
    let shell = spawn_shell(&backend_addr.to_string()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/api/headers", shell))
        .header("accept-encoding", "gzip")
        .header("x-custom", "should-preserve")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("accept-encoding").is_none());
    assert_eq!(response.headers().get("x-custom").unwrap(), "should-preserve");
}

#[tokio::test]
async fn test_proxy_passes_error_statuses_through() {
    let backend = Router::new().route(
        "/api/user",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"message":"login required"}"#,
            )
        }),
    );
    let backend_addr = spawn(backend).await;
    let shell = spawn_shell(&backend_addr.to_string()).await;

    let response = reqwest::get(format!("http://{}/api/user", shell))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text().await.unwrap(), r#"{"message":"login required"}"#);
}
