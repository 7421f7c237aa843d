//! Error types shared across the shell.

use axum::http::StatusCode;
use thiserror::Error;

use crate::routes::RouteName;

/// Errors raised while building or querying the route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route {0} registered more than once")]
    DuplicateName(RouteName),
    #[error("routes {first} and {second} match the same paths ({pattern})")]
    AmbiguousPattern {
        first: RouteName,
        second: RouteName,
        pattern: String,
    },
    #[error("invalid path template {0:?}")]
    InvalidTemplate(String),
    #[error("route {0} is not in this table")]
    UnknownRoute(RouteName),
    #[error("route {route} needs parameter {param:?}")]
    MissingParam { route: RouteName, param: String },
}

/// Errors returned by [`crate::client::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status. The response guard has
    /// already reported it by the time this is returned.
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("runtime configuration already loaded")]
    AlreadyConfigured,
}

/// Errors raised while assembling the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown route set {0:?} (expected full, stats or tunnels)")]
    UnknownRouteSet(String),
    #[error("static directory {path:?}: {source}")]
    StaticDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Routes(#[from] RouteError),
}
