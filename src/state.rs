//! Shared server state.

use std::{path::PathBuf, sync::Arc};

use crate::{config::RuntimeConfig, routes::RouteTable};

/// State handed to every handler of the shell server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Backend origin, e.g. "http://127.0.0.1:8081"
    pub api_base_url: String,
    /// API prefix, e.g. "/api"
    pub api_path: String,
    /// Built console bundle (index.html and assets)
    pub static_dir: PathBuf,
    /// Console routes; deep links into these are answered with index.html
    pub routes: Arc<RouteTable>,
    pub config: RuntimeConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        api_base_url: &str,
        api_path: &str,
        static_dir: PathBuf,
        routes: Arc<RouteTable>,
        config: RuntimeConfig,
    ) -> Self {
        let api_base_url = if api_base_url.starts_with("http") {
            api_base_url.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", api_base_url.trim_end_matches('/'))
        };
        Self {
            api_base_url,
            api_path: api_path.trim_end_matches('/').to_string(),
            static_dir,
            routes,
            config,
            http: reqwest::Client::new(),
        }
    }
}
