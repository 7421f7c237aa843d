//! Command-line interface configuration.

use argh::FromArgs;
use std::{net::SocketAddr, path::PathBuf};

use crate::routes::RouteSet;

/// Serves the sun web console and proxies its API calls
#[derive(Debug, FromArgs)]
pub struct Cli {
    /// path to the built console bundle (e.g. 'fe/dist/')
    #[argh(option, long = "static-dir")]
    pub static_dir: PathBuf,

    /// backend address (e.g. '127.0.0.1:8081')
    #[argh(option)]
    pub api: String,

    /// API path prefix (default: '/api')
    #[argh(option, long = "api-path", default = "String::from(\"/api\")")]
    pub api_path: String,

    /// server bind address (default: '127.0.0.1:8000')
    #[argh(option, default = "SocketAddr::from(([127, 0, 0, 1], 8000))")]
    pub bind: SocketAddr,

    /// tunnel domain shown in the console
    #[argh(option, default = "String::new()")]
    pub domain: String,

    /// public IP agents connect to
    #[argh(option, default = "String::new()")]
    pub ip: String,

    /// route layout: full, stats or tunnels (default: full)
    #[argh(option, default = "RouteSet::Full")]
    pub routes: RouteSet,
}
