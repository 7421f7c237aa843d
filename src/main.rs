//! Serves the sun web console.
//!
//! - Serves the built bundle, answering console deep links with index.html
//! - Proxies API calls to the backend
//! - Publishes the runtime configuration at /config.json
//! - Logs every request with a colored id and its latency

use std::sync::Arc;
use tracing::{Level, error, info};

use sun_fe::{
    app::app, cli::Cli, config::RuntimeConfig, error::ConfigError, routes::RouteTable,
    state::AppState,
};

async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let static_dir = args
        .static_dir
        .canonicalize()
        .map_err(|source| ConfigError::StaticDir {
            path: args.static_dir.clone(),
            source,
        })?;
    let routes = Arc::new(RouteTable::standard(args.routes).map_err(ConfigError::from)?);
    let config = RuntimeConfig::new(args.domain, args.ip);

    let state = Arc::new(AppState::new(
        &args.api,
        &args.api_path,
        static_dir.clone(),
        routes.clone(),
        config,
    ));

    info!("Serving console from: {:?}", static_dir);
    info!(
        "Proxying {}/* to: {}{}/",
        state.api_path, state.api_base_url, state.api_path
    );
    for route in routes.iter() {
        info!("Route {} {} → {}", route.name, route.template.as_str(), route.view);
    }
    if !state.config.is_set() {
        info!("No --domain/--ip given; /config.json will be empty");
    }

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Server running on: http://{}", args.bind);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args: Cli = argh::from_env();
    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
