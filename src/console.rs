//! The console's composition root.
//!
//! Everything a view needs (session, runtime config, routes, history and the
//! API client) is owned by one [`Console`] value and passed down explicitly.

use std::sync::Arc;
use tracing::info;

use crate::{
    client::ApiClient,
    config::RuntimeConfig,
    error::ApiError,
    guard::ResponseGuard,
    navigation::{Breadcrumbs, History},
    notify::Notifier,
    routes::RouteTable,
    session::SessionStore,
};

pub struct Console<N> {
    config: Option<RuntimeConfig>,
    pub routes: Arc<RouteTable>,
    pub history: Arc<History>,
    pub breadcrumbs: Breadcrumbs,
    pub api: ApiClient<N, Arc<History>>,
}

impl<N: Notifier> Console<N> {
    pub fn new(api_base_url: &str, api_path: &str, routes: RouteTable, notifier: N) -> Self {
        let routes = Arc::new(routes);
        let history = Arc::new(History::new(routes.clone()));
        let guard = ResponseGuard::new(SessionStore::new(), notifier, history.clone());
        Self {
            config: None,
            routes,
            history,
            breadcrumbs: Breadcrumbs::default(),
            api: ApiClient::new(api_base_url, api_path, Arc::new(guard)),
        }
    }

    /// Loads the runtime configuration from the backend. Only the first
    /// successful call takes effect; later calls fail.
    pub async fn bootstrap(&mut self) -> Result<&RuntimeConfig, ApiError> {
        if self.config.is_some() {
            return Err(ApiError::AlreadyConfigured);
        }
        let config = self.api.fetch_runtime_config().await?;
        info!("console configured for {} ({})", config.domain, config.address);
        Ok(self.config.insert(config))
    }

    /// Runtime configuration, once [`Console::bootstrap`] has succeeded.
    pub fn config(&self) -> Option<&RuntimeConfig> {
        self.config.as_ref()
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }
}
