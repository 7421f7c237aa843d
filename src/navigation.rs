//! Imperative navigation and the breadcrumb trail.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::routes::{Params, RouteName, RouteTable};

/// Moves the console to a named route.
pub trait Navigator: Send + Sync {
    fn push(&self, route: RouteName);
}

impl<V: Navigator + ?Sized> Navigator for Arc<V> {
    fn push(&self, route: RouteName) {
        (**self).push(route)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: RouteName,
    pub path: String,
}

/// In-memory history stack backed by a route table.
#[derive(Debug)]
pub struct History {
    routes: Arc<RouteTable>,
    entries: Mutex<Vec<Location>>,
}

impl History {
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self {
            routes,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Navigates to a concrete path. Unknown paths are ignored.
    pub fn push_path(&self, path: &str) -> Option<Location> {
        let Some(matched) = self.routes.resolve(path) else {
            warn!("no route for {}", path);
            return None;
        };
        let location = Location {
            route: matched.name,
            path: path.to_string(),
        };
        self.record(location.clone());
        Some(location)
    }

    pub fn current(&self) -> Option<Location> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn entries(&self) -> Vec<Location> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, location: Location) {
        info!("navigate → {} ({})", location.route, location.path);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(location);
    }
}

impl Navigator for History {
    fn push(&self, route: RouteName) {
        match self.routes.path_for(route, &Params::new()) {
            Ok(path) => self.record(Location { route, path }),
            Err(e) => warn!("cannot navigate to {}: {}", route, e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub name: String,
    pub path: String,
}

/// Trail of pages shown above the current view.
#[derive(Debug, Clone, Default)]
pub struct Breadcrumbs {
    crumbs: Vec<Crumb>,
}

impl Breadcrumbs {
    pub fn push(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.crumbs.push(Crumb {
            name: name.into(),
            path: path.into(),
        });
    }

    /// Drops every crumb after the first one pointing at `path`.
    pub fn truncate_to(&mut self, path: &str) {
        if let Some(pos) = self.crumbs.iter().position(|c| c.path == path) {
            self.crumbs.truncate(pos + 1);
        }
    }

    pub fn clear(&mut self) {
        self.crumbs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Crumb> {
        self.crumbs.iter()
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }
}
