//! Console route table.
//!
//! Path templates use `:name` parameters. A single path segment may bind
//! several parameters joined by `|`, so `/agent/:ahash|:etag` matches
//! `/agent/3fa9|home-pi` with `ahash = "3fa9"` and `etag = "home-pi"`.
//!
//! Resolution always tries the most specific template first (more segments,
//! then more literal segments), so `/agent/a|b/tunnel/c|d` lands on
//! [`RouteName::Tunnel`] even though [`RouteName::Agent`] is a prefix of it.

use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::error::{ConfigError, RouteError};

/// Path parameters bound by a match, or supplied to [`RouteTable::path_for`].
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteName {
    Login,
    Index,
    Agent,
    Tunnel,
    Profile,
    Admin,
    Stats,
}

impl RouteName {
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteName::Login => "Login",
            RouteName::Index => "Index",
            RouteName::Agent => "Agent",
            RouteName::Tunnel => "Tunnel",
            RouteName::Profile => "Profile",
            RouteName::Admin => "Admin",
            RouteName::Stats => "Stats",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// One or more parameters sharing a segment, separated by `|`.
    Params(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = || RouteError::InvalidTemplate(raw.to_string());
        if !raw.starts_with('/') {
            return Err(invalid());
        }

        let mut segments = Vec::new();
        for part in split_path(raw) {
            if part.starts_with(':') {
                let mut names = Vec::new();
                for name in part.split('|') {
                    let name = name.strip_prefix(':').ok_or_else(invalid)?;
                    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                        return Err(invalid());
                    }
                    names.push(name.to_string());
                }
                segments.push(Segment::Params(names));
            } else if part.contains(':') {
                return Err(invalid());
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Sort key: longer and more literal templates come first.
    fn specificity(&self) -> (usize, usize) {
        (self.segments.len(), self.literal_count())
    }

    /// True when some concrete path matches both templates.
    fn overlaps(&self, other: &PathTemplate) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Params(_), Segment::Params(_)) => true,
                    (Segment::Literal(lit), Segment::Params(names))
                    | (Segment::Params(names), Segment::Literal(lit)) => {
                        let values: Vec<&str> = lit.splitn(names.len(), '|').collect();
                        values.len() == names.len() && values.iter().all(|v| !v.is_empty())
                    }
                })
    }

    fn matches(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Params(names) => {
                    // Browsers may send the separator escaped.
                    let part = if part.contains('|') {
                        part.to_string()
                    } else {
                        part.replace("%7C", "|").replace("%7c", "|")
                    };
                    let values: Vec<&str> = part.splitn(names.len(), '|').collect();
                    if values.len() != names.len() || values.iter().any(|v| v.is_empty()) {
                        return None;
                    }
                    for (name, value) in names.iter().zip(values) {
                        let decoded = urlencoding::decode(value)
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| value.to_string());
                        params.insert(name.clone(), decoded);
                    }
                }
            }
        }
        Some(params)
    }

    fn render(&self, route: RouteName, params: &Params) -> Result<String, RouteError> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Params(names) => {
                    let mut values = Vec::with_capacity(names.len());
                    for name in names {
                        let value = params.get(name).filter(|v| !v.is_empty()).ok_or_else(|| {
                            RouteError::MissingParam {
                                route,
                                param: name.clone(),
                            }
                        })?;
                        values.push(urlencoding::encode(value).into_owned());
                    }
                    path.push_str(&values.join("|"));
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty())
}

/// A named route and the view it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    pub template: PathTemplate,
    pub view: String,
}

impl Route {
    pub fn new(name: RouteName, template: &str, view: &str) -> Result<Self, RouteError> {
        Ok(Self {
            name,
            template: PathTemplate::parse(template)?,
            view: view.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: RouteName,
    pub view: String,
    pub params: Params,
}

/// Which of the two shipped route layouts to expose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteSet {
    /// Every route, tunnels and stats included.
    #[default]
    Full,
    /// Stats dashboard, no per-tunnel view.
    Stats,
    /// Per-tunnel view, no stats dashboard.
    Tunnels,
}

impl FromStr for RouteSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(RouteSet::Full),
            "stats" => Ok(RouteSet::Stats),
            "tunnels" => Ok(RouteSet::Tunnels),
            _ => Err(ConfigError::UnknownRouteSet(s.to_string())),
        }
    }
}

/// Immutable, validated set of routes ordered for longest-match resolution.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        for (i, route) in routes.iter().enumerate() {
            for earlier in &routes[..i] {
                if earlier.name == route.name {
                    return Err(RouteError::DuplicateName(route.name));
                }
                // Overlaps at different specificity are settled by the sort below.
                if earlier.template.specificity() == route.template.specificity()
                    && earlier.template.overlaps(&route.template)
                {
                    return Err(RouteError::AmbiguousPattern {
                        first: earlier.name,
                        second: route.name,
                        pattern: route.template.as_str().to_string(),
                    });
                }
            }
        }

        let mut routes = routes;
        routes.sort_by(|a, b| b.template.specificity().cmp(&a.template.specificity()));
        Ok(Self { routes })
    }

    /// The console's own routes.
    pub fn standard(set: RouteSet) -> Result<Self, RouteError> {
        let mut routes = vec![
            Route::new(RouteName::Login, "/login", "Login")?,
            Route::new(RouteName::Index, "/", "Index")?,
            Route::new(RouteName::Agent, "/agent/:ahash|:etag", "Agent")?,
        ];
        if set != RouteSet::Stats {
            routes.push(Route::new(
                RouteName::Tunnel,
                "/agent/:ahash|:etag/tunnel/:thash|:ttag",
                "Tunnel",
            )?);
        }
        routes.push(Route::new(RouteName::Profile, "/profile", "Profile")?);
        routes.push(Route::new(RouteName::Admin, "/admin", "admin/Admin")?);
        if set != RouteSet::Tunnels {
            routes.push(Route::new(RouteName::Stats, "/stats", "admin/Stats")?);
        }
        Self::new(routes)
    }

    /// Finds the most specific route matching `path`. Query and fragment
    /// parts are ignored.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        self.routes.iter().find_map(|route| {
            route.template.matches(path).map(|params| RouteMatch {
                name: route.name,
                view: route.view.clone(),
                params,
            })
        })
    }

    pub fn get(&self, name: RouteName) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    pub fn contains(&self, name: RouteName) -> bool {
        self.get(name).is_some()
    }

    /// Builds the concrete path for `name`.
    pub fn path_for(&self, name: RouteName, params: &Params) -> Result<String, RouteError> {
        self.get(name)
            .ok_or(RouteError::UnknownRoute(name))?
            .template
            .render(name, params)
    }

    /// Routes in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
