//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Classify each request as built-in, proxy, or static
//! - Compute the rewritten upstream path for proxy routes
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (acceptable for typical route counts)
//! - Classification is a pure function of (path, query, table)

use axum::http::uri::{Authority, Scheme};
use axum::http::Uri;
use std::fmt;
use url::Url;

use crate::config::{ConfigError, RouteConfig, ValidationError};
use crate::routing::matcher::PathPrefixMatcher;

/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/health";
/// Version endpoint.
pub const VERSION_PATH: &str = "/gateway/version";

/// Endpoints answered by the gateway itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinEndpoint {
    Health,
    Version,
}

impl BuiltinEndpoint {
    fn lookup(path: &str) -> Option<Self> {
        match path {
            HEALTH_PATH => Some(Self::Health),
            VERSION_PATH => Some(Self::Version),
            _ => None,
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Version => "version",
        }
    }
}

/// A parsed upstream base URL.
#[derive(Debug, Clone)]
pub struct Upstream {
    endpoint: String,
    scheme: Scheme,
    authority: Authority,
    /// Path component of the base URL without trailing slash; usually empty.
    base_path: String,
}

impl Upstream {
    /// Parse an `http://host[:port][/base]` endpoint.
    pub fn parse(endpoint: &str) -> Result<Self, String> {
        let url = Url::parse(endpoint).map_err(|e| e.to_string())?;
        if url.scheme() != "http" {
            return Err(format!("unsupported scheme '{}'", url.scheme()));
        }
        let host = url.host_str().ok_or_else(|| "missing host".to_string())?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| "missing port".to_string())?;
        let authority: Authority = format!("{host}:{port}")
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| e.to_string())?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            scheme: Scheme::HTTP,
            authority,
            base_path: url.path().trim_end_matches('/').to_string(),
        })
    }

    /// Build the absolute upstream URI for a rewritten path (and query).
    pub fn uri_for(&self, path_and_query: &str) -> Result<Uri, axum::http::Error> {
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(format!("{}{}", self.base_path, path_and_query))
            .build()
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)
    }
}

/// A compiled proxy route.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub matcher: PathPrefixMatcher,
    pub upstream: Upstream,
}

/// What the gateway should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome<'a> {
    /// Answer locally with a fixed JSON body.
    Builtin(BuiltinEndpoint),
    /// Forward to `route.upstream` with the rewritten path and query.
    Proxy {
        route: &'a Route,
        path_and_query: String,
    },
    /// Try the static file root; 404 if nothing is there.
    Static,
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Route {}

/// Ordered, immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile routes from configuration, preserving declaration order.
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, ConfigError> {
        let mut routes = Vec::with_capacity(configs.len());
        let mut errors = Vec::new();

        for (i, config) in configs.iter().enumerate() {
            match Upstream::parse(&config.upstream) {
                Ok(upstream) => routes.push(Route {
                    name: config.name.clone(),
                    matcher: PathPrefixMatcher::new(config.gateway_path.clone()),
                    upstream,
                }),
                Err(message) => errors.push(ValidationError::new(
                    format!("routes[{i}].upstream"),
                    message,
                )),
            }
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        tracing::debug!(routes = routes.len(), "Route table compiled");
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Classify a request path.
    ///
    /// Built-ins win over proxy routes; proxy routes are tried in
    /// declaration order; everything else falls through to static.
    pub fn classify(&self, path: &str, query: Option<&str>) -> RouteOutcome<'_> {
        if let Some(endpoint) = BuiltinEndpoint::lookup(path) {
            return RouteOutcome::Builtin(endpoint);
        }

        for route in &self.routes {
            if let Some(rewritten) = route.matcher.strip(path) {
                let path_and_query = match query {
                    Some(q) => format!("{rewritten}?{q}"),
                    None => rewritten.to_string(),
                };
                return RouteOutcome::Proxy {
                    route,
                    path_and_query,
                };
            }
        }

        RouteOutcome::Static
    }

    /// Classify using a request URI.
    pub fn classify_uri(&self, uri: &Uri) -> RouteOutcome<'_> {
        self.classify(uri.path(), uri.query())
    }
}
