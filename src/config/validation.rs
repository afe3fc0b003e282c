//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Validate route shape (gateway path form, upstream URL)
//! - Detect conflicting routes (duplicate names, overlapping prefixes)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use url::Url;

use crate::config::schema::{GatewayConfig, RouteConfig};
use crate::routing::{HEALTH_PATH, VERSION_PATH};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `routes[0].gateway_path`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::new("timeouts.connect_ms", "must be greater than 0"));
    }
    if config.timeouts.upstream_ms == 0 {
        errors.push(ValidationError::new("timeouts.upstream_ms", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }

    let mut names = HashSet::new();
    for (i, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::new(format!("routes[{i}].name"), "must not be empty"));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::new(
                format!("routes[{i}].name"),
                format!("duplicate route name '{}'", route.name),
            ));
        }

        if let Err(message) = check_gateway_path(&route.gateway_path) {
            errors.push(ValidationError::new(format!("routes[{i}].gateway_path"), message));
        }
        if let Err(message) = check_upstream(&route.upstream) {
            errors.push(ValidationError::new(format!("routes[{i}].upstream"), message));
        }
    }

    for (i, a) in config.routes.iter().enumerate() {
        for (j, b) in config.routes.iter().enumerate().skip(i + 1) {
            if overlaps(a, b) {
                errors.push(ValidationError::new(
                    format!("routes[{j}].gateway_path"),
                    format!(
                        "'{}' overlaps '{}' (routes[{i}])",
                        b.gateway_path, a.gateway_path
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_gateway_path(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err(format!("'{path}' must start with '/'"));
    }
    if path.ends_with('/') {
        return Err(format!("'{path}' must not end with '/'"));
    }
    if path.contains(['?', '#']) {
        return Err(format!("'{path}' must not contain a query or fragment"));
    }
    if path == HEALTH_PATH || path == VERSION_PATH {
        return Err(format!("'{path}' is served by the gateway itself"));
    }
    Ok(())
}

fn check_upstream(upstream: &str) -> Result<(), String> {
    let url = Url::parse(upstream).map_err(|e| format!("'{upstream}' is not a valid URL: {e}"))?;
    if url.scheme() != "http" {
        return Err(format!("'{upstream}' must use the http scheme"));
    }
    if url.host_str().is_none() {
        return Err(format!("'{upstream}' has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(format!("'{upstream}' must not carry a query or fragment"));
    }
    Ok(())
}

/// Two gateway paths overlap when one would capture requests meant for the other.
fn overlaps(a: &RouteConfig, b: &RouteConfig) -> bool {
    let covers = |outer: &str, inner: &str| {
        inner == outer
            || inner
                .strip_prefix(outer)
                .is_some_and(|rest| rest.starts_with('/'))
    };
    covers(&a.gateway_path, &b.gateway_path) || covers(&b.gateway_path, &a.gateway_path)
}
