//! Gateway error taxonomy and its JSON rendering.
//!
//! Every error is turned into a response at the handler boundary; none of
//! them terminate the listener or affect other requests.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::http::response::json;

/// Errors raised while handling a single request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No built-in, proxy route, or static file matched.
    #[error("no route found for [{method}:{path}]")]
    NotFound { method: Method, path: String },

    /// Method not supported on an exact-match endpoint.
    #[error("no mapping for [{method}:{path}]")]
    MethodNotAllowed { method: Method, path: String },

    /// Connecting to or talking with the upstream failed.
    #[error("upstream [{route}] unavailable: {reason}")]
    UpstreamUnavailable { route: String, reason: String },

    /// The upstream did not produce a response head in time.
    #[error("upstream [{route}] did not respond within {}ms", .timeout.as_millis())]
    UpstreamTimeout { route: String, timeout: Duration },

    /// Static path would resolve outside the configured root.
    #[error("static path escapes root: [{method}:{path}]")]
    StaticFileTraversal { method: Method, path: String },

    /// The request body went over `limits.max_body_bytes`.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The whole request did not complete within `timeouts.request_secs`.
    #[error("request did not complete in time")]
    RequestTimeout,

    /// The rewritten upstream request could not be built.
    #[error("could not build upstream request: {0}")]
    InvalidUpstreamRequest(String),
}

/// Wire format: `{"error": "...", "description": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub description: String,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::StaticFileTraversal { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::InvalidUpstreamRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code placed in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::StaticFileTraversal { .. } => "not_found",
            Self::MethodNotAllowed { .. } => "method_not_allowed",
            Self::UpstreamUnavailable { .. } => "bad_gateway",
            Self::UpstreamTimeout { .. } => "gateway_timeout",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::RequestTimeout => "request_timeout",
            Self::InvalidUpstreamRequest(_) => "internal_error",
        }
    }

    /// Client-facing description. Upstream details stay in the logs.
    pub fn description(&self) -> String {
        match self {
            Self::NotFound { method, path } | Self::StaticFileTraversal { method, path } => {
                format!("no route found for [{method}:{path}]")
            }
            Self::MethodNotAllowed { .. } => self.to_string(),
            Self::UpstreamUnavailable { route, .. } => format!("upstream [{route}] unavailable"),
            Self::UpstreamTimeout { route, .. } => format!("upstream [{route}] timed out"),
            Self::PayloadTooLarge { .. } | Self::RequestTimeout => self.to_string(),
            Self::InvalidUpstreamRequest(_) => "internal gateway error".to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code(),
            description: self.description(),
        }
    }

    /// True for failures of the upstream rather than the request itself.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. } | Self::UpstreamTimeout { .. }
        )
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        json(self.status(), &self.body())
    }
}
