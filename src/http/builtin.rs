//! Endpoints answered by the gateway itself.

use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;

use crate::http::response::json;
use crate::routing::BuiltinEndpoint;

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct VersionBody<'a> {
    version: &'a str,
}

/// Fixed 200 JSON response for a built-in endpoint, whatever the method.
pub fn respond(endpoint: BuiltinEndpoint, version: &str) -> Response {
    match endpoint {
        BuiltinEndpoint::Health => json(StatusCode::OK, &HealthBody { status: "up" }),
        BuiltinEndpoint::Version => json(StatusCode::OK, &VersionBody { version }),
    }
}
