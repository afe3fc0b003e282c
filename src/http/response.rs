//! Response handling and transformation.
//!
//! # Responsibilities
//! - Build JSON responses for built-ins and errors
//! - Relay upstream responses with hop-by-hop headers removed
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - JSON bodies always carry an explicit utf-8 charset

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::http::headers::strip_hop_by_hop;

/// Content type used for every JSON body the gateway produces.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Serialize `body` into a response with the given status.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize JSON body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Convert an upstream response into one for the client.
///
/// Status, end-to-end headers and body pass through untouched.
pub fn relay<B>(response: axum::http::Response<B>) -> Response
where
    B: hyper::body::Body<Data = hyper::body::Bytes> + Send + 'static,
    B::Error: Into<axum::BoxError>,
{
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
