//! Request identification.
//!
//! # Responsibilities
//! - Name the request ID header shared by middleware, logs and upstreams
//! - Read the ID assigned by the request-id middleware
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - A client-supplied `x-request-id` is kept, otherwise a UUID v4 is generated
//! - The ID is forwarded upstream and echoed on the response

use axum::http::HeaderMap;

pub const X_REQUEST_ID: &str = "x-request-id";

/// The request ID carried in `headers`, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
