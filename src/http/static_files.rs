//! Static asset fallback.
//!
//! # Responsibilities
//! - Refuse paths that could leave the configured root
//! - Serve files via `ServeDir` (content type, index.html, HEAD, ranges)
//! - Turn "nothing here" into the gateway's JSON not-found
//!
//! # Design Decisions
//! - The path is percent-decoded before the traversal check
//! - Traversal attempts answer like any other miss (404)
//! - Non-GET/HEAD methods on a static path are a miss, not a 405
//! - Symlinks under the root are followed; the root guarantee covers request paths only

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::config::StaticFilesConfig;
use crate::http::error::GatewayError;

/// Build the file service for the configured root.
pub fn service(config: &StaticFilesConfig) -> ServeDir {
    ServeDir::new(&config.root).append_index_html_on_directories(config.serve_index)
}

/// True when `path` stays inside the root once percent-decoded.
pub fn is_safe_path(path: &str) -> bool {
    let Ok(decoded) = urlencoding::decode(path) else {
        return false;
    };
    !decoded.contains(['\0', '\\']) && decoded.split('/').all(|segment| segment != "..")
}

/// Serve `request` from the static root, or fail with not-found.
pub async fn serve(dir: &ServeDir, request: Request<Body>) -> Result<Response, GatewayError> {
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if !is_safe_path(request.uri().path()) {
        return Err(GatewayError::StaticFileTraversal { method, path });
    }

    let response = match dir.clone().oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    match response.status() {
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => {
            Err(GatewayError::NotFound { method, path })
        }
        _ => Ok(response.map(Body::new)),
    }
}
