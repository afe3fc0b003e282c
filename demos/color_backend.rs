//! Demo upstream for the gateway.
//!
//! Answers `GET /color` with `{"color": $COLOR}` and `GET /health`; other
//! methods on those paths get 405, anything else 404.
//!
//! ```text
//! COLOR=blue PORT=3000 cargo run --example color_backend
//! COLOR_BACKEND=http://127.0.0.1:3000 cargo run
//! curl localhost:3001/gateway/color/color
//! ```

use axum::{
    http::{Method, StatusCode, Uri},
    response::Response,
    routing::get,
    Router,
};
use gateway_proxy::http::response::json;
use gateway_proxy::GatewayError;
use std::net::SocketAddr;

async fn color() -> Response {
    json(
        StatusCode::OK,
        &serde_json::json!({ "color": std::env::var("COLOR").ok() }),
    )
}

async fn health() -> Response {
    json(StatusCode::OK, &serde_json::json!({ "status": "up" }))
}

async fn method_not_allowed(method: Method, uri: Uri) -> GatewayError {
    GatewayError::MethodNotAllowed {
        method,
        path: uri.to_string(),
    }
}

async fn not_found(method: Method, uri: Uri) -> GatewayError {
    GatewayError::NotFound {
        method,
        path: uri.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let app = Router::new()
        .route("/color", get(color).fallback(method_not_allowed))
        .route("/health", get(health).fallback(method_not_allowed))
        .fallback(not_found);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(port, "The color backend is listening on port {}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
