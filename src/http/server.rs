//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener, drain on shutdown
//! - Dispatch requests: built-in, proxy, static, not found
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, GatewayConfig};
use crate::http::error::GatewayError;
use crate::http::proxy::{self, UpstreamClient};
use crate::http::request::request_id;
use crate::http::{builtin, static_files};
use crate::observability::metrics;
use crate::routing::{RouteOutcome, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub client: UpstreamClient,
    pub static_files: ServeDir,
    pub version: Arc<str>,
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,
}

/// Marks responses produced by [`gateway_handler`] or relayed from an upstream.
#[derive(Clone, Copy, Debug)]
struct Handled;

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Validate the configuration and assemble the gateway.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let table = Arc::new(RouteTable::from_config(&config.routes)?);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_millis(config.timeouts.connect_ms)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            table,
            client,
            static_files: static_files::service(&config.static_files),
            version: Arc::from(config.version.as_str()),
            upstream_timeout: Duration::from_millis(config.timeouts.upstream_ms),
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let max_body_bytes = config.limits.max_body_bytes;
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::map_response(move |response: Response| async move {
                json_middleware_rejection(response, max_body_bytes)
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            static_root = %self.config.static_files.root.display(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received: closing HTTP server");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Main gateway handler.
/// Classifies the request and dispatches it exactly once.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let (target, result) = match state.table.classify_uri(request.uri()) {
        RouteOutcome::Builtin(endpoint) => (
            endpoint.label().to_string(),
            Ok(builtin::respond(endpoint, &state.version)),
        ),
        RouteOutcome::Proxy {
            route,
            path_and_query,
        } => (
            route.name.clone(),
            proxy::forward(
                &state.client,
                state.upstream_timeout,
                state.max_body_bytes,
                route,
                &path_and_query,
                request,
            )
            .await,
        ),
        RouteOutcome::Static => (
            "static".to_string(),
            static_files::serve(&state.static_files, request).await,
        ),
    };

    let (target, mut response) = match result {
        Ok(response) => (target, response),
        Err(err) => {
            log_error(&request_id, &target, &err);
            if err.is_upstream() {
                metrics::record_upstream_error(&target, err.code());
            }
            let target = match err {
                GatewayError::NotFound { .. } | GatewayError::StaticFileTraversal { .. } => {
                    "none".to_string()
                }
                _ => target,
            };
            (target, err.into_response())
        }
    };

    let status = response.status();
    metrics::record_request(method.as_str(), status.as_u16(), &target, start_time);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        target = %target,
        status = status.as_u16(),
        "Request handled"
    );

    response.extensions_mut().insert(Handled);
    response
}

/// Render the body-limit and request-timeout rejections of the middleware
/// stack in the gateway's JSON error shape.
fn json_middleware_rejection(response: Response, max_body_bytes: usize) -> Response {
    if response.extensions().get::<Handled>().is_some() {
        return response;
    }
    let err = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => GatewayError::PayloadTooLarge {
            limit: max_body_bytes,
        },
        StatusCode::REQUEST_TIMEOUT => GatewayError::RequestTimeout,
        _ => return response,
    };
    tracing::warn!(error = %err, "Request rejected by middleware");
    err.into_response()
}

fn log_error(request_id: &str, target: &str, err: &GatewayError) {
    match err {
        GatewayError::UpstreamUnavailable { .. } | GatewayError::UpstreamTimeout { .. } => {
            tracing::error!(request_id = %request_id, route = %target, error = %err, "Upstream error");
        }
        GatewayError::PayloadTooLarge { .. } | GatewayError::RequestTimeout => {
            tracing::warn!(request_id = %request_id, route = %target, error = %err, "Request rejected");
        }
        GatewayError::StaticFileTraversal { .. } => {
            tracing::warn!(request_id = %request_id, error = %err, "Rejected static path");
        }
        GatewayError::InvalidUpstreamRequest(_) => {
            tracing::error!(request_id = %request_id, route = %target, error = %err, "Failed to build upstream request");
        }
        GatewayError::NotFound { .. } | GatewayError::MethodNotAllowed { .. } => {
            tracing::debug!(request_id = %request_id, error = %err, "No route matched");
        }
    }
}
