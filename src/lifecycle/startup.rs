//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration (file, then environment)
//! - Initialize subsystems in dependency order
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: config and bind errors are fatal
//! - Metrics exporter failures are logged, the gateway still starts
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{load_config, ConfigError, GatewayConfig};
use crate::http::HttpServer;
use crate::observability::metrics;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Resolve the configuration: a TOML file when given, otherwise defaults.
/// The environment is overlaid either way.
pub fn resolve_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => GatewayConfig::from_env(),
    }
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn run(
    config: GatewayConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address();
    let port = config.listener.port;
    let static_root = config.static_files.root.clone();

    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(
        port,
        static_root = %static_root.display(),
        "The gateway is listening on port {} and hosting static files from {}",
        port,
        static_root.display()
    );

    server
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;

    #[test]
    fn defaults_without_environment_are_valid() {
        let config = GatewayConfig::default().apply_env(|_| None).unwrap();
        assert!(crate::config::validate_config(&config).is_ok());
        assert_eq!(config.listener.port, 3001);
        assert!(!config.routes.is_empty());
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = GatewayConfig::default();
        config.listener.host = "127.0.0.1".into();
        config.listener.port = occupied.local_addr().unwrap().port();

        let shutdown = Shutdown::new();
        let err = run(config, shutdown.subscribe()).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
    }
}
