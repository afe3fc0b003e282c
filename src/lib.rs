//! Path-prefix reverse proxy gateway library.
//!
//! Serves built-in health/version endpoints, forwards configured path
//! prefixes to upstream services with the prefix stripped, and falls back
//! to static files from a root directory.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::{GatewayError, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{RouteOutcome, RouteTable};
