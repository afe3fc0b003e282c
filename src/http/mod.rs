//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID)
//!     → routing::RouteTable::classify
//!         ├─ builtin.rs (health, version)
//!         ├─ proxy.rs (rewrite + forward, headers.rs for the new hop)
//!         └─ static_files.rs (ServeDir under the static root)
//!     → response.rs / error.rs (JSON bodies, relayed upstream responses)
//!     → Send to client
//! ```

pub mod builtin;
pub mod error;
pub mod headers;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use error::GatewayError;
pub use request::X_REQUEST_ID;
pub use response::JSON_CONTENT_TYPE;
pub use server::HttpServer;
