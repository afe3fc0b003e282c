//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (request_id, route, status) for machine parsing
//! - Request ID flows from middleware to logs and upstreams
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
