//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (built-in lookup, then route scan)
//!     → matcher.rs (segment-aware prefix match + strip)
//!     → Return: Builtin | Proxy { route, rewritten path } | Static
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Parse upstream base URLs
//!     → Compile prefix matchers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order); overlaps are rejected by validation

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::{BuiltinEndpoint, Route, RouteOutcome, RouteTable, Upstream, HEALTH_PATH, VERSION_PATH};
