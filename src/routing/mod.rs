//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed path (prefix, identifier)
//!     → router.rs (prefix lookup, default fallback)
//!     → Return: backend path + cache tier
//!
//! Table Compilation (at startup and on reload):
//!     PrefixConfig[]
//!     → Normalize prefixes
//!     → Freeze as immutable PrefixTable
//! ```
//!
//! # Design Decisions
//! - Tables compiled from config, immutable at runtime
//! - Exact prefix match only, no regex
//! - Deterministic: same prefix always resolves to the same entry

pub mod router;

pub use router::{normalize_prefix, PrefixTable, Route, RouteDecision};
