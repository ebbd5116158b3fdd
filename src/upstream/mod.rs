//! Upstream calls: image pass-through and metadata lookup.
//!
//! # Data Flow
//! ```text
//! ImageRewrite  → GET|HEAD http://<address><backend path>?<directives>
//!               → response streamed back (tier applied on success)
//!
//! InfoRequest   → GET http://<metadata address><backend path>?<metadata query>
//!               → 2xx: JSON {width, height} → ImageInfo
//!               → otherwise: response passed through
//! ```
//!
//! # Design Decisions
//! - No retries; a transport failure is a 502
//! - The identifier inside the backend path is forwarded byte-for-byte

pub mod client;

pub use client::{MetadataLookup, UpstreamClient, UpstreamError};
