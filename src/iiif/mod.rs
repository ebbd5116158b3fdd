//! IIIF Image API (Level 0) request validator and rewrite engine.
//!
//! # Responsibilities
//! - Gate methods and resolve the API version
//! - Parse image and `info.json` paths
//! - Validate the five image segments against the Level 0 profile
//! - Negotiate the info document's media type
//! - Compose a single decision: reject, rewrite an image, or describe one
//!
//! # Design Decisions
//! - No I/O anywhere in this module tree
//! - Rejection bodies are the `Display` text of [`IiifError`]
//! - Cache policy is assigned here and enforced elsewhere

pub mod cache;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod info;
pub mod method;
pub mod path;
pub mod version;

pub use cache::CacheTier;
pub use engine::{Decision, EdgeRequest, Engine, ImageRewrite, InfoRequest};
pub use error::{ErrorClass, IiifError};
pub use info::{ImageInfo, InfoDocument};
pub use version::IiifVersion;
