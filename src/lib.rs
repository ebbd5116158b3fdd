//! IIIF Level 0 edge: request validation, rewrite and capability documents.

pub mod config;
pub mod http;
pub mod iiif;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::EdgeConfig;
pub use http::HttpServer;
pub use iiif::{Decision, EdgeRequest, Engine};
pub use lifecycle::Shutdown;
