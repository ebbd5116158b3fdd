//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the default IIIF version is implemented
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting prefixes and malformed backend templates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::EdgeConfig;
use crate::iiif::version::IiifVersion;
use crate::routing::normalize_prefix;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("iiif.default_version: version {0:?} is not implemented")]
    UnknownDefaultVersion(String),

    #[error("iiif.version_override_header: {0:?} is not a valid header name")]
    InvalidHeaderName(String),

    #[error("iiif.processable_extensions: must not be empty")]
    NoExtensions,

    #[error("prefixes: {0:?} must be empty or start with '/'")]
    InvalidPrefix(String),

    #[error("prefixes: {0:?} is declared more than once")]
    DuplicatePrefix(String),

    #[error("prefixes: backend path {0:?} must contain {{identifier}}")]
    MissingIdentifier(String),

    #[error("timeouts.{0}: must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check every semantic rule and collect all failures.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }
    if config.upstream.address.trim().is_empty() {
        errors.push(ValidationError::InvalidAddress {
            field: "upstream.address",
            value: config.upstream.address.clone(),
        });
    }

    if config.iiif.default_version.parse::<IiifVersion>().is_err() {
        errors.push(ValidationError::UnknownDefaultVersion(
            config.iiif.default_version.clone(),
        ));
    }
    if let Some(name) = &config.iiif.version_override_header {
        if HeaderName::try_from(name.as_str()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        }
    }
    if config.iiif.processable_extensions.is_empty() {
        errors.push(ValidationError::NoExtensions);
    }

    let mut seen = HashSet::new();
    for entry in &config.prefixes {
        if !entry.prefix.is_empty() && !entry.prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix(entry.prefix.clone()));
        }
        if !seen.insert(normalize_prefix(&entry.prefix)) {
            errors.push(ValidationError::DuplicatePrefix(entry.prefix.clone()));
        }
        if !entry.backend_path.contains("{identifier}") {
            errors.push(ValidationError::MissingIdentifier(entry.backend_path.clone()));
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
