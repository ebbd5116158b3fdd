//! Response construction.
//!
//! # Responsibilities
//! - Render engine rejections as plain-text responses
//! - Apply cache tiers to successful responses
//! - Strip cache headers from passed-through failures
//! - Render the info document with its negotiated media type
//!
//! # Design Decisions
//! - Error responses never carry `Cache-Control`, `Surrogate-Control` or `Age`
//! - Successful pass-through keeps the upstream `Age`
//! - Upstream bodies are streamed, never buffered

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, AGE, CACHE_CONTROL, CONTENT_TYPE, VARY,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::iiif::cache::{CacheTier, SURROGATE_CONTROL};
use crate::iiif::info::{InfoDocument, Negotiation};
use crate::iiif::IiifError;

const TEXT_PLAIN: &str = "text/plain; charset=us-ascii";

pub const UPSTREAM_FAILURE: &str = "Upstream request failed";

fn plain_text(status: StatusCode, body: String) -> Response {
    (status, [(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN))], body).into_response()
}

/// Status and body exactly as decided by the engine.
pub fn rejection(error: &IiifError) -> Response {
    plain_text(error.status(), error.to_string())
}

/// 502 for upstream transport failures.
pub fn upstream_failure() -> Response {
    plain_text(StatusCode::BAD_GATEWAY, UPSTREAM_FAILURE.to_string())
}

pub fn internal_error() -> Response {
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
}

/// Remove every header that would let a cache store the response.
pub fn strip_cache_headers(headers: &mut HeaderMap) {
    headers.remove(CACHE_CONTROL);
    headers.remove(SURROGATE_CONTROL);
    headers.remove(AGE);
}

/// Replace upstream cache directives with the tier's.
pub fn apply_cache_tier(headers: &mut HeaderMap, tier: CacheTier) {
    headers.remove(CACHE_CONTROL);
    headers.remove(SURROGATE_CONTROL);
    for (name, value) in tier.headers() {
        headers.insert(name, value);
    }
}

/// Prepare an upstream response for the client: successes get the tier,
/// failures pass through without cache headers.
pub fn pass_through(response: axum::http::Response<hyper::body::Incoming>, tier: CacheTier) -> Response {
    let (mut parts, body) = response.into_parts();
    if parts.status.is_success() {
        apply_cache_tier(&mut parts.headers, tier);
    } else {
        strip_cache_headers(&mut parts.headers);
    }
    Response::from_parts(parts, Body::new(body))
}

/// Serialize the info document with CORS and `Vary: Accept`.
pub fn info_document(document: &InfoDocument, negotiation: Negotiation) -> Response {
    let body = match serde_json::to_vec(document) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize info document");
            return internal_error();
        }
    };

    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(negotiation.content_type));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(VARY, HeaderValue::from_static("Accept"));
    apply_cache_tier(headers, negotiation.cache_tier);
    response
}
