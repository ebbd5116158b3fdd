//! Method gate.
//!
//! Only `GET` and `HEAD` reach the rest of the engine. Every other token,
//! including extension methods HTTP never defined, is rejected the same way.

use axum::http::Method;

use crate::iiif::error::IiifError;

/// Returns true when the method may fetch a IIIF resource.
pub fn is_supported(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Reject any method other than `GET`/`HEAD`.
pub fn check(method: &Method) -> Result<(), IiifError> {
    if is_supported(method) {
        Ok(())
    } else {
        Err(IiifError::MethodNotAllowed {
            method: method.as_str().to_string(),
        })
    }
}
