//! Engine rejections.
//!
//! The `Display` text of every variant is exactly the plain-text response
//! body sent to the client.

use axum::http::StatusCode;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::iiif::grammar::{FailureKind, Segment, SegmentFailure};

/// Error taxonomy used for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed path or segment.
    ClientSyntax,
    /// Well-formed request for an unimplemented feature.
    ClientUnsupported,
    /// Method other than GET/HEAD.
    ClientMethod,
    /// Unknown version override. Reported as a server fault.
    Configuration,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::ClientSyntax => "client_syntax",
            ErrorClass::ClientUnsupported => "client_unsupported",
            ErrorClass::ClientMethod => "client_method",
            ErrorClass::Configuration => "configuration",
        }
    }
}

/// A terminal rejection decided by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IiifError {
    #[error("Not a IIIF method")]
    MethodNotAllowed { method: String },

    #[error("Unknown IIIF version")]
    UnknownVersion { requested: String },

    #[error("Not a IIIF path")]
    NotIiifPath,

    #[error("Not Found")]
    NotProcessable { identifier: String },

    #[error("Unsupported {segment} parameter")]
    Unsupported { segment: Segment, reason: String },

    #[error("Invalid {segment} parameter")]
    Invalid { segment: Segment, reason: String },
}

impl IiifError {
    pub fn status(&self) -> StatusCode {
        match self {
            IiifError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            IiifError::UnknownVersion { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            IiifError::NotIiifPath | IiifError::NotProcessable { .. } => StatusCode::NOT_FOUND,
            IiifError::Unsupported { .. } | IiifError::Invalid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            IiifError::MethodNotAllowed { .. } => ErrorClass::ClientMethod,
            IiifError::UnknownVersion { .. } => ErrorClass::Configuration,
            IiifError::Unsupported { .. } => ErrorClass::ClientUnsupported,
            IiifError::NotIiifPath | IiifError::NotProcessable { .. } | IiifError::Invalid { .. } => {
                ErrorClass::ClientSyntax
            }
        }
    }

    /// Detail for logs; never sent to the client.
    pub fn detail(&self) -> String {
        match self {
            IiifError::MethodNotAllowed { method } => format!("method {method} rejected"),
            IiifError::UnknownVersion { requested } => format!("version override {requested:?} not implemented"),
            IiifError::NotIiifPath => "path does not match an image or info request".to_string(),
            IiifError::NotProcessable { identifier } => format!("identifier {identifier:?} is not a processable image"),
            IiifError::Unsupported { reason, .. } | IiifError::Invalid { reason, .. } => reason.clone(),
        }
    }
}

impl From<SegmentFailure> for IiifError {
    fn from(failure: SegmentFailure) -> Self {
        let SegmentFailure { segment, kind, reason } = failure;
        match kind {
            FailureKind::Unsupported => IiifError::Unsupported { segment, reason },
            FailureKind::Invalid => IiifError::Invalid { segment, reason },
        }
    }
}

impl Serialize for IiifError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("IiifError", 4)?;
        state.serialize_field("status", &self.status().as_u16())?;
        state.serialize_field("body", &self.to_string())?;
        state.serialize_field("class", self.class().as_str())?;
        state.serialize_field("detail", &self.detail())?;
        state.end()
    }
}
