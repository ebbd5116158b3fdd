//! Segment grammars for IIIF image requests.
//!
//! # Data Flow
//! ```text
//! "{region}/{size}/{rotation}/{quality}.{format}"
//!     → region.rs   (full | square | x,y,w,h | pct:x,y,w,h)
//!     → size.rs     (full | max | w, | ,h | w,h | !w,h | pct:n)
//!     → rotation.rs ([!]n, 0 ≤ n ≤ 360)
//!     → quality.rs  (default | bitonal | color | gray)
//!     → format.rs   (jpg | gif | jp2 | pdf | png | tif | webp)
//!     → SegmentVerdict per segment, first non-Supported wins
//! ```
//!
//! # Design Decisions
//! - Each grammar first parses syntax into a typed value, then decides
//!   whether the Level 0 profile honors it
//! - Unparseable tokens are Invalid, parseable but unhonored ones Unsupported
//! - Validators run as an ordered table, never as nested branches

pub mod format;
pub mod number;
pub mod quality;
pub mod region;
pub mod rotation;
pub mod size;

use serde::Serialize;

pub use format::Format;
pub use quality::Quality;
pub use region::Region;
pub use rotation::Rotation;
pub use size::Size;

/// The five image-request path segments, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Region,
    Size,
    Rotation,
    Quality,
    Format,
}

impl Segment {
    /// Name used in error bodies and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Region => "region",
            Segment::Size => "size",
            Segment::Rotation => "rotation",
            Segment::Quality => "quality",
            Segment::Format => "format",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentVerdict<T> {
    /// Honored by the Level 0 profile; carries the normalized value.
    Supported(T),
    /// Well-formed but not implemented.
    Unsupported(String),
    /// Malformed.
    Invalid(String),
}

impl<T> SegmentVerdict<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SegmentVerdict<U> {
        match self {
            SegmentVerdict::Supported(v) => SegmentVerdict::Supported(f(v)),
            SegmentVerdict::Unsupported(reason) => SegmentVerdict::Unsupported(reason),
            SegmentVerdict::Invalid(reason) => SegmentVerdict::Invalid(reason),
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, SegmentVerdict::Supported(_))
    }
}

/// Build a verdict from a syntax parse and a support check.
pub(crate) fn classify<T>(
    parsed: Result<T, String>,
    supported: impl FnOnce(&T) -> bool,
    describe: impl FnOnce(&T) -> String,
) -> SegmentVerdict<T> {
    match parsed {
        Ok(value) if supported(&value) => SegmentVerdict::Supported(value),
        Ok(value) => SegmentVerdict::Unsupported(describe(&value)),
        Err(reason) => SegmentVerdict::Invalid(reason),
    }
}

/// A query parameter handed to the image-processing backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub key: &'static str,
    pub value: String,
}

impl Directive {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self { key, value: value.into() }
    }
}

/// The raw segment tokens of an image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSegments {
    pub region: String,
    pub size: String,
    pub rotation: String,
    pub quality: String,
    pub format: String,
}

impl ImageSegments {
    fn token(&self, segment: Segment) -> &str {
        match segment {
            Segment::Region => &self.region,
            Segment::Size => &self.size,
            Segment::Rotation => &self.rotation,
            Segment::Quality => &self.quality,
            Segment::Format => &self.format,
        }
    }
}

type Validator = fn(&str) -> SegmentVerdict<Vec<Directive>>;

fn check_region(token: &str) -> SegmentVerdict<Vec<Directive>> {
    region::validate(token).map(|v| v.directives())
}

fn check_size(token: &str) -> SegmentVerdict<Vec<Directive>> {
    size::validate(token).map(|v| v.directives())
}

fn check_rotation(token: &str) -> SegmentVerdict<Vec<Directive>> {
    rotation::validate(token).map(|v| v.directives())
}

fn check_quality(token: &str) -> SegmentVerdict<Vec<Directive>> {
    quality::validate(token).map(|v| v.directives())
}

fn check_format(token: &str) -> SegmentVerdict<Vec<Directive>> {
    format::validate(token).map(|v| v.directives())
}

/// Validators in the order their failures are reported.
const VALIDATORS: [(Segment, Validator); 5] = [
    (Segment::Region, check_region),
    (Segment::Size, check_size),
    (Segment::Rotation, check_rotation),
    (Segment::Quality, check_quality),
    (Segment::Format, check_format),
];

/// Why a segment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unsupported,
    Invalid,
}

/// The first segment that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFailure {
    pub segment: Segment,
    pub kind: FailureKind,
    pub reason: String,
}

/// Run every validator in order and stop at the first non-Supported verdict.
///
/// On success, returns the processing directives of all segments in order.
pub fn validate_segments(segments: &ImageSegments) -> Result<Vec<Directive>, SegmentFailure> {
    let mut directives = Vec::new();

    for (segment, validate) in VALIDATORS {
        let (kind, reason) = match validate(segments.token(segment)) {
            SegmentVerdict::Supported(mut d) => {
                directives.append(&mut d);
                continue;
            }
            SegmentVerdict::Unsupported(reason) => (FailureKind::Unsupported, reason),
            SegmentVerdict::Invalid(reason) => (FailureKind::Invalid, reason),
        };
        return Err(SegmentFailure { segment, kind, reason });
    }

    Ok(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(region: &str, size: &str, rotation: &str, quality: &str, format: &str) -> ImageSegments {
        ImageSegments {
            region: region.into(),
            size: size.into(),
            rotation: rotation.into(),
            quality: quality.into(),
            format: format.into(),
        }
    }

    #[test]
    fn test_all_supported_yields_format_directive() {
        let directives = validate_segments(&segments("full", "full", "0", "default", "jpg")).unwrap();
        assert_eq!(directives, vec![Directive::new("format", "pjpg")]);
    }

    #[test]
    fn test_first_failure_wins() {
        let err = validate_segments(&segments("foo", "bar", "-1", "baz", "qux")).unwrap_err();
        assert_eq!(err.segment, Segment::Region);
        assert_eq!(err.kind, FailureKind::Invalid);

        // Unsupported size reported before invalid rotation
        let err = validate_segments(&segments("full", "max", "-1", "default", "jpg")).unwrap_err();
        assert_eq!(err.segment, Segment::Size);
        assert_eq!(err.kind, FailureKind::Unsupported);

        let err = validate_segments(&segments("full", "full", "0", "gray", "foo")).unwrap_err();
        assert_eq!(err.segment, Segment::Quality);
    }

    #[test]
    fn test_validation_is_repeatable() {
        let input = segments("pct:0,0,1,1", "full", "0", "default", "jpg");
        assert_eq!(validate_segments(&input), validate_segments(&input));
    }
}
