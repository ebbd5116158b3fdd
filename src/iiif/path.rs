//! Path parser.
//!
//! # Shapes
//! ```text
//! {prefix}/{identifier}/{region}/{size}/{rotation}/{quality}.{format}
//! {prefix}/{identifier}/info.json
//! ```
//!
//! # Design Decisions
//! - Segments are located by position from the end of the path; the
//!   prefix is whatever precedes the identifier
//! - The identifier is never decoded; percent-encoding is kept verbatim
//! - Empty components never match either shape

use serde::Serialize;

use crate::iiif::error::IiifError;
use crate::iiif::grammar::ImageSegments;

const INFO_DOCUMENT: &str = "info.json";

/// What the path asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RequestKind {
    Info,
    Image(ImageSegments),
}

/// A path that matched one of the IIIF shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPath {
    /// `/a/b` or empty.
    pub prefix: String,
    /// Opaque identifier, exactly as it appeared in the path.
    pub identifier: String,
    pub kind: RequestKind,
}

impl ParsedPath {
    /// Split a raw request path into prefix, identifier and request kind.
    pub fn parse(path: &str) -> Result<Self, IiifError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        if trimmed.is_empty() {
            return Err(IiifError::NotIiifPath);
        }

        let components: Vec<&str> = trimmed.split('/').collect();
        if components.iter().any(|c| c.is_empty()) {
            return Err(IiifError::NotIiifPath);
        }

        let n = components.len();

        if components[n - 1] == INFO_DOCUMENT {
            if n < 2 {
                return Err(IiifError::NotIiifPath);
            }
            return Ok(Self {
                prefix: join_prefix(&components[..n - 2]),
                identifier: components[n - 2].to_string(),
                kind: RequestKind::Info,
            });
        }

        if n < 5 {
            return Err(IiifError::NotIiifPath);
        }

        let (quality, format) = components[n - 1]
            .rsplit_once('.')
            .filter(|(quality, format)| !quality.is_empty() && !format.is_empty())
            .ok_or(IiifError::NotIiifPath)?;

        Ok(Self {
            prefix: join_prefix(&components[..n - 5]),
            identifier: components[n - 5].to_string(),
            kind: RequestKind::Image(ImageSegments {
                region: components[n - 4].to_string(),
                size: components[n - 3].to_string(),
                rotation: components[n - 2].to_string(),
                quality: quality.to_string(),
                format: format.to_string(),
            }),
        })
    }

    /// The identifier's literal extension, if any.
    pub fn extension(&self) -> Option<&str> {
        self.identifier
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    /// True when the identifier ends in one of `extensions` (case-insensitive).
    pub fn is_processable(&self, extensions: &[String]) -> bool {
        self.extension()
            .map(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    pub fn is_info(&self) -> bool {
        matches!(self.kind, RequestKind::Info)
    }
}

fn join_prefix(components: &[&str]) -> String {
    components.iter().map(|c| format!("/{c}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(prefix: &str, identifier: &str, segments: [&str; 5]) -> ParsedPath {
        let [region, size, rotation, quality, format] = segments;
        ParsedPath {
            prefix: prefix.into(),
            identifier: identifier.into(),
            kind: RequestKind::Image(ImageSegments {
                region: region.into(),
                size: size.into(),
                rotation: rotation.into(),
                quality: quality.into(),
                format: format.into(),
            }),
        }
    }

    #[test]
    fn test_image_shape() {
        assert_eq!(
            ParsedPath::parse("/pug-life.jpg/full/full/0/default.jpg").unwrap(),
            image("", "pug-life.jpg", ["full", "full", "0", "default", "jpg"])
        );
        assert_eq!(
            ParsedPath::parse("/kittehs/pop6.jpg/pct:0,0,1,1/!1,1/!90/gray.png").unwrap(),
            image("/kittehs", "pop6.jpg", ["pct:0,0,1,1", "!1,1", "!90", "gray", "png"])
        );
    }

    #[test]
    fn test_quality_format_split_on_last_dot() {
        let parsed = ParsedPath::parse("/a.jpg/full/full/0/de.fault.jpg").unwrap();
        assert_eq!(parsed, image("", "a.jpg", ["full", "full", "0", "de.fault", "jpg"]));
    }

    #[test]
    fn test_info_shape() {
        let parsed = ParsedPath::parse("/kittehs/more%2Fcat-manipulating.jpg/info.json").unwrap();
        assert_eq!(parsed.prefix, "/kittehs");
        assert_eq!(parsed.identifier, "more%2Fcat-manipulating.jpg");
        assert!(parsed.is_info());

        let parsed = ParsedPath::parse("/pug-life.jpg/info.json").unwrap();
        assert_eq!(parsed.prefix, "");
        assert_eq!(parsed.identifier, "pug-life.jpg");
    }

    #[test]
    fn test_unknown_paths() {
        for path in [
            "",
            "/",
            "/foo",
            "/foo.jpg",
            "/info.json",
            "/foo.jpg/full/0/default.jpg",
            "/foo.jpg/full/full/0/default",
            "/foo.jpg/full/full/0/.jpg",
            "/foo.jpg/full/full/0/default.",
            "/foo.jpg//full/0/default.jpg",
            "/foo.jpg/full/full/0/default.jpg/",
        ] {
            assert_eq!(ParsedPath::parse(path), Err(IiifError::NotIiifPath), "{path:?}");
        }
    }

    #[test]
    fn test_processable_extension() {
        let extensions = vec!["jpg".to_string(), "png".to_string()];

        let parsed = ParsedPath::parse("/foo.txt/info.json").unwrap();
        assert!(!parsed.is_processable(&extensions));

        let parsed = ParsedPath::parse("/FOO.JPG/info.json").unwrap();
        assert!(parsed.is_processable(&extensions));

        let parsed = ParsedPath::parse("/noextension/info.json").unwrap();
        assert_eq!(parsed.extension(), None);
        assert!(!parsed.is_processable(&extensions));
    }
}
