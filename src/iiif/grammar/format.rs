//! Format segment: the extension after `quality.`.

use std::fmt;

use super::{classify, Directive, SegmentVerdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Jpg,
    Gif,
    Jp2,
    Pdf,
    Png,
    Tif,
    Webp,
}

impl Format {
    pub fn parse(token: &str) -> Result<Self, String> {
        match token {
            "jpg" => Ok(Format::Jpg),
            "gif" => Ok(Format::Gif),
            "jp2" => Ok(Format::Jp2),
            "pdf" => Ok(Format::Pdf),
            "png" => Ok(Format::Png),
            "tif" => Ok(Format::Tif),
            "webp" => Ok(Format::Webp),
            _ => Err(format!("unrecognized format {token:?}")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Jpg => "jpg",
            Format::Gif => "gif",
            Format::Jp2 => "jp2",
            Format::Pdf => "pdf",
            Format::Png => "png",
            Format::Tif => "tif",
            Format::Webp => "webp",
        }
    }

    /// Level 0 delivers JPEG only.
    pub fn is_level0(&self) -> bool {
        *self == Format::Jpg
    }

    /// Processor directives for a supported format. JPEG is always
    /// delivered progressive.
    pub fn directives(&self) -> Vec<Directive> {
        match self {
            Format::Jpg => vec![Directive::new("format", "pjpg")],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a format token.
pub fn validate(token: &str) -> SegmentVerdict<Format> {
    classify(Format::parse(token), Format::is_level0, |f| {
        format!("format {f} is not supported at level 0")
    })
}
