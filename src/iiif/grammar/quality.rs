//! Quality segment.

use std::fmt;

use super::{classify, Directive, SegmentVerdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Default,
    Bitonal,
    Color,
    Gray,
}

impl Quality {
    pub fn parse(token: &str) -> Result<Self, String> {
        match token {
            "default" => Ok(Quality::Default),
            "bitonal" => Ok(Quality::Bitonal),
            "color" => Ok(Quality::Color),
            "gray" => Ok(Quality::Gray),
            _ => Err(format!("unrecognized quality {token:?}")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Default => "default",
            Quality::Bitonal => "bitonal",
            Quality::Color => "color",
            Quality::Gray => "gray",
        }
    }

    pub fn is_level0(&self) -> bool {
        *self == Quality::Default
    }

    pub fn directives(&self) -> Vec<Directive> {
        Vec::new()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a quality token.
pub fn validate(token: &str) -> SegmentVerdict<Quality> {
    classify(Quality::parse(token), Quality::is_level0, |q| {
        format!("quality {q} is not supported at level 0")
    })
}
