//! Region segment: which rectangle of the source image to return.

use std::fmt;

use super::number::{decimal, integer, split_exact};
use super::{classify, Directive, SegmentVerdict};

/// A parsed region token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// The whole image.
    Full,
    /// The largest centered square.
    Square,
    /// Pixel box `x,y,w,h`.
    Pixels { x: String, y: String, w: String, h: String },
    /// Percentage box `pct:x,y,w,h`.
    Percent { x: String, y: String, w: String, h: String },
}

impl Region {
    /// Parse the syntax of a region token.
    pub fn parse(token: &str) -> Result<Self, String> {
        match token {
            "full" => Ok(Region::Full),
            "square" => Ok(Region::Square),
            _ => {
                if let Some(args) = token.strip_prefix("pct:") {
                    parse_percent(args)
                } else if token.contains(',') {
                    parse_pixels(token)
                } else {
                    Err(format!("unrecognized region {token:?}"))
                }
            }
        }
    }

    /// Level 0 honors only `full`.
    pub fn is_level0(&self) -> bool {
        matches!(self, Region::Full)
    }

    /// Processing directives. `full` is the processor's default crop.
    pub fn directives(&self) -> Vec<Directive> {
        Vec::new()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Full => f.write_str("full"),
            Region::Square => f.write_str("square"),
            Region::Pixels { x, y, w, h } => write!(f, "{x},{y},{w},{h}"),
            Region::Percent { x, y, w, h } => write!(f, "pct:{x},{y},{w},{h}"),
        }
    }
}

fn parse_pixels(args: &str) -> Result<Region, String> {
    let [x, y, w, h] = split_exact::<4>(args)
        .ok_or_else(|| format!("pixel region {args:?} needs four values"))?;

    let (x, y, w, h) = (integer(x)?, integer(y)?, integer(w)?, integer(h)?);

    if w.is_zero() || h.is_zero() {
        return Err("region width and height must be positive".to_string());
    }

    Ok(Region::Pixels {
        x: x.as_str().to_string(),
        y: y.as_str().to_string(),
        w: w.as_str().to_string(),
        h: h.as_str().to_string(),
    })
}

fn parse_percent(args: &str) -> Result<Region, String> {
    let [x, y, w, h] = split_exact::<4>(args)
        .ok_or_else(|| format!("pct region {args:?} needs four values"))?;

    let (x, y, w, h) = (decimal(x)?, decimal(y)?, decimal(w)?, decimal(h)?);

    // An origin at 100% leaves nothing to crop.
    if !x.below(100) || !y.below(100) {
        return Err("pct region origin must be below 100".to_string());
    }
    if w.is_zero() || h.is_zero() {
        return Err("region width and height must be positive".to_string());
    }
    if !w.at_most(100) || !h.at_most(100) {
        return Err("pct region extent must not exceed 100".to_string());
    }

    Ok(Region::Percent {
        x: x.as_str().to_string(),
        y: y.as_str().to_string(),
        w: w.as_str().to_string(),
        h: h.as_str().to_string(),
    })
}

/// Validate a region token.
pub fn validate(token: &str) -> SegmentVerdict<Region> {
    classify(Region::parse(token), Region::is_level0, |r| {
        format!("region {r} is not supported at level 0")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_regions() {
        assert_eq!(validate("full"), SegmentVerdict::Supported(Region::Full));
    }

    #[test]
    fn test_unsupported_regions() {
        let cases = [
            "square",
            "0,0,100,100",
            "100,100,100,100",
            "pct:0,0,1,1",
            "pct:0,0,0.01,0.01",
            "pct:0.0,0.0,100.0,100.0",
            "pct:99.99,99.99,100.00,100.00",
        ];
        for region in cases {
            assert!(
                matches!(validate(region), SegmentVerdict::Unsupported(_)),
                "{region} should be unsupported"
            );
        }
    }

    #[test]
    fn test_invalid_regions() {
        let cases = [
            "-1,-1,100,100",
            "0,0,-1,-1",
            "1,1,0,0",
            "pct:00,00,1,1",
            "pct:0,0,01,01",
            "pct:1",
            "pct:1,2",
            "pct:1,2,3",
            "pct:1,2,3,0",
            "pct:100,100,100,100",
            "pct:-1,-1,-1,-1",
            "pct:0,0,0,0",
            "pct:0.,0.,100.,100.",
            "foo",
            "1,2,3",
            "1.5,0,10,10",
            "",
        ];
        for region in cases {
            assert!(
                matches!(validate(region), SegmentVerdict::Invalid(_)),
                "{region} should be invalid"
            );
        }
    }

    #[test]
    fn test_region_display_round_trips_token() {
        let region = Region::parse("pct:0.0,0.0,100.0,100.0").unwrap();
        assert_eq!(region.to_string(), "pct:0.0,0.0,100.0,100.0");
    }
}
