//! Size segment: how the extracted region is scaled.

use std::fmt;

use super::number::{decimal, integer, split_exact, Integer};
use super::{classify, Directive, SegmentVerdict};

/// A parsed size token. Dimensions are positive integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Size {
    Full,
    Max,
    /// `w,`
    Width(String),
    /// `,h`
    Height(String),
    /// `w,h`
    Exact { w: String, h: String },
    /// `!w,h`
    BestFit { w: String, h: String },
    /// `pct:n`
    Percent(String),
}

impl Size {
    /// Parse the syntax of a size token.
    pub fn parse(token: &str) -> Result<Self, String> {
        match token {
            "full" => return Ok(Size::Full),
            "max" => return Ok(Size::Max),
            _ => {}
        }

        if let Some(n) = token.strip_prefix("pct:") {
            let n = decimal(n)?;
            if n.is_zero() || !n.at_most(100) {
                return Err(format!("pct size {:?} must be in (0, 100]", n.as_str()));
            }
            return Ok(Size::Percent(n.as_str().to_string()));
        }

        if let Some(args) = token.strip_prefix('!') {
            let [w, h] = split_exact::<2>(args)
                .ok_or_else(|| format!("best-fit size {args:?} needs two values"))?;
            return Ok(Size::BestFit {
                w: dimension(w)?.as_str().to_string(),
                h: dimension(h)?.as_str().to_string(),
            });
        }

        if token.contains(',') {
            let [w, h] = split_exact::<2>(token)
                .ok_or_else(|| format!("size {token:?} has too many values"))?;
            return match (w.is_empty(), h.is_empty()) {
                (true, true) => Err("size needs a width or a height".to_string()),
                (false, true) => Ok(Size::Width(dimension(w)?.as_str().to_string())),
                (true, false) => Ok(Size::Height(dimension(h)?.as_str().to_string())),
                (false, false) => Ok(Size::Exact {
                    w: dimension(w)?.as_str().to_string(),
                    h: dimension(h)?.as_str().to_string(),
                }),
            };
        }

        Err(format!("unrecognized size {token:?}"))
    }

    /// Level 0 honors only `full`.
    pub fn is_level0(&self) -> bool {
        matches!(self, Size::Full)
    }

    /// Processing directives. `full` keeps the source dimensions.
    pub fn directives(&self) -> Vec<Directive> {
        Vec::new()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Full => f.write_str("full"),
            Size::Max => f.write_str("max"),
            Size::Width(w) => write!(f, "{w},"),
            Size::Height(h) => write!(f, ",{h}"),
            Size::Exact { w, h } => write!(f, "{w},{h}"),
            Size::BestFit { w, h } => write!(f, "!{w},{h}"),
            Size::Percent(n) => write!(f, "pct:{n}"),
        }
    }
}

fn dimension(token: &str) -> Result<Integer<'_>, String> {
    let value = integer(token)?;
    if value.is_zero() {
        return Err("size dimensions must be positive".to_string());
    }
    Ok(value)
}

/// Validate a size token.
pub fn validate(token: &str) -> SegmentVerdict<Size> {
    classify(Size::parse(token), Size::is_level0, |s| {
        format!("size {s} is not supported at level 0")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_sizes() {
        assert_eq!(validate("full"), SegmentVerdict::Supported(Size::Full));
    }

    #[test]
    fn test_unsupported_sizes() {
        let cases = ["max", "1,", ",1", "1,1", "!1,1", "pct:0.001", "pct:50", "pct:100", "pct:100.00"];
        for size in cases {
            assert!(
                matches!(validate(size), SegmentVerdict::Unsupported(_)),
                "{size} should be unsupported"
            );
        }
    }

    #[test]
    fn test_invalid_sizes() {
        let cases = [
            "0,", "1.0", "01,", ",0", ",1.0", ",01", "0,0", "1.0,1.0", "-1,-1", "!0,0", "!1.0,1.0",
            "pct:0", "pct:1.", "ptc:50.0", "pct: 100.001", "pct:101", "foo", ",", "!1,", "1,2,3",
        ];
        for size in cases {
            assert!(
                matches!(validate(size), SegmentVerdict::Invalid(_)),
                "{size} should be invalid"
            );
        }
    }

    #[test]
    fn test_size_forms() {
        assert_eq!(Size::parse("150,"), Ok(Size::Width("150".into())));
        assert_eq!(Size::parse(",150"), Ok(Size::Height("150".into())));
        assert_eq!(
            Size::parse("!640,480"),
            Ok(Size::BestFit { w: "640".into(), h: "480".into() })
        );
        assert_eq!(Size::parse("pct:12.5").unwrap().to_string(), "pct:12.5");
    }
}
