//! Rotation segment: `[!]degrees`, with `!` requesting a mirror first.

use std::fmt;

use super::number::decimal;
use super::{classify, Directive, SegmentVerdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    pub mirrored: bool,
    pub degrees: String,
}

impl Rotation {
    /// Parse the syntax of a rotation token. Degrees must lie in `[0, 360]`.
    pub fn parse(token: &str) -> Result<Self, String> {
        let (mirrored, degrees) = match token.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        let value = decimal(degrees)?;
        if !value.at_most(360) {
            return Err(format!("rotation {degrees:?} exceeds 360"));
        }

        Ok(Self {
            mirrored,
            degrees: value.as_str().to_string(),
        })
    }

    /// Level 0 honors only the literal `0`.
    pub fn is_level0(&self) -> bool {
        !self.mirrored && self.degrees == "0"
    }

    /// Processing directives. No rotation needs none.
    pub fn directives(&self) -> Vec<Directive> {
        Vec::new()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mirrored {
            f.write_str("!")?;
        }
        f.write_str(&self.degrees)
    }
}

/// Validate a rotation token.
pub fn validate(token: &str) -> SegmentVerdict<Rotation> {
    classify(Rotation::parse(token), Rotation::is_level0, |r| {
        format!("rotation {r} is not supported at level 0")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_rotation() {
        assert!(validate("0").is_supported());
    }

    #[test]
    fn test_unsupported_rotations() {
        let cases = ["90", "180", "270", "359.999", "360", "360.00", "0.001", "!0", "!1", "!0.001", "!90", "0.0"];
        for rotation in cases {
            assert!(
                matches!(validate(rotation), SegmentVerdict::Unsupported(_)),
                "{rotation} should be unsupported"
            );
        }
    }

    #[test]
    fn test_invalid_rotations() {
        let cases = ["1.", "360.001", "361", "-0", "-90", "foo", "", "!", "!!0", "00", ".5"];
        for rotation in cases {
            assert!(
                matches!(validate(rotation), SegmentVerdict::Invalid(_)),
                "{rotation} should be invalid"
            );
        }
    }

    #[test]
    fn test_mirror_flag() {
        let rotation = Rotation::parse("!90").unwrap();
        assert!(rotation.mirrored);
        assert_eq!(rotation.to_string(), "!90");
    }
}
