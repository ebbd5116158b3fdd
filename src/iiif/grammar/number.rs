//! Numeric tokens shared by the region, size and rotation grammars.
//!
//! # Grammar
//! ```text
//! integer := "0" | [1-9][0-9]*
//! decimal := integer ( "." [0-9]+ )?
//! ```
//!
//! # Design Decisions
//! - Values are kept as the digit strings they were written with
//! - Comparisons against bounds are exact; no floating point anywhere
//! - Leading zeros and dangling decimal points never parse

use std::cmp::Ordering;

/// A non-negative integer token, e.g. `0` or `1024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer<'a> {
    digits: &'a str,
}

impl<'a> Integer<'a> {
    /// Parse an integer token. Returns `None` for leading zeros, signs,
    /// decimal points or any non-digit character.
    pub fn parse(token: &'a str) -> Option<Self> {
        if !is_canonical_digits(token) {
            return None;
        }
        Some(Self { digits: token })
    }

    /// True for the bare token `0`.
    pub fn is_zero(&self) -> bool {
        self.digits == "0"
    }

    /// The token as written.
    pub fn as_str(&self) -> &'a str {
        self.digits
    }
}

/// A non-negative decimal token, e.g. `0`, `0.01` or `100.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal<'a> {
    whole: &'a str,
    fraction: &'a str,
    raw: &'a str,
}

impl<'a> Decimal<'a> {
    /// Parse a decimal token. Both sides of a decimal point must carry digits.
    pub fn parse(token: &'a str) -> Option<Self> {
        let (whole, fraction) = match token.split_once('.') {
            Some((whole, fraction)) => {
                if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                (whole, fraction)
            }
            None => (token, ""),
        };

        if !is_canonical_digits(whole) {
            return None;
        }

        Some(Self { whole, fraction, raw: token })
    }

    /// True when the value equals zero (`0`, `0.0`, `0.000`).
    pub fn is_zero(&self) -> bool {
        self.whole == "0" && self.fraction.bytes().all(|b| b == b'0')
    }

    /// Compare the value against an integer bound.
    pub fn cmp_bound(&self, bound: u32) -> Ordering {
        let bound = bound.to_string();
        let whole = self
            .whole
            .len()
            .cmp(&bound.len())
            .then_with(|| self.whole.cmp(bound.as_str()));

        match whole {
            Ordering::Equal if self.fraction.bytes().any(|b| b != b'0') => Ordering::Greater,
            other => other,
        }
    }

    /// True when `value <= bound`.
    pub fn at_most(&self, bound: u32) -> bool {
        self.cmp_bound(bound) != Ordering::Greater
    }

    /// True when `value < bound`.
    pub fn below(&self, bound: u32) -> bool {
        self.cmp_bound(bound) == Ordering::Less
    }

    /// The token as written.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }
}

/// Parse an integer argument, describing the failure.
pub fn integer(token: &str) -> Result<Integer<'_>, String> {
    Integer::parse(token).ok_or_else(|| format!("malformed integer {token:?}"))
}

/// Parse a decimal argument, describing the failure.
pub fn decimal(token: &str) -> Result<Decimal<'_>, String> {
    Decimal::parse(token).ok_or_else(|| format!("malformed number {token:?}"))
}

/// `0` or a non-empty digit run without a leading zero.
fn is_canonical_digits(s: &str) -> bool {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    s == "0" || !s.starts_with('0')
}

/// Split a comma-separated argument list into exactly `N` tokens.
pub fn split_exact<const N: usize>(s: &str) -> Option<[&str; N]> {
    let mut out = [""; N];
    let mut parts = s.split(',');
    for slot in out.iter_mut() {
        *slot = parts.next()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_grammar() {
        assert!(Integer::parse("0").is_some());
        assert!(Integer::parse("1").is_some());
        assert!(Integer::parse("1024").is_some());

        for bad in ["", "00", "01", "-1", "+1", "1.0", "1.", " 1", "1e3", "abc"] {
            assert!(Integer::parse(bad).is_none(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_decimal_grammar() {
        for good in ["0", "0.0", "0.001", "99.99", "100", "100.00", "360.000"] {
            assert!(Decimal::parse(good).is_some(), "{good:?} should parse");
        }

        for bad in ["", "00", "01", "0.", "1.", ".5", "-0", "-1", "1..0", "1.0.0", " 100.001"] {
            assert!(Decimal::parse(bad).is_none(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_decimal_bounds() {
        let d = |s| Decimal::parse(s).unwrap();

        assert!(d("100").at_most(100));
        assert!(d("100.00").at_most(100));
        assert!(!d("100.001").at_most(100));
        assert!(!d("101").at_most(100));
        assert!(d("99.99").below(100));
        assert!(!d("100.0").below(100));
        assert!(d("9").below(10));
        assert!(!d("1000").at_most(360));

        assert!(d("0.000").is_zero());
        assert!(!d("0.001").is_zero());
    }

    #[test]
    fn test_split_exact() {
        assert_eq!(split_exact::<2>("1,2"), Some(["1", "2"]));
        assert_eq!(split_exact::<2>("1,"), Some(["1", ""]));
        assert_eq!(split_exact::<4>("1,2,3"), None);
        assert_eq!(split_exact::<4>("1,2,3,4,5"), None);
    }
}
