//! Specification limits parsed from `LSL~USL` tokens.
//!
//! A token only counts as a spec when it holds exactly one `~` and both
//! halves parse as finite decimal numbers. Anything else yields the
//! "no limit" sentinel `(-inf, +inf)`, which callers treat as "no bound in
//! effect" rather than as an error.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub const SPEC_SEPARATOR: char = '~';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LimitSide {
    Lower,
    Upper,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecBound {
    pub lower_limit: f64,
    pub upper_limit: f64,
    pub raw_text: String,
}

impl Default for SpecBound {
    fn default() -> Self {
        Self::unbounded("")
    }
}

impl SpecBound {
    pub fn new(lower_limit: f64, upper_limit: f64) -> Self {
        Self {
            lower_limit,
            upper_limit,
            raw_text: format!("{}{}{}", lower_limit, SPEC_SEPARATOR, upper_limit),
        }
    }

    pub fn unbounded(raw_text: &str) -> Self {
        Self {
            lower_limit: f64::NEG_INFINITY,
            upper_limit: f64::INFINITY,
            raw_text: raw_text.to_string(),
        }
    }

    /// Parses `A~B`. Never fails: malformed tokens produce the unbounded sentinel.
    pub fn parse(token: &str) -> Self {
        match split_spec(token) {
            Some((lsl, usl)) => Self {
                lower_limit: lsl,
                upper_limit: usl,
                raw_text: token.trim().to_string(),
            },
            None => Self::unbounded(token.trim()),
        }
    }

    pub fn has_lower(&self) -> bool {
        self.lower_limit.is_finite()
    }

    pub fn has_upper(&self) -> bool {
        self.upper_limit.is_finite()
    }

    pub fn is_bounded(&self) -> bool {
        self.has_lower() && self.has_upper()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_limit && value <= self.upper_limit
    }
}

/// True iff `token` is a `number~number` spec. Used by the record parser to
/// locate the spec column among free-form tokens.
pub fn is_spec_token(token: &str) -> bool {
    split_spec(token).is_some()
}

fn split_spec(token: &str) -> Option<(f64, f64)> {
    let mut parts = token.trim().split(SPEC_SEPARATOR);
    let lower = parts.next()?;
    let upper = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((parse_number(lower)?, parse_number(upper)?))
}

pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_requires_exactly_one_separator() {
        assert!(split_spec("1~2~3").is_none());
        assert!(split_spec("12").is_none());
        assert_eq!(split_spec(" -1.5 ~ 2 "), Some((-1.5, 2.0)));
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("1e3"), Some(1000.0));
    }
}
