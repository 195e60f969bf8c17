//! Test-log records and the tolerant line parser.
//!
//! A data line looks like `[step,] item tokens..., LSL~USL, v1, v2, ..., unit`.
//! Malformed lines are never errors: each line yields a [`LineOutcome`] and
//! the loader aggregates the skips.

pub mod loader;

use crate::spec_limits::{is_spec_token, parse_number, SpecBound};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub use loader::{load_records, parse_reader, parse_str, ParsedLog};

pub const DEFAULT_HEADER_PREFIX: &str = "STEP ITEM";
pub const SECTION_MARKER: char = '[';
pub const FIELD_DELIMITER: char = ',';
pub const MIN_TOKENS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub step: String,
    pub item_name: String,
    pub spec_text: String,
    pub spec: SpecBound,
    pub values: Vec<f64>,
    pub unit: String,
}

impl TestRecord {
    /// Non-zero values. Zero is the log's "no reading" marker.
    pub fn readings(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| *v != 0.0).collect()
    }

    pub fn has_readings(&self) -> bool {
        self.values.iter().any(|v| *v != 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum SkipReason {
    #[strum(serialize = "blank line")]
    Blank,
    #[strum(serialize = "header line")]
    Header,
    #[strum(serialize = "section marker")]
    SectionMarker,
    #[strum(serialize = "too few fields")]
    TooFewTokens,
    #[strum(serialize = "no spec token")]
    NoSpecToken,
    #[strum(serialize = "no non-zero readings")]
    NoReadings,
    #[strum(serialize = "unreadable row")]
    Unreadable,
}

pub type LineOutcome = Result<TestRecord, SkipReason>;

/// Line parser carrying the current step across lines.
#[derive(Debug, Clone)]
pub struct RecordParser {
    header_prefix: String,
    current_step: String,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_PREFIX)
    }
}

impl RecordParser {
    /// An empty `header_prefix` disables header filtering.
    pub fn new(header_prefix: &str) -> Self {
        Self {
            header_prefix: header_prefix.to_string(),
            current_step: String::new(),
        }
    }

    pub fn current_step(&self) -> &str {
        &self.current_step
    }

    pub fn parse_line(&mut self, line: &str) -> LineOutcome {
        self.parse_fields(line.split(FIELD_DELIMITER))
    }

    /// Parses one row given its raw (untrimmed, possibly empty) fields.
    pub fn parse_fields<'a, I>(&mut self, raw_fields: I) -> LineOutcome
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raw: Vec<&str> = raw_fields.into_iter().collect();

        if raw.iter().all(|f| f.trim().is_empty()) {
            return Err(SkipReason::Blank);
        }
        if !self.header_prefix.is_empty()
            && raw
                .first()
                .is_some_and(|f| f.trim_start().starts_with(self.header_prefix.as_str()))
        {
            return Err(SkipReason::Header);
        }
        if raw.iter().any(|f| f.contains(SECTION_MARKER)) {
            return Err(SkipReason::SectionMarker);
        }

        let tokens: Vec<&str> = raw
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();
        if tokens.len() < MIN_TOKENS {
            return Err(SkipReason::TooFewTokens);
        }

        // The step is updated even if the rest of the line turns out unusable.
        let name_start = if is_step_token(tokens[0]) {
            self.current_step = tokens[0].to_string();
            1
        } else {
            0
        };

        let spec_idx = tokens
            .iter()
            .enumerate()
            .skip(name_start)
            .find(|(_, t)| is_spec_token(t))
            .map(|(i, _)| i)
            .ok_or(SkipReason::NoSpecToken)?;

        let unit_idx = tokens.len() - 1;
        let values: Vec<f64> = if spec_idx < unit_idx {
            tokens[spec_idx + 1..unit_idx]
                .iter()
                .filter_map(|t| parse_number(t))
                .collect()
        } else {
            Vec::new()
        };

        let record = TestRecord {
            step: self.current_step.clone(),
            item_name: tokens[name_start..spec_idx].join(" "),
            spec_text: tokens[spec_idx].to_string(),
            spec: SpecBound::parse(tokens[spec_idx]),
            values,
            unit: tokens[unit_idx].to_string(),
        };

        if !record.has_readings() {
            return Err(SkipReason::NoReadings);
        }
        Ok(record)
    }
}

/// A leading token opens a new step when it starts with a digit or carries a
/// decimal point.
pub fn is_step_token(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit()) || token.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_token_detection() {
        assert!(is_step_token("1"));
        assert!(is_step_token("1.0"));
        assert!(is_step_token("v.2"));
        assert!(!is_step_token("Width"));
        assert!(!is_step_token("-5"));
    }

    #[test]
    fn test_spec_as_last_token_keeps_no_values() {
        let mut parser = RecordParser::default();
        let out = parser.parse_line("A,B,C,1~2");
        assert_eq!(out, Err(SkipReason::NoReadings));
    }
}
