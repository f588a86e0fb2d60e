//! Tokenizer for cluster-pixel strings.
//!
//! A pixel string is a run of bracketed quadruples with no separator between
//! groups:
//!
//! ```text
//! [x,y,E,t][x,y,E,t]...
//! ```
//!
//! `x` and `y` are integers, `E` (energy) and `t` (time of arrival) are reals.
//! Whitespace is accepted around each field and around the whole string, but
//! not between groups. Anything else is rejected with a [`ParseError`] that
//! carries the byte offset of the offending token.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::module_name_repetitions
)]

use crate::error::{ParseError, ParseErrorKind};
use clusterpix_core::{Cluster, Hit};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fields per bracketed group.
const FIELDS_PER_GROUP: usize = 4;
const FIELD_NAMES: [&str; FIELDS_PER_GROUP] = ["x", "y", "energy", "timestamp"];

/// One fully parsed `[x,y,E,t]` group.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelRecord {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
    /// Deposited energy.
    pub energy: f64,
    /// Time of arrival. Not used by the imaging pipeline.
    pub timestamp: f64,
}

impl PixelRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(x: i64, y: i64, energy: f64, timestamp: f64) -> Self {
        Self {
            x,
            y,
            energy,
            timestamp,
        }
    }

    /// Drops the timestamp.
    #[inline]
    #[must_use]
    pub fn hit(&self) -> Hit {
        Hit::new(self.x, self.y, self.energy)
    }
}

impl fmt::Display for PixelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{:?},{:?}]",
            self.x, self.y, self.energy, self.timestamp
        )
    }
}

/// Formats records back into the bracketed pixel-string layout.
pub fn format_cluster_pixels<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a PixelRecord>,
{
    records.into_iter().map(ToString::to_string).collect()
}

/// Iterator over the groups of a pixel string.
///
/// Yields at most one error, after which it is exhausted.
pub struct PixelRecords<'a> {
    src: &'a str,
    pos: usize,
    end: usize,
    started: bool,
    done: bool,
}

impl<'a> PixelRecords<'a> {
    /// Creates a tokenizer over `src`.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        let end = src.trim_end().len();
        let pos = src.len() - src.trim_start().len();
        Self {
            src,
            pos: pos.min(end),
            end,
            started: false,
            done: false,
        }
    }

    fn peek(&self) -> Option<char> {
        if self.pos >= self.end {
            return None;
        }
        self.src[self.pos..].chars().next()
    }

    fn parse_group(&mut self) -> Result<PixelRecord, ParseError> {
        let group_start = self.pos;
        match self.peek() {
            Some('[') => self.pos += 1,
            Some(found) => {
                return Err(ParseError::new(
                    ParseErrorKind::Expected {
                        expected: '[',
                        found,
                    },
                    self.pos,
                ))
            }
            None => return Err(ParseError::new(ParseErrorKind::UnexpectedEnd('['), self.pos)),
        }

        let mut fields: [(&str, usize); FIELDS_PER_GROUP] = [("", 0); FIELDS_PER_GROUP];
        let mut count = 0;
        let bytes = self.src.as_bytes();

        loop {
            let start = self.pos;
            while self.pos < self.end && bytes[self.pos] != b',' && bytes[self.pos] != b']' {
                self.pos += 1;
            }
            if self.pos >= self.end {
                return Err(ParseError::new(ParseErrorKind::UnexpectedEnd(']'), self.pos));
            }

            let raw = &self.src[start..self.pos];
            let literal = raw.trim();
            let offset = start + (raw.len() - raw.trim_start().len());
            if count < FIELDS_PER_GROUP {
                fields[count] = (literal, offset);
            }
            count += 1;

            let delimiter = bytes[self.pos];
            self.pos += 1;
            if delimiter == b']' {
                break;
            }
        }

        if count != FIELDS_PER_GROUP {
            return Err(ParseError::new(ParseErrorKind::Arity(count), group_start));
        }

        Ok(PixelRecord {
            x: parse_integer(fields[0], FIELD_NAMES[0])?,
            y: parse_integer(fields[1], FIELD_NAMES[1])?,
            energy: parse_real(fields[2], FIELD_NAMES[2])?,
            timestamp: parse_real(fields[3], FIELD_NAMES[3])?,
        })
    }
}

impl Iterator for PixelRecords<'_> {
    type Item = Result<PixelRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            if self.pos >= self.end {
                self.done = true;
                return Some(Err(ParseError::new(ParseErrorKind::Empty, self.pos)));
            }
        }
        if self.pos >= self.end {
            self.done = true;
            return None;
        }

        let result = self.parse_group();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

fn invalid(field: &'static str, literal: &str, offset: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidNumber {
            field,
            literal: literal.to_string(),
        },
        offset,
    )
}

/// Integer field. A finite real literal is accepted and truncated toward zero.
fn parse_integer((literal, offset): (&str, usize), field: &'static str) -> Result<i64, ParseError> {
    if let Ok(value) = literal.parse::<i64>() {
        return Ok(value);
    }
    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() < i64::MAX as f64 => Ok(value.trunc() as i64),
        _ => Err(invalid(field, literal, offset)),
    }
}

fn parse_real((literal, offset): (&str, usize), field: &'static str) -> Result<f64, ParseError> {
    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid(field, literal, offset)),
    }
}

/// Parses every group of a pixel string into records, keeping timestamps.
///
/// # Errors
/// Returns the first [`ParseError`] encountered.
pub fn parse_pixel_records(src: &str) -> Result<Vec<PixelRecord>, ParseError> {
    PixelRecords::new(src).collect()
}

/// Parses a pixel string into a [`Cluster`], discarding timestamps.
///
/// # Errors
/// Returns the first [`ParseError`] encountered.
pub fn parse_cluster_pixels(src: &str) -> Result<Cluster, ParseError> {
    PixelRecords::new(src)
        .map(|record| record.map(|r| r.hit()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(src: &str) -> ParseErrorKind {
        parse_cluster_pixels(src).unwrap_err().kind
    }

    #[test]
    fn test_parse_two_groups() {
        let cluster = parse_cluster_pixels("[1,2,10.0,0][3,4,20.0,0]").unwrap();
        assert_eq!(cluster.x, vec![1, 3]);
        assert_eq!(cluster.y, vec![2, 4]);
        assert_eq!(cluster.energy, vec![10.0, 20.0]);
    }

    #[test]
    fn test_parse_single_group() {
        let records = parse_pixel_records("[128,64,5.49,1.5e-6]").unwrap();
        assert_eq!(records, vec![PixelRecord::new(128, 64, 5.49, 1.5e-6)]);
    }

    #[test]
    fn test_parse_whitespace_inside_groups() {
        let cluster = parse_cluster_pixels("  [ 1 , 2 , 3.5 , 7 ][-4,5,-0.25,8]\n").unwrap();
        assert_eq!(cluster.get(0), Some(Hit::new(1, 2, 3.5)));
        assert_eq!(cluster.get(1), Some(Hit::new(-4, 5, -0.25)));
    }

    #[test]
    fn test_integer_fields_truncate_reals() {
        let cluster = parse_cluster_pixels("[3.0,-2.7,1,0]").unwrap();
        assert_eq!((cluster.x[0], cluster.y[0]), (3, -2));
    }

    #[test]
    fn test_round_trip_values() {
        let src = "[1,2,10.5,0.0][200,3,0.125,17.0][7,7,3e5,1.0]";
        let records = parse_pixel_records(src).unwrap();
        let again = parse_pixel_records(&format_cluster_pixels(&records)).unwrap();
        assert_eq!(records, again);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kind(""), ParseErrorKind::Empty);
        assert_eq!(kind("   \t"), ParseErrorKind::Empty);
    }

    #[test]
    fn test_missing_brackets() {
        assert_eq!(
            kind("1,2,3,4"),
            ParseErrorKind::Expected {
                expected: '[',
                found: '1'
            }
        );
        assert_eq!(kind("[1,2,3,4"), ParseErrorKind::UnexpectedEnd(']'));
    }

    #[test]
    fn test_separator_between_groups_rejected() {
        let err = parse_cluster_pixels("[1,2,3,4],[5,6,7,8]").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                expected: '[',
                found: ','
            }
        );
        assert_eq!(err.offset, 9);

        assert!(parse_cluster_pixels("[1,2,3,4] [5,6,7,8]").is_err());
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(kind("[1,2,3]"), ParseErrorKind::Arity(3));
        assert_eq!(kind("[1,2,3,4,5]"), ParseErrorKind::Arity(5));
        assert_eq!(kind("[1,2,3,4][]"), ParseErrorKind::Arity(1));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = parse_cluster_pixels("[1,2,abc,4]").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::InvalidNumber {
                field: "energy",
                literal: "abc".to_string()
            }
        );
        assert_eq!(err.offset, 5);

        assert!(matches!(
            kind("[1,,3,4]"),
            ParseErrorKind::InvalidNumber { field: "y", .. }
        ));
        assert!(matches!(
            kind("[1,2,nan,4]"),
            ParseErrorKind::InvalidNumber { field: "energy", .. }
        ));
        assert!(matches!(
            kind("[1,2,3,inf]"),
            ParseErrorKind::InvalidNumber { field: "timestamp", .. }
        ));
        assert!(matches!(
            kind("[[1,2,3,4]]"),
            ParseErrorKind::InvalidNumber { field: "x", .. }
        ));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut records = PixelRecords::new("[1,2,3,4][bad][5,6,7,8]");
        assert!(records.next().unwrap().is_ok());
        assert!(records.next().unwrap().is_err());
        assert!(records.next().is_none());
    }
}
