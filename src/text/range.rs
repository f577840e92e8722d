use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{EditError, EditResult};

/// Half-open byte range `[start, end)` into a document's UTF-8 text.
///
/// An empty range (`start == end`) is a cursor position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width range at `offset`.
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether `other` lies entirely within this range (edges included).
    pub fn contains_range(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check that the range is ordered, inside `text`, and on char boundaries.
    pub fn validate(&self, text: &str) -> EditResult<()> {
        let ok = self.start <= self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end);
        if ok {
            Ok(())
        } else {
            Err(EditError::invalid_range(*self, text.len()))
        }
    }

    /// Slice `text` by this range. The range must already be validated.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Error returned when a `start..end` string cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected `START..END` or `OFFSET`, got `{0}`")]
pub struct ParseRangeError(String);

impl FromStr for TextRange {
    type Err = ParseRangeError;

    /// Accepts `start..end` or a single offset for a cursor.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| ParseRangeError(s.to_string()))
        };
        match s.split_once("..") {
            Some((start, end)) => Ok(TextRange::new(parse(start)?, parse(end)?)),
            None => Ok(TextRange::point(parse(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ranges_and_points() {
        assert_eq!("4..7".parse::<TextRange>(), Ok(TextRange::new(4, 7)));
        assert_eq!("11".parse::<TextRange>(), Ok(TextRange::point(11)));
        assert!("4..x".parse::<TextRange>().is_err());
        assert!("".parse::<TextRange>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let range = TextRange::new(12, 30);
        assert_eq!(range.to_string().parse::<TextRange>(), Ok(range));
    }

    #[test]
    fn validate_rejects_inverted_and_out_of_bounds() {
        let text = "hello";
        assert!(TextRange::new(0, 5).validate(text).is_ok());
        assert!(TextRange::point(5).validate(text).is_ok());
        assert!(TextRange::new(3, 2).validate(text).is_err());
        assert!(TextRange::new(2, 6).validate(text).is_err());
    }

    #[test]
    fn validate_rejects_split_characters() {
        // 'é' is two bytes wide
        let text = "café";
        assert!(TextRange::new(0, 5).validate(text).is_ok());
        assert!(matches!(
            TextRange::new(0, 4).validate(text),
            Err(EditError::InvalidRange { len: 5, .. })
        ));
    }

    #[test]
    fn contains_range_includes_edges() {
        let outer = TextRange::new(2, 8);
        assert!(outer.contains_range(&TextRange::new(2, 8)));
        assert!(outer.contains_range(&TextRange::point(8)));
        assert!(!outer.contains_range(&TextRange::new(1, 3)));
    }
}
