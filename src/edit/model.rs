use serde::{Deserialize, Serialize};

use crate::text::TextRange;

/// A single text change.
///
/// With `is_replace` set, `range` is deleted and `text` takes its place.
/// Otherwise `text` is inserted at `range.start` and nothing is deleted,
/// whatever the width of `range`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub range: TextRange,
    pub text: String,
    #[serde(default)]
    pub is_replace: bool,
}

impl Edit {
    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::point(offset),
            text: text.into(),
            is_replace: false,
        }
    }

    /// Replace `range` with `text`.
    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
            is_replace: true,
        }
    }

    /// Delete `range`.
    pub fn delete(range: TextRange) -> Self {
        Self::replace(range, String::new())
    }

    /// The text this edit removes: `range` for a replace, a zero-width span
    /// at `range.start` for an insertion.
    pub fn source_span(&self) -> TextRange {
        if self.is_replace {
            self.range
        } else {
            TextRange::point(self.range.start)
        }
    }
}
