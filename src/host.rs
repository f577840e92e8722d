//! Interfaces consumed from the editing host and the decoration painter.
//!
//! The core never talks to an editor directly. Everything it needs from one
//! goes through [`EditorHost`]; everything it shows goes through
//! [`DecorationPainter`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EditResult;
use crate::text::TextRange;

/// Logging target for [`LogPainter`].
const LOG_TARGET: &str = "rangekeeper::paint";

/// Host-side identifier of an open document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Text and version of a document read at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub version: u64,
}

/// The editing host.
///
/// Implementations must make `commit_text` atomic: it either replaces the
/// text and returns the next version, or fails with
/// [`EditError::VersionConflict`](crate::error::EditError::VersionConflict)
/// and changes nothing.
pub trait EditorHost: Send + Sync {
    /// Read the current text and version.
    fn snapshot(&self, id: &DocumentId) -> EditResult<Snapshot>;

    /// Language of the document, if the host knows it.
    fn language_id(&self, id: &DocumentId) -> EditResult<Option<String>>;

    /// Replace the text if the document is still at `expected_version`.
    fn commit_text(&self, id: &DocumentId, text: String, expected_version: u64)
    -> EditResult<u64>;

    /// Current selections; empty ranges are plain cursors.
    fn selections(&self, id: &DocumentId) -> EditResult<Vec<TextRange>>;

    fn set_selections(&self, id: &DocumentId, selections: Vec<TextRange>) -> EditResult<()>;
}

/// Visual style of a transient highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecorationStyle {
    /// Text an action just inserted.
    JustAdded,
    /// Text an action is about to read.
    Referenced,
}

/// Fire-and-forget decoration painting.
pub trait DecorationPainter: Send + Sync {
    /// Show `ranges` in `style`, replacing whatever that style showed before.
    fn paint_ranges(&self, style: DecorationStyle, document: &DocumentId, ranges: &[TextRange]);

    fn clear_ranges(&self, style: DecorationStyle, document: &DocumentId);
}

/// Painter for headless use that only logs what it would show.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPainter;

impl DecorationPainter for LogPainter {
    fn paint_ranges(&self, style: DecorationStyle, document: &DocumentId, ranges: &[TextRange]) {
        log::debug!(
            target: LOG_TARGET,
            "paint {:?} on {}: {:?}",
            style,
            document,
            ranges
        );
    }

    fn clear_ranges(&self, style: DecorationStyle, document: &DocumentId) {
        log::debug!(target: LOG_TARGET, "clear {:?} on {}", style, document);
    }
}
