//! Error handling types for rangekeeper
//!
//! Every fallible operation in the crate returns [`EditResult`]. The core
//! surfaces these errors to its caller and never logs them itself.

use thiserror::Error;

use crate::text::TextRange;

/// Comprehensive error type for batch edits and the actions built on them
#[derive(Debug, Error)]
pub enum EditError {
    /// Two edits in one batch touch the same source text
    #[error("Overlapping edits: {first} and {second}")]
    OverlappingEdits { first: TextRange, second: TextRange },

    /// The document changed between snapshot and commit
    #[error("Document version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    /// A tracked or edit range is inverted, out of bounds, or splits a character
    #[error("Invalid range {range} for document of length {len}")]
    InvalidRange { range: TextRange, len: usize },

    /// A required setting is absent
    #[error("Missing configuration: `{setting}` is not set ({hint})")]
    MissingConfiguration { setting: String, hint: String },

    /// The host does not know the document
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// An action received the wrong number of targets
    #[error("Expected {expected} target(s), got {actual}")]
    TargetCount { expected: usize, actual: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for edit operations
pub type EditResult<T> = Result<T, EditError>;

/// Helper functions for common error patterns
impl EditError {
    /// Create an overlapping edits error
    pub fn overlapping(first: TextRange, second: TextRange) -> Self {
        EditError::OverlappingEdits { first, second }
    }

    /// Create a version conflict error
    pub fn version_conflict(expected: u64, actual: u64) -> Self {
        EditError::VersionConflict { expected, actual }
    }

    /// Create an invalid range error
    pub fn invalid_range(range: TextRange, len: usize) -> Self {
        EditError::InvalidRange { range, len }
    }

    /// Create a missing configuration error
    pub fn missing_configuration(setting: impl Into<String>, hint: impl Into<String>) -> Self {
        EditError::MissingConfiguration {
            setting: setting.into(),
            hint: hint.into(),
        }
    }

    /// Create a document not found error
    pub fn document_not_found(id: impl Into<String>) -> Self {
        EditError::DocumentNotFound { id: id.into() }
    }

    /// Whether re-snapshotting and re-issuing the batch can succeed.
    ///
    /// Only a version conflict qualifies: every other error is caused by the
    /// request itself and fails again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EditError::VersionConflict { .. })
    }
}
