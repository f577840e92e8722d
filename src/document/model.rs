use crate::error::{EditError, EditResult};

/// Owned text buffer with an explicit version counter.
///
/// The text only changes through [`Document::commit`], which the edit
/// applier calls once per batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    text: String,
    version: u64,
    language_id: Option<String>,
}

impl Document {
    /// Create a new document with just text, at version 0
    pub fn new(text: String) -> Self {
        Self::with_version(text, 0)
    }

    /// Create a new document with version
    pub fn with_version(text: String, version: u64) -> Self {
        Self {
            text,
            version,
            language_id: None,
        }
    }

    /// Set the language ID
    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = Some(language_id.into());
        self
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the text content as owned String
    pub fn into_text(self) -> String {
        self.text
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the language ID
    pub fn language_id(&self) -> Option<&str> {
        self.language_id.as_deref()
    }

    /// Replace the text if the document is still at `expected_version`.
    ///
    /// Returns the new version, which is always `expected_version + 1`.
    pub(crate) fn commit(&mut self, text: String, expected_version: u64) -> EditResult<u64> {
        if self.version != expected_version {
            return Err(EditError::version_conflict(expected_version, self.version));
        }
        self.text = text;
        self.version += 1;
        Ok(self.version)
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the document is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
