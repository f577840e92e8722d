use crate::document::Document;
use crate::error::{EditError, EditResult};
use crate::host::{DocumentId, EditorHost, Snapshot};
use crate::text::TextRange;
use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use std::ops::Deref;

struct StoredDocument {
    document: Document,
    selections: Vec<TextRange>,
}

// In-memory editing host: documents plus their selections.
pub struct DocumentStore {
    documents: DashMap<DocumentId, StoredDocument>,
}

pub struct DocumentHandle<'a> {
    inner: Ref<'a, DocumentId, StoredDocument>,
}

impl<'a> DocumentHandle<'a> {
    fn new(inner: Ref<'a, DocumentId, StoredDocument>) -> Self {
        Self { inner }
    }
}

impl<'a> Deref for DocumentHandle<'a> {
    type Target = Document;

    fn deref(&self) -> &Self::Target {
        &self.inner.document
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<DocumentId>, text: String, language_id: Option<String>) {
        let document = match language_id {
            Some(lang) => Document::new(text).with_language(lang),
            None => Document::new(text),
        };

        self.documents.insert(
            id.into(),
            StoredDocument {
                document,
                selections: Vec::new(),
            },
        );
    }

    pub fn get(&self, id: &DocumentId) -> Option<DocumentHandle<'_>> {
        self.documents.get(id).map(DocumentHandle::new)
    }

    pub fn get_document_text(&self, id: &DocumentId) -> Option<String> {
        self.documents
            .get(id)
            .map(|stored| stored.document.text().to_string())
    }

    /// Overwrite the text as another author would, advancing the version.
    ///
    /// Selections are dropped since they no longer refer to this text.
    pub fn replace_text(&self, id: &DocumentId, text: String) -> EditResult<u64> {
        let mut stored = self
            .documents
            .get_mut(id)
            .ok_or_else(|| EditError::document_not_found(id.as_str()))?;
        let version = stored.document.version();
        stored.selections.clear();
        stored.document.commit(text, version)
    }

    pub fn remove(&self, id: &DocumentId) -> Option<Document> {
        self.documents.remove(id).map(|(_, stored)| stored.document)
    }
}

impl EditorHost for DocumentStore {
    fn snapshot(&self, id: &DocumentId) -> EditResult<Snapshot> {
        let stored = self
            .documents
            .get(id)
            .ok_or_else(|| EditError::document_not_found(id.as_str()))?;
        Ok(Snapshot {
            text: stored.document.text().to_string(),
            version: stored.document.version(),
        })
    }

    fn language_id(&self, id: &DocumentId) -> EditResult<Option<String>> {
        let stored = self
            .documents
            .get(id)
            .ok_or_else(|| EditError::document_not_found(id.as_str()))?;
        Ok(stored.document.language_id().map(String::from))
    }

    fn commit_text(
        &self,
        id: &DocumentId,
        text: String,
        expected_version: u64,
    ) -> EditResult<u64> {
        let mut stored = self
            .documents
            .get_mut(id)
            .ok_or_else(|| EditError::document_not_found(id.as_str()))?;
        stored.document.commit(text, expected_version)
    }

    fn selections(&self, id: &DocumentId) -> EditResult<Vec<TextRange>> {
        let stored = self
            .documents
            .get(id)
            .ok_or_else(|| EditError::document_not_found(id.as_str()))?;
        Ok(stored.selections.clone())
    }

    fn set_selections(&self, id: &DocumentId, selections: Vec<TextRange>) -> EditResult<()> {
        let mut stored = self
            .documents
            .get_mut(id)
            .ok_or_else(|| EditError::document_not_found(id.as_str()))?;
        for selection in &selections {
            selection.validate(stored.document.text())?;
        }
        stored.selections = selections;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get_document() {
        let store = DocumentStore::new();
        let id = DocumentId::new("file:///test.txt");
        let text = "hello world".to_string();

        store.insert(id.clone(), text.clone(), None);
        let doc = store.get(&id).unwrap();
        assert_eq!(doc.text(), &text);
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_commit_requires_current_version() {
        let store = DocumentStore::new();
        let id = DocumentId::new("file:///test.rs");
        store.insert(id.clone(), "fn main() {}".to_string(), Some("rust".to_string()));

        assert_eq!(store.commit_text(&id, "fn a() {}".to_string(), 0).unwrap(), 1);
        let err = store.commit_text(&id, "fn b() {}".to_string(), 0).unwrap_err();
        assert!(matches!(
            err,
            EditError::VersionConflict {
                expected: 0,
                actual: 1
            }
        ));
        assert_eq!(store.get_document_text(&id).unwrap(), "fn a() {}");
        assert_eq!(store.language_id(&id).unwrap().as_deref(), Some("rust"));
    }

    #[test]
    fn test_replace_text_bumps_version_and_drops_selections() {
        let store = DocumentStore::new();
        let id = DocumentId::new("doc");
        store.insert(id.clone(), "abc".to_string(), None);
        store
            .set_selections(&id, vec![TextRange::new(0, 1)])
            .unwrap();

        assert_eq!(store.replace_text(&id, "xyz!".to_string()).unwrap(), 1);
        assert!(store.selections(&id).unwrap().is_empty());
        assert_eq!(store.snapshot(&id).unwrap().version, 1);
    }

    #[test]
    fn test_set_selections_validates_ranges() {
        let store = DocumentStore::new();
        let id = DocumentId::new("doc");
        store.insert(id.clone(), "abc".to_string(), None);

        assert!(matches!(
            store.set_selections(&id, vec![TextRange::new(1, 9)]),
            Err(EditError::InvalidRange { .. })
        ));
        assert!(store.selections(&id).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_document() {
        let store = DocumentStore::new();
        let id = DocumentId::new("missing");
        assert!(matches!(
            store.snapshot(&id),
            Err(EditError::DocumentNotFound { .. })
        ));
        assert!(store.remove(&id).is_none());
    }
}
