//! Higher-level operations built on the batch entry point.
//!
//! Actions decide *what* to edit; the batch keeps every range they care
//! about (selections, delimiters, placeholders) in step with the edit.

mod replace;
mod snippet;
mod wrap;

use serde::{Deserialize, Serialize};

use crate::host::DocumentId;
use crate::text::TextRange;

pub use replace::replace;
pub use snippet::{GeneratedSnippet, SNIPPET_FILE_SUFFIX, SnippetRequest, generate_snippet};
pub use wrap::wrap;

/// A range an action operates on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub document: DocumentId,
    pub range: TextRange,
    /// Only the delimiters around the range are selected, not its content.
    #[serde(default)]
    pub exclude_interior: bool,
}

impl Target {
    pub fn new(document: impl Into<DocumentId>, range: TextRange) -> Self {
        Self {
            document: document.into(),
            range,
            exclude_interior: false,
        }
    }

    pub fn excluding_interior(mut self) -> Self {
        self.exclude_interior = true;
        self
    }
}

/// A range in a document, as left behind by an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedRange {
    pub document: DocumentId,
    pub range: TextRange,
}

/// What an action last touched, for follow-up commands to refer to.
pub type ThatMark = Vec<MarkedRange>;

/// Indices of `targets` grouped by document, documents in first-seen order.
fn group_by_document(targets: &[Target]) -> Vec<(DocumentId, Vec<usize>)> {
    let mut groups: Vec<(DocumentId, Vec<usize>)> = Vec::new();
    for (index, target) in targets.iter().enumerate() {
        match groups.iter_mut().find(|(id, _)| id == &target.document) {
            Some((_, indices)) => indices.push(index),
            None => groups.push((target.document.clone(), vec![index])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_document_keeps_first_seen_order() {
        let targets = [
            Target::new("b", TextRange::new(0, 1)),
            Target::new("a", TextRange::new(0, 1)),
            Target::new("b", TextRange::new(2, 3)),
        ];
        let groups = group_by_document(&targets);
        assert_eq!(
            groups,
            vec![
                (DocumentId::new("b"), vec![0, 2]),
                (DocumentId::new("a"), vec![1]),
            ]
        );
    }
}
