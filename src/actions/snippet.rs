//! Extract a target into a snippet file.
//!
//! Selections inside the target become numbered placeholders whose default
//! values are the selected texts. The document is left as it was found.

use std::path::PathBuf;

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::actions::{MarkedRange, Target, ThatMark};
use crate::config::Settings;
use crate::edit::{BoundaryPolicy, Edit, PendingEditController, RangeBundle, TrackedRange};
use crate::error::{EditError, EditResult};
use crate::feedback::FlashScheduler;
use crate::host::{DecorationStyle, EditorHost};
use crate::substitute::TokenSubstituter;
use crate::text::position::first_non_whitespace;
use crate::text::{LineIndex, TextRange};

/// Suffix appended to the snippet name to form its file name.
pub const SNIPPET_FILE_SUFFIX: &str = ".rangekeeper-snippets";

/// Language recorded when the host does not know the document's.
const DEFAULT_LANGUAGE: &str = "plaintext";

/// Logging target for snippet generation.
const LOG_TARGET: &str = "rangekeeper::snippet";

/// Answers to the prompts of snippet generation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnippetRequest {
    /// `None` when the user dismissed the name prompt.
    pub name: Option<String>,
    pub description: Option<String>,
}

impl SnippetRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSnippet {
    pub path: PathBuf,
    pub contents: String,
    pub that_mark: ThatMark,
}

/// Map serialized in insertion order.
struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct SnippetEntry<'a> {
    definitions: [SnippetDefinition<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    variables: OrderedMap<String>,
}

#[derive(Serialize)]
struct SnippetDefinition<'a> {
    scope: SnippetScope<'a>,
    body: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnippetScope<'a> {
    lang_ids: [&'a str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VariableDefinition<'a> {
    default_value: &'a str,
}

/// Turn the single target into a snippet file under the configured
/// snippets directory.
///
/// Returns `Ok(None)` without touching anything when the request carries no
/// name. The target count and the snippets directory are checked before any
/// edit is made.
pub fn generate_snippet<H: EditorHost + ?Sized>(
    host: &H,
    flash: &FlashScheduler,
    settings: &Settings,
    targets: &[Target],
    request: &SnippetRequest,
) -> EditResult<Option<GeneratedSnippet>> {
    let [target] = targets else {
        return Err(EditError::TargetCount {
            expected: 1,
            actual: targets.len(),
        });
    };
    let Some(name) = request.name.as_deref() else {
        return Ok(None);
    };
    let snippets_dir = settings.require_snippets_dir()?;

    let document = &target.document;
    let snapshot = host.snapshot(document)?;
    target.range.validate(&snapshot.text)?;

    flash.flash(DecorationStyle::Referenced, document, &[target.range]);

    let mut placeholders = Vec::new();
    for selection in host.selections(document)? {
        if !selection.is_empty() && target.range.contains_range(&selection) {
            selection.validate(&snapshot.text)?;
            placeholders.push(selection);
        }
    }
    let original_texts: Vec<String> = placeholders
        .iter()
        .map(|range| range.slice(&snapshot.text).to_string())
        .collect();

    let mut substituter = TokenSubstituter::new();
    let edits: Vec<Edit> = placeholders
        .iter()
        .enumerate()
        .map(|(i, range)| {
            Edit::replace(*range, substituter.reserve(format!("${}", i + 1), false))
        })
        .collect();
    let tracked = |range: TextRange| TrackedRange::new(range, BoundaryPolicy::CLOSED_CLOSED);
    let bundles = [
        RangeBundle::from_leaves(placeholders.iter().copied().map(tracked)),
        RangeBundle::leaf(tracked(target.range)),
    ];

    let outcome = PendingEditController::batch_on_host(host, document, &edits, &bundles)?;
    let body = snippet_body(&outcome.text, outcome.bundles[1].ranges()[0]);

    let restore: Vec<Edit> = outcome.bundles[0]
        .ranges()
        .into_iter()
        .zip(&original_texts)
        .map(|(range, text)| Edit::replace(range, text.as_str()))
        .collect();
    PendingEditController::apply_edits(host, document, &restore)?;

    let variables = original_texts
        .iter()
        .enumerate()
        .map(|(i, text)| -> EditResult<(String, String)> {
            let definition = serde_json::to_string(&VariableDefinition {
                default_value: text,
            })?;
            Ok((format!("${}", i + 1), substituter.reserve(definition, true)))
        })
        .collect::<EditResult<Vec<_>>>()?;

    let language = host.language_id(document)?;
    let entry = SnippetEntry {
        definitions: [SnippetDefinition {
            scope: SnippetScope {
                lang_ids: [language.as_deref().unwrap_or(DEFAULT_LANGUAGE)],
            },
            body: &body,
        }],
        description: request.description.as_deref(),
        variables: OrderedMap(variables),
    };
    let snippet = OrderedMap(vec![(name.to_string(), entry)]);
    let contents = substituter.resolve(&serde_json::to_string_pretty(&snippet)?);

    std::fs::create_dir_all(snippets_dir)?;
    let path = snippets_dir.join(format!("{name}{SNIPPET_FILE_SUFFIX}"));
    std::fs::write(&path, &contents)?;

    log::debug!(
        target: LOG_TARGET,
        "Wrote snippet `{}` with {} placeholder(s) to {}",
        name,
        placeholders.len(),
        path.display()
    );

    Ok(Some(GeneratedSnippet {
        path,
        contents,
        that_mark: vec![MarkedRange {
            document: document.clone(),
            range: target.range,
        }],
    }))
}

/// Lines of `range`, re-indented with tabs.
///
/// Each line keeps its content from the first non-whitespace character
/// (or the range start, on the first line) to its end (or the range end, on
/// the last line). Indentation becomes one tab per step the leading
/// whitespace grew or shrank relative to the previous line, never less than
/// zero tabs.
fn snippet_body(text: &str, range: TextRange) -> Vec<String> {
    let index = LineIndex::new(text);
    let first_line = index.line_of(range.start);
    let last_line = index.line_of(range.end);

    let mut lines = Vec::with_capacity(last_line - first_line + 1);
    let mut tabs: usize = 0;
    let mut previous_indent: Option<usize> = None;

    for line in first_line..=last_line {
        let content = index.line_text(line).unwrap_or_default();
        let indent = first_non_whitespace(content);

        if let Some(previous) = previous_indent {
            if indent > previous {
                tabs += 1;
            } else if indent < previous {
                tabs = tabs.saturating_sub(1);
            }
        }
        previous_indent = Some(indent);

        let start = if line == first_line {
            indent.max(index.column(range.start))
        } else {
            indent
        };
        let end = if line == last_line {
            content.len().min(index.column(range.end))
        } else {
            content.len()
        };

        let mut out = "\t".repeat(tabs);
        if start < end {
            out.push_str(content.get(start..end).unwrap_or_default());
        }
        lines.push(out);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStore;
    use crate::feedback::tests::{PaintEvent, RecordingPainter};
    use crate::host::DocumentId;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> Settings {
        Settings {
            snippets_dir: Some(dir.path().join("snippets")),
            ..Settings::default()
        }
    }

    #[test]
    fn test_body_reindents_with_tabs() {
        let text = "if x {\n    a();\n        b();\n    c();\n}\n";
        let body = snippet_body(text, TextRange::new(0, text.len() - 1));
        assert_eq!(body, vec!["if x {", "\ta();", "\t\tb();", "\tc();", "}"]);
    }

    #[test]
    fn test_body_clips_first_and_last_line() {
        let text = "let v = foo(\n  1,\n  2);";
        let start = text.find("foo").unwrap();
        let end = text.find(");").unwrap();
        let body = snippet_body(text, TextRange::new(start, end));
        assert_eq!(body, vec!["foo(", "\t1,", "\t2"]);
    }

    #[test]
    fn test_body_never_goes_below_zero_tabs() {
        let text = "    a\nb\n    c";
        let body = snippet_body(text, TextRange::new(0, text.len()));
        assert_eq!(body, vec!["a", "b", "\tc"]);
    }

    #[test]
    fn test_generate_snippet_writes_file_and_restores_text() {
        let store = DocumentStore::new();
        let id = DocumentId::new("main.rs");
        let text = "fn main() {\n    println!(\"hi\");\n}\n";
        store.insert(id.clone(), text.to_string(), Some("rust".to_string()));
        let quoted = text.find("\"hi\"").unwrap();
        store
            .set_selections(&id, vec![TextRange::new(quoted, quoted + 4)])
            .unwrap();

        let dir = TempDir::new().unwrap();
        let painter = Arc::new(RecordingPainter::default());
        let flash = FlashScheduler::immediate(painter.clone());
        let target = Target::new("main.rs", TextRange::new(0, text.len() - 1));

        let generated = generate_snippet(
            &store,
            &flash,
            &settings(&dir),
            &[target.clone()],
            &SnippetRequest::named("main"),
        )
        .unwrap()
        .unwrap();

        assert_eq!(store.get_document_text(&id).unwrap(), text);
        assert_eq!(generated.path, dir.path().join("snippets/main.rangekeeper-snippets"));
        assert_eq!(std::fs::read_to_string(&generated.path).unwrap(), generated.contents);
        assert!(generated.contents.contains(r#""\tprintln!($1);""#));
        assert!(generated.contents.contains(r#""$1": {"defaultValue":"\"hi\""}"#));
        assert!(!generated.contents.contains("description"));
        assert_eq!(generated.that_mark[0].range, target.range);
        assert_eq!(
            painter.events()[0],
            PaintEvent::Paint(DecorationStyle::Referenced, id, vec![target.range])
        );
    }

    #[test]
    fn test_missing_name_is_a_silent_cancel() {
        let store = DocumentStore::new();
        store.insert("doc", "text".to_string(), None);
        let painter = Arc::new(RecordingPainter::default());
        let flash = FlashScheduler::immediate(painter.clone());

        let result = generate_snippet(
            &store,
            &flash,
            &Settings::default(),
            &[Target::new("doc", TextRange::new(0, 4))],
            &SnippetRequest::default(),
        )
        .unwrap();
        assert!(result.is_none());
        assert!(painter.events().is_empty());
    }

    #[test]
    fn test_missing_snippets_dir_fails_before_editing() {
        let store = DocumentStore::new();
        let id = DocumentId::new("doc");
        store.insert(id.clone(), "text".to_string(), None);
        store.set_selections(&id, vec![TextRange::new(0, 2)]).unwrap();
        let flash = FlashScheduler::immediate(Arc::new(RecordingPainter::default()));

        let err = generate_snippet(
            &store,
            &flash,
            &Settings::default(),
            &[Target::new("doc", TextRange::new(0, 4))],
            &SnippetRequest::named("x"),
        )
        .unwrap_err();
        assert!(matches!(err, EditError::MissingConfiguration { .. }));
        assert_eq!(store.snapshot(&id).unwrap().version, 0);
    }

    #[test]
    fn test_exactly_one_target_required() {
        let store = DocumentStore::new();
        let flash = FlashScheduler::immediate(Arc::new(RecordingPainter::default()));

        let err = generate_snippet(
            &store,
            &flash,
            &Settings::default(),
            &[],
            &SnippetRequest::named("x"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EditError::TargetCount {
                expected: 1,
                actual: 0
            }
        ));
    }
}
