use crate::document::Document;
use crate::edit::delta::{Checkpoint, DeltaTable};
use crate::edit::model::Edit;
use crate::error::{EditError, EditResult};
use crate::text::TextRange;

/// Logging target for edit application.
const LOG_TARGET: &str = "rangekeeper::apply";

/// Commits a batch of edits as one mutation.
pub struct EditApplier;

impl EditApplier {
    /// Splice `edits` into `text` without touching any document.
    ///
    /// Edits are ordered by source offset; edits sharing an offset keep the
    /// order they were given in. Fails before producing any output if an
    /// edit range is invalid for `text` or two source spans overlap.
    pub fn splice(text: &str, edits: &[Edit]) -> EditResult<(String, DeltaTable)> {
        for edit in edits {
            edit.range.validate(text)?;
        }

        let mut ordered: Vec<&Edit> = edits.iter().collect();
        ordered.sort_by_key(|edit| edit.source_span().start);
        check_overlaps(&ordered)?;

        let inserted: usize = edits.iter().map(|edit| edit.text.len()).sum();
        let mut output = String::with_capacity(text.len() + inserted);
        let mut deltas = DeltaTable::with_capacity(ordered.len());
        let mut copied_up_to = 0;

        for edit in ordered {
            let span = edit.source_span();
            if span.start > copied_up_to {
                output.push_str(&text[copied_up_to..span.start]);
            }
            let new_start = output.len();
            output.push_str(&edit.text);
            deltas.push(Checkpoint {
                original: span,
                inserted: TextRange::new(new_start, output.len()),
                is_replace: edit.is_replace,
            });
            copied_up_to = copied_up_to.max(span.end);
        }
        output.push_str(&text[copied_up_to..]);

        Ok((output, deltas))
    }

    /// Apply `edits` to `document`, advancing its version exactly once.
    ///
    /// Nothing is written when an error is returned.
    pub fn apply(document: &mut Document, edits: &[Edit]) -> EditResult<DeltaTable> {
        let expected_version = document.version();
        let (text, deltas) = Self::splice(document.text(), edits)?;
        let version = document.commit(text, expected_version)?;

        log::trace!(
            target: LOG_TARGET,
            "Applied {} edit(s), net delta {}, now at version {}",
            edits.len(),
            deltas.total_delta(),
            version
        );

        Ok(deltas)
    }
}

/// Reject source spans that share text.
///
/// `ordered` is sorted by start offset. Insertions never conflict with each
/// other or with the edges of a deleted span, only with its interior.
fn check_overlaps(ordered: &[&Edit]) -> EditResult<()> {
    let mut last_deleted: Option<TextRange> = None;

    for edit in ordered {
        let span = edit.source_span();
        if let Some(deleted) = last_deleted {
            let overlaps = if span.is_empty() {
                deleted.start < span.start && span.start < deleted.end
            } else {
                deleted.end > span.start
            };
            if overlaps {
                return Err(EditError::overlapping(deleted, span));
            }
        }
        if !span.is_empty() {
            last_deleted = Some(span);
        }
    }

    Ok(())
}
