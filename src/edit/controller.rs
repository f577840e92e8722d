use serde::Serialize;

use crate::document::Document;
use crate::edit::applier::EditApplier;
use crate::edit::bundle::RangeBundle;
use crate::edit::model::Edit;
use crate::edit::policy::TrackedRange;
use crate::edit::tracker::RangeTracker;
use crate::error::EditResult;
use crate::host::{DocumentId, EditorHost};

/// Logging target for batch orchestration.
const LOG_TARGET: &str = "rangekeeper::batch";

/// Result of one batch: the new text and version, and every bundle rebased
/// onto them in the order it was passed in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub text: String,
    pub version: u64,
    pub bundles: Vec<RangeBundle>,
}

/// Entry point for higher-level operations that edit a document and need
/// ranges to survive the edit.
pub struct PendingEditController;

impl PendingEditController {
    /// Apply `edits` to `document` and rebase every range in `bundles`.
    ///
    /// Runs without yielding: validation, the single commit and the remap of
    /// all bundles happen against one document state. On error the document
    /// is left exactly as it was.
    pub fn batch(
        document: &mut Document,
        edits: &[Edit],
        bundles: &[RangeBundle],
    ) -> EditResult<BatchOutcome> {
        let flat: Vec<TrackedRange> = bundles
            .iter()
            .flat_map(|bundle| bundle.leaves())
            .copied()
            .collect();
        for tracked in &flat {
            tracked.range.validate(document.text())?;
        }

        let deltas = EditApplier::apply(document, edits)?;
        let remapped = RangeTracker::new(&deltas).remap_all(&flat);

        // One remapped range per flattened leaf, consumed in the same order
        debug_assert_eq!(flat.len(), remapped.len());

        let mut position = 0;
        let bundles: Vec<RangeBundle> = bundles
            .iter()
            .map(|bundle| {
                bundle.map_leaves(&mut |_| {
                    let tracked = remapped[position];
                    position += 1;
                    tracked
                })
            })
            .collect();

        log::debug!(
            target: LOG_TARGET,
            "Batch of {} edit(s) rebased {} range(s) in {} bundle(s), version {}",
            edits.len(),
            flat.len(),
            bundles.len(),
            document.version()
        );

        Ok(BatchOutcome {
            text: document.text().to_string(),
            version: document.version(),
            bundles,
        })
    }

    /// Run [`batch`](Self::batch) against a document held by `host`.
    ///
    /// The batch is computed on a snapshot and committed with the snapshot's
    /// version as the expected one, so a document that moved in between is
    /// reported as a retryable
    /// [`VersionConflict`](crate::error::EditError::VersionConflict) and left
    /// alone.
    pub fn batch_on_host<H: EditorHost + ?Sized>(
        host: &H,
        id: &DocumentId,
        edits: &[Edit],
        bundles: &[RangeBundle],
    ) -> EditResult<BatchOutcome> {
        let snapshot = host.snapshot(id)?;
        let mut scratch = Document::with_version(snapshot.text, snapshot.version);
        let mut outcome = Self::batch(&mut scratch, edits, bundles)?;

        outcome.version = host.commit_text(id, scratch.into_text(), snapshot.version)?;
        Ok(outcome)
    }

    /// Apply `edits` on `host` without tracking anything.
    pub fn apply_edits<H: EditorHost + ?Sized>(
        host: &H,
        id: &DocumentId,
        edits: &[Edit],
    ) -> EditResult<u64> {
        Self::batch_on_host(host, id, edits, &[]).map(|outcome| outcome.version)
    }
}
