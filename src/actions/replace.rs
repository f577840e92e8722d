use crate::actions::{MarkedRange, Target, ThatMark, group_by_document};
use crate::edit::{BoundaryPolicy, Edit, PendingEditController, RangeBundle, TrackedRange};
use crate::error::{EditError, EditResult};
use crate::host::EditorHost;

/// Replace each target with the text at the same position in `texts`.
///
/// One batch per document. The host's selections are rebased along, and the
/// returned that-mark covers the replacement texts in target order.
pub fn replace<H: EditorHost + ?Sized>(
    host: &H,
    targets: &[Target],
    texts: &[String],
) -> EditResult<ThatMark> {
    if targets.len() != texts.len() {
        return Err(EditError::TargetCount {
            expected: texts.len(),
            actual: targets.len(),
        });
    }

    let mut marks: Vec<Option<MarkedRange>> = vec![None; targets.len()];

    for (document, indices) in group_by_document(targets) {
        let edits: Vec<Edit> = indices
            .iter()
            .map(|&i| Edit::replace(targets[i].range, texts[i].as_str()))
            .collect();

        let replaced = RangeBundle::from_leaves(indices.iter().map(|&i| {
            TrackedRange::new(targets[i].range, BoundaryPolicy::CLOSED_CLOSED)
        }));
        let selections = RangeBundle::from_leaves(
            host.selections(&document)?
                .into_iter()
                .map(|range| TrackedRange::new(range, BoundaryPolicy::CLOSED_CLOSED)),
        );

        let outcome =
            PendingEditController::batch_on_host(host, &document, &edits, &[replaced, selections])?;

        host.set_selections(&document, outcome.bundles[1].ranges())?;
        for (&i, range) in indices.iter().zip(outcome.bundles[0].ranges()) {
            marks[i] = Some(MarkedRange {
                document: document.clone(),
                range,
            });
        }
    }

    Ok(marks.into_iter().flatten().collect())
}
