use crate::actions::{MarkedRange, Target, ThatMark, group_by_document};
use crate::edit::{BoundaryPolicy, Edit, PendingEditController, RangeBundle, TrackedRange};
use crate::error::EditResult;
use crate::feedback::FlashScheduler;
use crate::host::{DecorationStyle, EditorHost};
use crate::text::TextRange;

/// Logging target for the wrap action.
const LOG_TARGET: &str = "rangekeeper::wrap";

/// Surround each target with `left` and `right`.
///
/// A target whose interior is excluded already *is* a delimiter, and
/// wrapping it again makes no sense: it is replaced instead, alternating
/// `left` and `right` over those targets. Each document gets one batch for
/// both kinds. The host's selections keep selecting the content they had,
/// and the new delimiters are flashed.
///
/// The that-mark lists replaced targets first, then wrapped ones, each
/// covering its delimiters.
pub fn wrap<H: EditorHost + ?Sized>(
    host: &H,
    flash: &FlashScheduler,
    targets: &[Target],
    left: &str,
    right: &str,
) -> EditResult<ThatMark> {
    let mut replacement_texts: Vec<Option<&str>> = vec![None; targets.len()];
    for (n, (i, _)) in targets
        .iter()
        .enumerate()
        .filter(|(_, target)| target.exclude_interior)
        .enumerate()
    {
        replacement_texts[i] = Some(if n % 2 == 0 { left } else { right });
    }

    let mut replaced_marks: Vec<Option<MarkedRange>> = vec![None; targets.len()];
    let mut wrapped_marks: Vec<Option<MarkedRange>> = vec![None; targets.len()];

    for (document, indices) in group_by_document(targets) {
        let (replaced, wrapped): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| replacement_texts[i].is_some());

        let mut edits = Vec::with_capacity(replaced.len() + wrapped.len() * 2);
        for &i in &replaced {
            if let Some(text) = replacement_texts[i] {
                edits.push(Edit::replace(targets[i].range, text));
            }
        }
        for &i in &wrapped {
            let range = targets[i].range;
            edits.push(Edit::insert(range.start, left));
            // A cursor at the end stays before the right delimiter
            edits.push(Edit::replace(TextRange::point(range.end), right));
        }

        let delimiters = RangeBundle::from_leaves(wrapped.iter().flat_map(|&i| {
            let range = targets[i].range;
            [
                TrackedRange::new(TextRange::point(range.start), BoundaryPolicy::OPEN_CLOSED),
                TrackedRange::new(TextRange::point(range.end), BoundaryPolicy::CLOSED_OPEN),
            ]
        }));
        let selections = RangeBundle::from_leaves(
            host.selections(&document)?
                .into_iter()
                .map(|range| TrackedRange::new(range, BoundaryPolicy::CLOSED_CLOSED)),
        );
        let marked = |indices: &[usize], policy: BoundaryPolicy| {
            RangeBundle::from_leaves(
                indices
                    .iter()
                    .map(|&i| TrackedRange::new(targets[i].range, policy)),
            )
        };

        let outcome = PendingEditController::batch_on_host(
            host,
            &document,
            &edits,
            &[
                delimiters,
                selections,
                marked(&replaced, BoundaryPolicy::CLOSED_CLOSED),
                marked(&wrapped, BoundaryPolicy::OPEN_OPEN),
            ],
        )?;

        host.set_selections(&document, outcome.bundles[1].ranges())?;
        flash.flash(
            DecorationStyle::JustAdded,
            &document,
            &outcome.bundles[0].ranges(),
        );

        for (&i, range) in replaced.iter().zip(outcome.bundles[2].ranges()) {
            replaced_marks[i] = Some(MarkedRange {
                document: document.clone(),
                range,
            });
        }
        for (&i, range) in wrapped.iter().zip(outcome.bundles[3].ranges()) {
            wrapped_marks[i] = Some(MarkedRange {
                document: document.clone(),
                range,
            });
        }

        log::debug!(
            target: LOG_TARGET,
            "Wrapped {} and replaced {} target(s) in {}",
            wrapped.len(),
            replaced.len(),
            document
        );
    }

    Ok(replaced_marks
        .into_iter()
        .chain(wrapped_marks)
        .flatten()
        .collect())
}
