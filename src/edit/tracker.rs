//! Rebasing of tracked ranges across one batch of edits.
//!
//! Each boundary is mapped on its own by walking the batch's checkpoints in
//! source order:
//!
//! - checkpoints wholly before the boundary shift it by their delta
//! - text inserted exactly at the boundary is taken into the range when that
//!   side is open and left out when it is closed: an open start stays before
//!   the insertion and an open end moves past it, closed sides do the reverse
//! - a boundary strictly inside deleted text is clipped onto the replacement:
//!   a start to its beginning, an end to its end
//! - a start at the beginning of deleted text maps to the beginning of the
//!   replacement; an end there stays before it (closed) or takes it in (open)
//! - a boundary at the end of deleted text lies after the replacement
//!
//! An empty range has both boundaries on one offset. With either side open
//! it takes in text inserted there. With both sides closed it moves past a
//! plain insertion like a caret, but stays before a zero-width edit flagged
//! as a replacement.
//!
//! Ranges are independent of each other, so large sets are remapped on the
//! rayon pool.

use rayon::prelude::*;

use crate::edit::delta::{Checkpoint, DeltaTable, apply_delta};
use crate::edit::policy::{BoundaryPolicy, EdgeBehavior, TrackedRange};
use crate::text::TextRange;

/// Number of ranges from which remapping is spread over worker threads.
const PARALLEL_THRESHOLD: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

/// One boundary being mapped.
#[derive(Clone, Copy, Debug)]
struct Boundary {
    side: Side,
    edge: EdgeBehavior,
    /// Both boundaries of a closed empty range, mapped as one.
    caret: bool,
}

impl Boundary {
    fn new(side: Side, edge: EdgeBehavior) -> Self {
        Self {
            side,
            edge,
            caret: false,
        }
    }

    fn caret() -> Self {
        Self {
            side: Side::Start,
            edge: EdgeBehavior::Closed,
            caret: true,
        }
    }

    /// Whether the boundary ends up after text inserted exactly at it.
    fn passes(&self, checkpoint: &Checkpoint) -> bool {
        match (self.side, self.edge) {
            (Side::Start, EdgeBehavior::Closed) => !(self.caret && checkpoint.is_replace),
            (Side::End, EdgeBehavior::Open) => true,
            (Side::Start, EdgeBehavior::Open) | (Side::End, EdgeBehavior::Closed) => false,
        }
    }
}

/// Maps ranges of the old document onto the new one.
pub struct RangeTracker<'a> {
    deltas: &'a DeltaTable,
}

impl<'a> RangeTracker<'a> {
    pub fn new(deltas: &'a DeltaTable) -> Self {
        Self { deltas }
    }

    /// Rebase one range; its policy is kept.
    ///
    /// The result is never inverted.
    pub fn remap(&self, tracked: &TrackedRange) -> TrackedRange {
        if self.deltas.is_empty() {
            return *tracked;
        }

        let TrackedRange { range, policy } = *tracked;
        let range = if range.is_empty() {
            self.remap_empty(range.start, policy)
        } else {
            let start = self.remap_offset(range.start, Boundary::new(Side::Start, policy.start));
            let end = self.remap_offset(range.end, Boundary::new(Side::End, policy.end));
            TextRange::new(start, end.max(start))
        };

        TrackedRange::new(range, policy)
    }

    /// Rebase every range, preserving order.
    pub fn remap_all(&self, ranges: &[TrackedRange]) -> Vec<TrackedRange> {
        if ranges.len() >= PARALLEL_THRESHOLD {
            ranges.par_iter().map(|tracked| self.remap(tracked)).collect()
        } else {
            ranges.iter().map(|tracked| self.remap(tracked)).collect()
        }
    }

    fn remap_empty(&self, offset: usize, policy: BoundaryPolicy) -> TextRange {
        if policy == BoundaryPolicy::CLOSED_CLOSED {
            return TextRange::point(self.remap_offset(offset, Boundary::caret()));
        }

        let start = self.remap_offset(offset, Boundary::new(Side::Start, EdgeBehavior::Open));
        let end = self.remap_offset(offset, Boundary::new(Side::End, EdgeBehavior::Open));
        TextRange::new(start, end.max(start))
    }

    fn remap_offset(&self, offset: usize, boundary: Boundary) -> usize {
        let mut offset = offset;
        let mut delta: i64 = 0;

        for checkpoint in self.deltas.checkpoints() {
            let original = checkpoint.original;

            if original.start > offset {
                break;
            }
            if original.end < offset {
                delta += checkpoint.length_delta();
                continue;
            }

            if checkpoint.is_insertion() {
                // Insertion exactly at `offset`
                if boundary.passes(checkpoint) {
                    delta += checkpoint.length_delta();
                    continue;
                }
                return checkpoint.inserted.start;
            }

            if original.end == offset {
                // Replacement lies entirely before `offset`
                delta += checkpoint.length_delta();
                continue;
            }

            if original.start < offset {
                return match boundary.side {
                    Side::Start => checkpoint.inserted.start,
                    Side::End => checkpoint.inserted.end,
                };
            }

            // Deleted text begins at `offset`
            match (boundary.side, boundary.edge) {
                (Side::End, EdgeBehavior::Open) => {
                    offset = original.end;
                    delta += checkpoint.length_delta();
                }
                _ => return checkpoint.inserted.start,
            }
        }

        apply_delta(offset, delta)
    }
}
