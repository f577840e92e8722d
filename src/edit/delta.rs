use crate::text::TextRange;

/// Where one edit of a batch moved text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Text removed from the old document (zero-width for an insertion).
    pub original: TextRange,
    /// Text written into the new document.
    pub inserted: TextRange,
    /// The edit was flagged as a replacement. Only matters for zero-width
    /// edits, which an adjacent cursor does not follow.
    pub is_replace: bool,
}

impl Checkpoint {
    /// Offset of the edit in the old document.
    pub fn original_offset(&self) -> usize {
        self.original.start
    }

    /// Offset of the edit in the new document.
    pub fn new_offset(&self) -> usize {
        self.inserted.start
    }

    /// Calculate the byte delta (positive for insertion, negative for deletion).
    pub fn length_delta(&self) -> i64 {
        self.inserted.len() as i64 - self.original.len() as i64
    }

    /// Check if this is a zero-length (insertion-only) edit.
    pub fn is_insertion(&self) -> bool {
        self.original.is_empty()
    }
}

/// Ordered checkpoints of one batch, sorted by original offset with
/// non-overlapping source spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaTable {
    checkpoints: Vec<Checkpoint>,
}

impl DeltaTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            checkpoints: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, checkpoint: Checkpoint) {
        debug_assert!(
            self.checkpoints
                .last()
                .is_none_or(|last| last.original.start <= checkpoint.original.start),
            "checkpoints must be pushed in source order"
        );
        self.checkpoints.push(checkpoint);
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Net change in document length.
    pub fn total_delta(&self) -> i64 {
        self.checkpoints.iter().map(Checkpoint::length_delta).sum()
    }
}

/// Apply a signed delta to a byte position with overflow protection.
///
/// Uses saturating arithmetic to prevent overflow/underflow:
/// - Clamps result to 0 if delta would make it negative
/// - Uses i64 internally to handle large negative deltas safely
pub(crate) fn apply_delta(position: usize, delta: i64) -> usize {
    (position as i64).saturating_add(delta).max(0) as usize
}
