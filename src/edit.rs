//! Batch edits with range rebasing.
//!
//! A batch applies a list of [`Edit`]s to a [`Document`](crate::document::Document)
//! in one atomic commit and, against that same commit, recomputes where every
//! [`TrackedRange`] of the caller's [`RangeBundle`]s now lies.
//!
//! ```text
//! bundles ──flatten──► [TrackedRange] ──┐
//!                                       ├─► RangeTracker ──rebuild──► bundles'
//! edits ──► EditApplier ──► DeltaTable ─┘
//!               │
//!               └─► Document (text', version + 1)
//! ```

mod applier;
mod bundle;
mod controller;
mod delta;
mod model;
mod policy;
mod tracker;

pub use applier::EditApplier;
pub use bundle::RangeBundle;
pub use controller::{BatchOutcome, PendingEditController};
pub use delta::{Checkpoint, DeltaTable};
pub use model::Edit;
pub use policy::{BoundaryPolicy, EdgeBehavior, ParsePolicyError, TrackedRange};
pub use tracker::RangeTracker;
