pub mod actions;
pub mod config;
pub mod document;
pub mod edit;
pub mod error;
pub mod feedback;
pub mod host;
pub mod substitute;
pub mod text;

pub use document::{Document, DocumentStore};
pub use edit::{
    BatchOutcome, BoundaryPolicy, DeltaTable, EdgeBehavior, Edit, EditApplier,
    PendingEditController, RangeBundle, RangeTracker, TrackedRange,
};
pub use error::{EditError, EditResult};
pub use feedback::FlashScheduler;
pub use host::{DecorationPainter, DecorationStyle, DocumentId, EditorHost, LogPainter};
pub use substitute::TokenSubstituter;
pub use text::TextRange;
