//! Text primitives shared by the edit core and the actions.
//!
//! This module provides:
//! - [`TextRange`], the half-open byte range every edit and tracked range uses
//! - [`LineIndex`], line lookup over a document's text

pub mod position;
mod range;

pub use position::{LineIndex, compute_line_starts};
pub use range::{ParseRangeError, TextRange};
