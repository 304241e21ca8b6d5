//! Editable UTF-8 text document core.
//!
//! Three structures compose into [`Document`]: a skip-list [`rope::Rope`]
//! for byte storage, a [`line_index::LineIndex`] mapping newline positions
//! to line numbers, and an [`interval_tree::IntervalTree`] of attributed
//! spans.

pub mod cursor;
pub mod document;
pub mod error;
pub mod interval_tree;
pub mod line_index;
pub mod rope;

pub use cursor::Cursor;
pub use document::{AttrHandle, Document};
pub use error::{DocError, DocResult};
pub use rope::Rope;
