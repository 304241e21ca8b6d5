//! Error kinds surfaced by the document core.
//!
//! `DuplicateNewline` and allocation failure are not represented here: the
//! former is an internal invariant guarded by `debug_assert!` inside
//! [`crate::line_index::LineIndex`] and never escapes [`crate::Document`];
//! the latter is whatever the global allocator already does on OOM.

use thiserror::Error;

/// Errors a caller of the document core can observe.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocError {
    /// The input byte slice was not valid UTF-8. No mutation took place.
    #[error("invalid utf-8 at byte offset {byte_offset}")]
    InvalidUtf8 {
        /// Byte offset of the first malformed byte, as reported by
        /// [`std::str::Utf8Error::valid_up_to`].
        byte_offset: usize,
    },

    /// A caller-supplied position or range was invalid in a way that cannot
    /// be silently clamped (for example, `start > end` for an interval).
    #[error("position out of range")]
    OutOfRange,
}

pub type DocResult<T> = Result<T, DocError>;
