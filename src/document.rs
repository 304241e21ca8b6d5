//! [`Document`]: the text-document facade composing a [`Rope`], a
//! [`LineIndex`], and an [`IntervalTree`] of attributes into a single
//! coherent editable document.
//!
//! Insertion and deletion recompute the affected newline/attribute
//! positions via `shift` before re-scanning the edited span for new
//! newlines, and line lookups are expressed in terms of the line index's
//! rank queries.

use log::{debug, trace};

use crate::error::{DocError, DocResult};
use crate::interval_tree::{IntervalTree, SearchMode, SpanId};
use crate::line_index::LineIndex;
use crate::rope::Rope;

/// Handle to an attribute span previously added with
/// [`Document::add_attribute`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct AttrHandle(SpanId);

/// An editable UTF-8 text document: byte storage, line index, and attribute
/// spans kept in sync with every edit.
pub struct Document<A> {
    text: Rope,
    newlines: LineIndex,
    attrs: IntervalTree<A>,
}

impl<A> Default for Document<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Document<A> {
    /// An empty document.
    pub fn new() -> Self {
        Self { text: Rope::new(), newlines: LineIndex::new(), attrs: IntervalTree::new() }
    }

    /// A document pre-populated with `text`.
    pub fn from_str(text: &str) -> Self {
        let rope = Rope::from_utf8(text.as_bytes()).expect("&str is always valid UTF-8");
        let mut doc = Self { text: rope, newlines: LineIndex::new(), attrs: IntervalTree::new() };
        doc.mark_newlines(0, text);
        doc
    }

    /// A document pre-populated with `bytes`, rejected if not valid UTF-8.
    pub fn from_utf8(bytes: &[u8]) -> DocResult<Self> {
        let rope = Rope::from_utf8(bytes)?;
        let text = std::str::from_utf8(bytes).expect("Rope::from_utf8 already validated this");
        let mut doc = Self { text: rope, newlines: LineIndex::new(), attrs: IntervalTree::new() };
        doc.mark_newlines(0, text);
        Ok(doc)
    }

    fn mark_newlines(&mut self, pos: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            if ch == '\n' {
                debug_assert!(self.newlines.insert(pos + i), "duplicate newline at {}", pos + i);
            }
        }
    }

    /// Insert `text` at character position `pos`. No-ops without mutating if
    /// `text` is not valid UTF-8.
    pub fn insert(&mut self, pos: usize, text: &[u8]) -> DocResult<()> {
        trace!(target: "textdoc::document", "insert {} bytes at {pos}", text.len());
        let old_len = self.char_count();
        self.text.insert(pos, text)?;
        let delta = (self.char_count() - old_len) as isize;
        self.newlines.shift(pos, delta);
        self.attrs.shift(pos, delta);
        let inserted = std::str::from_utf8(text).expect("Rope::insert already validated this");
        self.mark_newlines(pos, inserted);
        Ok(())
    }

    /// Character count of the document.
    pub fn char_count(&self) -> usize {
        self.text.char_count()
    }

    /// Byte count of the document's UTF-8 encoding.
    pub fn byte_count(&self) -> usize {
        self.text.byte_count()
    }

    /// Append `text` to the end of the document.
    pub fn append(&mut self, text: &[u8]) -> DocResult<()> {
        self.insert(self.char_count(), text)
    }

    /// Remove the characters in `[from, to)`. Clamped to the document's
    /// bounds; a backwards range (`from > to`) is a no-op.
    pub fn erase(&mut self, from: usize, to: usize) {
        let len = self.char_count();
        let from = from.min(len);
        let to = to.min(len);
        if from >= to {
            return;
        }
        debug!(target: "textdoc::document", "erase [{from}, {to})");
        let delta = from as isize - to as isize;
        self.newlines.shift(from, delta);
        self.attrs.shift(from, delta);
        self.text.delete(from, to - from);
    }

    /// Replace `[from, to)` with `text`.
    pub fn replace(&mut self, from: usize, to: usize, text: &[u8]) -> DocResult<()> {
        self.erase(from, to);
        self.insert(from, text)
    }

    /// Extract `[from, to)` as an owned `String`. Clamped to bounds. Seeks
    /// the starting position via the rope's skip list, so this is O(log N)
    /// plus the characters read, not O(document size).
    pub fn substr(&self, from: usize, to: usize) -> String {
        let len = self.char_count();
        let from = from.min(len);
        let to = to.min(len);
        if from >= to {
            return String::new();
        }
        self.text.substring(from, to - from)
    }

    /// Read up to `char_len` characters starting at `from` into `out`,
    /// truncating at the last complete codepoint that fits in `out.len()`
    /// bytes rather than ever writing a partial one. Returns the number of
    /// characters and bytes actually written. For bounded reads into a
    /// fixed-size caller buffer where [`Document::substr`]'s allocation
    /// isn't wanted.
    pub fn substr_into(&self, from: usize, char_len: usize, out: &mut [u8]) -> (usize, usize) {
        self.text.substring_into(from, char_len, out)
    }

    /// The character at `index`, or `None` if out of range.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.text.char_at(index)
    }

    /// Number of lines; always at least 1.
    pub fn line_count(&self) -> usize {
        self.newlines.size() + 1
    }

    /// 1-based line number containing character position `pos`.
    pub fn line_of_offset(&self, pos: usize) -> usize {
        1 + self.newlines.lower_bound_rank(pos)
    }

    /// The `[start, end)` character span of 1-based `line`, or `None` if
    /// `line` is out of range. `end` is the newline's own position for every
    /// line but the last, whose `end` is the document's character length.
    pub fn span_of_line(&self, line: usize) -> Option<(usize, usize)> {
        if line == 0 {
            return None;
        }
        let line0 = line - 1;
        let newlines = self.newlines.size();
        if line0 > newlines {
            return None;
        }
        Some(if newlines == 0 {
            (0, self.char_count())
        } else if line0 == 0 {
            (0, self.newlines.get_by_rank(0).unwrap())
        } else if line0 == newlines {
            (self.newlines.get_by_rank(newlines - 1).unwrap() + 1, self.char_count())
        } else {
            (self.newlines.get_by_rank(line0 - 1).unwrap() + 1, self.newlines.get_by_rank(line0).unwrap())
        })
    }

    /// Convert a 1-based `(line, column)` pair to a character offset,
    /// clamping the column to the line's length.
    pub fn offset_of_point(&self, line: usize, column: usize) -> usize {
        match self.span_of_line(line) {
            Some((start, end)) => (start + column).min(end),
            None => self.char_count(),
        }
    }

    /// Convert a character offset to its 1-based `(line, column)`.
    pub fn point_of_offset(&self, pos: usize) -> (usize, usize) {
        let pos = pos.min(self.char_count());
        let line = self.line_of_offset(pos);
        let start = self.span_of_line(line).map_or(0, |(s, _)| s);
        (line, pos - start)
    }

    /// Attach `value` to `[start, end)`, returning a handle to look it up or
    /// remove it later. `start > end` is rejected with `OutOfRange` rather
    /// than silently clamped, since clamping it could hide a caller bug.
    pub fn add_attribute(&mut self, start: usize, end: usize, value: A) -> DocResult<AttrHandle> {
        if start > end {
            return Err(DocError::OutOfRange);
        }
        Ok(AttrHandle(self.attrs.insert(start, end, value)))
    }

    /// Remove and return the value previously attached with `handle`.
    pub fn remove_attribute(&mut self, handle: AttrHandle) -> Option<A> {
        self.attrs.remove(handle.0)
    }

    /// The value and current span of `handle`, if it's still present.
    pub fn attribute(&self, handle: AttrHandle) -> Option<(&A, usize, usize)> {
        let (start, end) = self.attrs.span(handle.0)?;
        self.attrs.get(handle.0).map(|v| (v, start, end))
    }

    /// Every attribute span matching `mode` against `[start, end)`.
    pub fn find_attributes(
        &self,
        mode: SearchMode,
        start: usize,
        end: usize,
    ) -> Vec<(AttrHandle, usize, usize)> {
        self.attrs.search(mode, start, end).into_iter().map(|(id, s, e)| (AttrHandle(id), s, e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocError;

    #[test]
    fn line_spans_match_scenario() {
        let mut doc: Document<()> = Document::new();
        doc.insert(0, "Привет мир\nHello world\nOlá mundo\n".as_bytes()).unwrap();
        assert_eq!(doc.char_count(), 33);
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.span_of_line(1), Some((0, 10)));
        assert_eq!(doc.span_of_line(2), Some((11, 22)));
        assert_eq!(doc.span_of_line(3), Some((23, 32)));
        assert_eq!(doc.span_of_line(5), None);

        doc.erase(6, 10);
        assert_eq!(doc.substr(0, doc.char_count()), "Привет\nHello world\nOlá mundo\n");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.span_of_line(1), Some((0, 6)));

        doc.erase(12, 18);
        assert_eq!(doc.substr(0, doc.char_count()), "Привет\nHello\nOlá mundo\n");
        assert_eq!(doc.span_of_line(2), Some((7, 12)));
    }

    #[test]
    fn line_of_offset_treats_newline_as_end_of_its_own_line() {
        let doc: Document<()> = Document::from_str("abc\ndef");
        assert_eq!(doc.line_of_offset(3), 1); // the newline itself
        assert_eq!(doc.line_of_offset(4), 2); // first char of line 2
    }

    #[test]
    fn insert_and_erase_keep_newlines_and_attrs_in_sync() {
        let mut doc: Document<&str> = Document::from_str("one\ntwo\nthree");
        let handle = doc.add_attribute(4, 7, "bold").unwrap();
        doc.insert(0, b"zero\n").unwrap();
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.attribute(handle).map(|(v, s, e)| (*v, s, e)), Some(("bold", 9, 12)));

        doc.erase(0, 5);
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.attribute(handle).map(|(v, s, e)| (*v, s, e)), Some(("bold", 4, 7)));
    }

    #[test]
    fn rejects_invalid_utf8_without_mutating() {
        let mut doc: Document<()> = Document::from_str("hello");
        assert!(matches!(doc.insert(2, &[0xff, 0xfe]), Err(DocError::InvalidUtf8 { .. })));
        assert_eq!(doc.substr(0, doc.char_count()), "hello");
    }

    #[test]
    fn add_attribute_rejects_backwards_range() {
        let mut doc: Document<()> = Document::from_str("hello");
        assert_eq!(doc.add_attribute(3, 1, ()), Err(DocError::OutOfRange));
    }

    #[test]
    fn point_and_offset_round_trip() {
        let doc: Document<()> = Document::from_str("abc\ndefgh\ni");
        assert_eq!(doc.point_of_offset(5), (2, 1));
        assert_eq!(doc.offset_of_point(2, 1), 5);
    }
}
