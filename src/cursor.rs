//! [`Cursor`]: a position within a [`Document`] that supports relative
//! movement, line/column conversion, and in-place edits. Borrows its
//! document mutably rather than going through a trait object: "operates on
//! a document" is expressed with `&mut Document`.

use crate::document::Document;
use crate::error::DocResult;

/// A movable position within a [`Document`], borrowed mutably so edits can
/// be made through it.
pub struct Cursor<'a, A> {
    doc: &'a mut Document<A>,
    pos: usize,
}

impl<'a, A> Cursor<'a, A> {
    /// A cursor at the start of `doc`.
    pub fn new(doc: &'a mut Document<A>) -> Self {
        Self { doc, pos: 0 }
    }

    /// A cursor at `pos` within `doc`, clamped to the document's length.
    pub fn at(doc: &'a mut Document<A>, pos: usize) -> Self {
        let mut cursor = Self::new(doc);
        cursor.move_to(pos);
        cursor
    }

    /// The current character offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to an absolute character offset, clamped to the document.
    pub fn move_to(&mut self, pos: usize) {
        self.pos = pos.min(self.doc.char_count());
    }

    /// Move by a relative number of characters, clamped to the document.
    pub fn move_by(&mut self, offset: isize) {
        let target = (self.pos as isize + offset).max(0) as usize;
        self.move_to(target);
    }

    /// 1-based line number at the cursor.
    pub fn line(&self) -> usize {
        self.doc.line_of_offset(self.pos)
    }

    /// 0-based column at the cursor (characters since the start of its line).
    pub fn column(&self) -> usize {
        let start = self.doc.span_of_line(self.line()).map_or(0, |(s, _)| s);
        self.pos - start
    }

    /// Move to the character offset for 1-based `(line, column)`.
    pub fn move_to_point(&mut self, line: usize, column: usize) {
        let target = self.doc.offset_of_point(line, column);
        self.move_to(target);
    }

    /// The character at `offset` characters from the cursor, if in range.
    pub fn char_at(&self, offset: isize) -> Option<char> {
        let index = (self.pos as isize + offset).max(0) as usize;
        self.doc.char_at(index)
    }

    /// The character under the cursor.
    pub fn current_char(&self) -> Option<char> {
        self.char_at(0)
    }

    /// The `count` characters starting at the cursor, clamped to the
    /// document's end. O(log N) to seek the cursor's position plus the
    /// characters read.
    pub fn substring(&self, count: usize) -> String {
        self.doc.substr(self.pos, self.pos + count)
    }

    /// Insert `text` at the cursor, then advance past it.
    pub fn insert(&mut self, text: &[u8]) -> DocResult<()> {
        self.doc.insert(self.pos, text)?;
        let inserted = std::str::from_utf8(text).expect("Document::insert already validated this");
        self.pos += inserted.chars().count();
        Ok(())
    }

    /// Replace the `count` characters after the cursor with `text`, then
    /// advance past the inserted text.
    pub fn replace(&mut self, count: usize, text: &[u8]) -> DocResult<()> {
        self.doc.replace(self.pos, self.pos + count, text)?;
        let inserted = std::str::from_utf8(text).expect("Document::replace already validated this");
        self.pos += inserted.chars().count();
        Ok(())
    }

    /// Erase the `count` characters after the cursor. The cursor's position
    /// does not move.
    pub fn erase(&mut self, count: usize) {
        self.doc.erase(self.pos, self.pos + count);
    }
}
