//! Black-box scenarios exercising the `Document` facade end-to-end, driving
//! it only through the public API (`textdoc::Document`).

use textdoc::document::AttrHandle;
use textdoc::{DocError, Document};

#[test]
fn mixed_script_edits() {
    let mut doc: Document<()> = Document::new();
    doc.insert(0, "Привет мир\nHello world\nOlá mundo\n".as_bytes()).unwrap();
    assert_eq!(doc.char_count(), 33);
    assert_eq!(doc.line_count(), 4);
    assert_eq!(doc.span_of_line(1), Some((0, 10)));
    assert_eq!(doc.span_of_line(2), Some((11, 22)));
    assert_eq!(doc.span_of_line(3), Some((23, 32)));

    doc.erase(6, 10); // deletes " мир"
    assert_eq!(doc.substr(0, doc.char_count()), "Привет\nHello world\nOlá mundo\n");
    assert_eq!(doc.line_count(), 4);
    assert_eq!(doc.span_of_line(1), Some((0, 6)));

    doc.erase(12, 18); // deletes " world"
    assert_eq!(doc.substr(0, doc.char_count()), "Привет\nHello\nOlá mundo\n");
    assert_eq!(doc.span_of_line(2), Some((7, 12)));
}

#[test]
fn interval_search_modes_under_shift() {
    use textdoc::interval_tree::SearchMode;

    let mut doc: Document<&str> = Document::from_str(&"x".repeat(30));
    let spans: Vec<AttrHandle> = [
        (1, 5, "a"),
        (2, 4, "b"),
        (4, 7, "c"),
        (3, 9, "d"),
        (1, 9, "e"),
        (4, 5, "f"),
        (8, 9, "g"),
        (5, 8, "h"),
        (5, 9, "i"),
    ]
    .into_iter()
    .map(|(s, e, label)| doc.add_attribute(s, e, label).unwrap())
    .collect();
    let _ = &spans;

    // start < 6 && end > 5: b,c,d,e,h (5 spans).
    let overlap = doc.find_attributes(SearchMode::Overlap, 5, 6);
    assert_eq!(overlap.len(), 5);

    doc.insert(5, b"xxxxx").unwrap(); // shift(5, +5): g (8,9) -> (13,14), now the
                                      // only span fully inside [12, 15).
    let inner = doc.find_attributes(SearchMode::Inner, 12, 15);
    assert_eq!(inner.len(), 1);
    assert_eq!(doc.attribute(inner[0].0).map(|(v, ..)| *v), Some("g"));

    doc.erase(12, 15); // shift(12, -3): g is engulfed and dropped; h (10,13)
                       // and i (10,14) both clip down to (10,12).
    let equal = doc.find_attributes(SearchMode::Equal, 10, 12);
    assert_eq!(equal.len(), 2);

    doc.insert(0, b"zz").unwrap(); // shift(0, +2): every span moves right by 2,
                                   // so none can overlap the document's first
                                   // two characters.
    let at_start = doc.find_attributes(SearchMode::Overlap, 0, 2);
    assert!(at_start.is_empty());
}

#[test]
fn invalid_utf8_is_rejected_without_mutation() {
    let mut doc: Document<()> = Document::new();
    let err = doc.insert(0, &[0xC0, 0x80]).unwrap_err();
    assert_eq!(err, DocError::InvalidUtf8 { byte_offset: 0 });
    assert_eq!(doc.char_count(), 0);
}

#[test]
fn bulk_newline_shift_moves_later_lines_by_one() {
    let mut doc: Document<()> = Document::new();
    let block: String = (0..10).map(|i| format!("line{i}\n")).collect();
    doc.insert(0, block.as_bytes()).unwrap();
    assert_eq!(doc.line_count(), 11);

    let before: Vec<_> = (5..=10).map(|l| doc.span_of_line(l)).collect();
    // Insert in the middle of line 5's own text, not at its very start: that
    // way line 5 only grows (its start is untouched) while every later line
    // shifts wholesale by one.
    let (line5_start, _) = doc.span_of_line(5).unwrap();
    doc.insert(line5_start + 1, b"X").unwrap();

    assert_eq!(doc.line_count(), 11);
    let (prev5_start, prev5_end) = before[0].unwrap();
    assert_eq!(doc.span_of_line(5), Some((prev5_start, prev5_end + 1)));
    for (l, prev) in (6..=10).zip(&before[1..]) {
        let (prev_start, prev_end) = prev.unwrap();
        assert_eq!(doc.span_of_line(l), Some((prev_start + 1, prev_end + 1)));
    }
}

#[test]
fn cursor_position_tracks_inserts_ahead_of_it() {
    use textdoc::Cursor;

    let mut doc: Document<()> = Document::from_str("one\ntwo\nthree");
    let mut cursor = Cursor::new(&mut doc);
    cursor.move_to_point(2, 3);
    let before = cursor.position();
    cursor.insert(b"ab").unwrap();
    assert_eq!(cursor.position(), before + 2);
    assert_eq!((cursor.line(), cursor.column()), (2, 5));
}

#[test]
fn attribute_span_drifts_with_preceding_insert() {
    use textdoc::interval_tree::SearchMode;

    let mut doc: Document<()> = Document::from_str("0123456789abcdefghij");
    let handle = doc.add_attribute(10, 20, ()).unwrap();
    doc.insert(5, b"xx").unwrap();
    assert_eq!(doc.attribute(handle).map(|(_, s, e)| (s, e)), Some((12, 22)));

    assert_eq!(doc.find_attributes(SearchMode::Equal, 12, 22).len(), 1);
    assert!(doc.find_attributes(SearchMode::Equal, 10, 20).is_empty());
}
