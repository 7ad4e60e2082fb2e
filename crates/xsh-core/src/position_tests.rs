use crate::{InputEdit, LineIndex, Point};

#[test]
fn line_index_points() {
    let index = LineIndex::new("ls -la\necho hi\n");
    assert_eq!(index.line_count(), 3);
    assert_eq!(index.point(0), Point::new(0, 0));
    assert_eq!(index.point(3), Point::new(0, 3));
    assert_eq!(index.point(6), Point::new(0, 6));
    assert_eq!(index.point(7), Point::new(1, 0));
    assert_eq!(index.point(12), Point::new(1, 5));
    assert_eq!(index.point(15), Point::new(2, 0));
}

#[test]
fn line_index_clamps_past_end() {
    let index = LineIndex::new("ab");
    assert_eq!(index.point(99), Point::new(0, 2));
}

#[test]
fn line_index_offsets() {
    let index = LineIndex::new("a\nbcd\n");
    assert_eq!(index.offset(Point::new(1, 2)), Some(4));
    assert_eq!(index.offset(Point::new(1, 9)), None);
    assert_eq!(index.offset(Point::new(7, 0)), None);
}

#[test]
fn point_display_is_one_based() {
    assert_eq!(Point::new(0, 4).to_string(), "1:5");
}

#[test]
fn insert_edit() {
    let (edit, text) = InputEdit::insert("x = $(ls)", 8, "a");
    assert_eq!(text, "x = $(lsa)");
    assert_eq!(edit.start_byte, 8);
    assert_eq!(edit.old_end_byte, 8);
    assert_eq!(edit.new_end_byte, 9);
    assert_eq!(edit.delta(), 1);
    assert_eq!(edit.new_end_position, Point::new(0, 9));
}

#[test]
fn replace_edit_across_lines() {
    let (edit, text) = InputEdit::replace("a\nbb\nc", 1..5, "");
    assert_eq!(text, "ac");
    assert_eq!(edit.start_position, Point::new(0, 1));
    assert_eq!(edit.old_end_position, Point::new(2, 0));
    assert_eq!(edit.new_end_position, Point::new(0, 1));
    assert_eq!(edit.delta(), -4);
}

#[test]
fn map_offset_around_edit() {
    let (edit, _) = InputEdit::replace("0123456789", 3..5, "abcd");
    assert_eq!(edit.map_offset(2), Some(2));
    assert_eq!(edit.map_offset(3), Some(3));
    assert_eq!(edit.map_offset(4), None);
    assert_eq!(edit.map_offset(5), Some(7));
    assert_eq!(edit.map_offset(10), Some(12));
}

#[test]
fn map_offset_for_insertion() {
    let (edit, _) = InputEdit::insert("0123", 2, "xy");
    assert_eq!(edit.map_offset(2), Some(2));
    assert_eq!(edit.map_offset(3), Some(5));
}
