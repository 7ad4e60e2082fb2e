//! Positions and text edits.
//!
//! Byte offsets are `u32` throughout, matching rowan's `TextSize`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Zero-based row and byte column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

/// Line start table for offset ↔ point conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Offsets past the end clamp to the end of text.
    pub fn point(&self, offset: u32) -> Point {
        let offset = offset.min(self.len);
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Point::new(row as u32, offset - self.line_starts[row])
    }

    pub fn offset(&self, point: Point) -> Option<u32> {
        let start = *self.line_starts.get(point.row as usize)?;
        let end = self
            .line_starts
            .get(point.row as usize + 1)
            .copied()
            .unwrap_or(self.len);
        let offset = start.checked_add(point.column)?;
        (offset <= end).then_some(offset)
    }
}

/// One text mutation: bytes `start_byte..old_end_byte` of the old text were
/// replaced by bytes `start_byte..new_end_byte` of the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputEdit {
    pub start_byte: u32,
    pub old_end_byte: u32,
    pub new_end_byte: u32,
    pub start_position: Point,
    pub old_end_position: Point,
    pub new_end_position: Point,
}

impl InputEdit {
    /// Replace `range` of `old` with `replacement`, returning the edit and the
    /// new text with all three points filled in.
    pub fn replace(old: &str, range: Range<usize>, replacement: &str) -> (Self, String) {
        let mut new_text = String::with_capacity(old.len() - range.len() + replacement.len());
        new_text.push_str(&old[..range.start]);
        new_text.push_str(replacement);
        new_text.push_str(&old[range.end..]);

        let old_index = LineIndex::new(old);
        let new_index = LineIndex::new(&new_text);
        let start = range.start as u32;
        let old_end = range.end as u32;
        let new_end = (range.start + replacement.len()) as u32;

        let edit = Self {
            start_byte: start,
            old_end_byte: old_end,
            new_end_byte: new_end,
            start_position: old_index.point(start),
            old_end_position: old_index.point(old_end),
            new_end_position: new_index.point(new_end),
        };
        (edit, new_text)
    }

    pub fn insert(old: &str, at: usize, text: &str) -> (Self, String) {
        Self::replace(old, at..at, text)
    }

    pub fn delete(old: &str, range: Range<usize>) -> (Self, String) {
        Self::replace(old, range, "")
    }

    /// Signed length change.
    pub fn delta(&self) -> i64 {
        i64::from(self.new_end_byte) - i64::from(self.old_end_byte)
    }

    /// Old byte range replaced by the edit.
    pub fn old_range(&self) -> Range<u32> {
        self.start_byte..self.old_end_byte
    }

    /// New byte range holding the inserted text.
    pub fn new_range(&self) -> Range<u32> {
        self.start_byte..self.new_end_byte
    }

    /// Map an old offset outside the edited range to the new text.
    ///
    /// Offsets strictly inside `start_byte..old_end_byte` have no image.
    /// Insertion points (`start == old_end`) map offsets equal to the start
    /// to the start: text inserted at an offset lands after what precedes it.
    pub fn map_offset(&self, offset: u32) -> Option<u32> {
        if offset <= self.start_byte {
            return Some(offset);
        }
        if offset < self.old_end_byte {
            return None;
        }
        u32::try_from(i64::from(offset) + self.delta()).ok()
    }
}
