//! Byte-addressed edit records.

/// A position in the buffer as (row, byte column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Describes one contiguous replacement in byte coordinates.
///
/// An insertion has `old_end_byte == start_byte`; a deletion has
/// `new_end_byte == start_byte`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

impl ByteEdit {
    /// Returns true if the edit neither removed nor added bytes.
    pub fn is_empty(&self) -> bool {
        self.start_byte == self.old_end_byte && self.start_byte == self.new_end_byte
    }
}
