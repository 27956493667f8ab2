//! Text buffer backed by a rope.

use ropey::Rope;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::edit::{ByteEdit, Point};
use crate::{BufferError, BufferResult};

/// A text buffer backed by a rope data structure.
///
/// `TextBuffer` is `Send` but not meant for shared mutation; documents own
/// their buffer and mutate it from the editing thread.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,

    /// Whether the buffer changed since it was loaded
    modified: bool,

    /// Associated file path (if any)
    file_path: Option<PathBuf>,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use recede_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            modified: false,
            file_path: None,
        }
    }

    /// Loads a buffer from a file.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        Ok(Self {
            rope: Rope::from_str(&content),
            modified: false,
            file_path: Some(path.to_path_buf()),
        })
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    #[inline]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a slice of text by byte range, clamped to char boundaries.
    pub fn byte_slice(&self, range: Range<usize>) -> BufferResult<String> {
        if range.start > range.end || range.end > self.len_bytes() {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        let start = self.rope.byte_to_char(range.start);
        let end = self.rope.byte_to_char(range.end);
        Ok(self.rope.slice(start..end).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of bytes in the buffer.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line. A buffer ending with `\n` counts
    /// the empty line after it.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Converts a byte offset into a (row, byte column) point.
    pub fn byte_to_point(&self, byte_idx: usize) -> BufferResult<Point> {
        if byte_idx > self.len_bytes() {
            return Err(BufferError::InvalidByteIndex(byte_idx));
        }
        Ok(self.point_at(byte_idx))
    }

    fn point_at(&self, byte_idx: usize) -> Point {
        let row = self.rope.byte_to_line(byte_idx);
        Point::new(row, byte_idx - self.rope.line_to_byte(row))
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index and reports the byte edit.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<ByteEdit> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }

        let start_byte = self.rope.char_to_byte(char_idx);
        let start_point = self.point_at(start_byte);

        self.rope.insert(char_idx, text);
        self.modified = true;

        let new_end_byte = start_byte + text.len();
        Ok(ByteEdit {
            start_byte,
            old_end_byte: start_byte,
            new_end_byte,
            start_point,
            old_end_point: start_point,
            new_end_point: self.point_at(new_end_byte),
        })
    }

    /// Deletes text in a character range and reports the byte edit.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<ByteEdit> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        let start_byte = self.rope.char_to_byte(range.start);
        let old_end_byte = self.rope.char_to_byte(range.end);
        let start_point = self.point_at(start_byte);
        let old_end_point = self.point_at(old_end_byte);

        self.rope.remove(range);
        self.modified = true;

        Ok(ByteEdit {
            start_byte,
            old_end_byte,
            new_end_byte: start_byte,
            start_point,
            old_end_point,
            new_end_point: start_point,
        })
    }

    // ==================== State Queries ====================

    /// Returns true if the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the associated file path, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            modified: false,
            file_path: None,
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_reports_byte_edit() {
        let mut buffer = TextBuffer::from("fn a() {}\n");
        let edit = buffer.insert(8, "\n    1\n").unwrap();

        assert_eq!(edit.start_byte, 8);
        assert_eq!(edit.old_end_byte, 8);
        assert_eq!(edit.new_end_byte, 8 + 7);
        assert_eq!(edit.start_point, Point::new(0, 8));
        assert_eq!(edit.new_end_point, Point::new(2, 0));
    }

    #[test]
    fn test_delete_reports_byte_edit() {
        let mut buffer = TextBuffer::from("ab\ncd\nef");
        let edit = buffer.delete(1..4).unwrap();

        assert_eq!(buffer.text(), "ad\nef");
        assert_eq!(edit.start_byte, 1);
        assert_eq!(edit.old_end_byte, 4);
        assert_eq!(edit.new_end_byte, 1);
        assert_eq!(edit.old_end_point, Point::new(1, 1));
        assert_eq!(edit.new_end_point, Point::new(0, 1));
    }

    #[test]
    fn test_multibyte_columns_are_bytes() {
        let mut buffer = TextBuffer::from("é = 1");
        let edit = buffer.insert(1, "x").unwrap();

        assert_eq!(edit.start_byte, 2);
        assert_eq!(edit.start_point, Point::new(0, 2));
        assert_eq!(buffer.byte_slice(0..3).unwrap(), "éx");
    }

    #[test]
    fn test_empty_edit() {
        let mut buffer = TextBuffer::from("abc");
        assert!(buffer.insert(1, "").unwrap().is_empty());
        assert!(!buffer.delete(0..1).unwrap().is_empty());
    }
}
