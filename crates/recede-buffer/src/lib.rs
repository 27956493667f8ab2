//! # Recede Buffer
//!
//! Rope-backed text buffer for documents that are highlighted with
//! tree-sitter.
//!
//! Every mutation reports a [`ByteEdit`]: tree-sitter trees are addressed in
//! bytes and (row, byte column) points, so the buffer translates its
//! character-indexed edits into that coordinate space for the caller to feed
//! into an incremental reparse.

mod buffer;
mod edit;

pub use buffer::TextBuffer;
pub use edit::{ByteEdit, Point};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Invalid byte index: {0}")]
    InvalidByteIndex(usize),

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("Invalid range: {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_chars(), 0);
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "let x;").unwrap();
        assert_eq!(buffer.text(), "let x;");

        buffer.insert(5, " = 1").unwrap();
        assert_eq!(buffer.text(), "let x = 1;");

        buffer.delete(5..9).unwrap();
        assert_eq!(buffer.text(), "let x;");
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buffer = TextBuffer::from("abc");
        assert!(matches!(
            buffer.insert(4, "x"),
            Err(BufferError::InvalidCharIndex(4))
        ));
        assert!(matches!(
            buffer.delete(2..5),
            Err(BufferError::InvalidRange { start: 2, end: 5 })
        ));
    }
}
