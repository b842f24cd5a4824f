#![forbid(unsafe_code)]

//! Error taxonomy for buffer operations.
//!
//! Every variant is a reported condition: the operation that returns it has
//! performed no mutation and left both history stacks as they were.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for buffer operations.
pub type Result<T> = std::result::Result<T, EditError>;

/// Which history stack an undo/redo request drew from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

/// Errors returned by [`TextBuffer`](crate::TextBuffer) operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// A `pos`/`len` span reaches outside the current content.
    #[error("invalid range: {len} byte(s) at {pos} in content of length {length}")]
    InvalidRange {
        pos: usize,
        len: usize,
        length: usize,
    },

    /// An insertion point lies beyond the end of the content.
    #[error("invalid position: {pos} is beyond content length {length}")]
    InvalidPosition { pos: usize, length: usize },

    /// The requested history stack holds no snapshot.
    #[error("nothing to {0}")]
    HistoryEmpty(HistoryDirection),

    /// A storage collaborator failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A file collaborator failed to open, read or write `path`.
    #[error("file error on {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EditError {
    #[must_use]
    pub fn invalid_range(pos: usize, len: usize, length: usize) -> Self {
        Self::InvalidRange { pos, len, length }
    }

    #[must_use]
    pub fn invalid_position(pos: usize, length: usize) -> Self {
        Self::InvalidPosition { pos, length }
    }

    /// `true` for the undo/redo exhaustion variant.
    #[must_use]
    pub fn is_history_empty(&self) -> bool {
        matches!(self, Self::HistoryEmpty(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_empty_messages_name_the_direction() {
        assert_eq!(
            EditError::HistoryEmpty(HistoryDirection::Undo).to_string(),
            "nothing to undo"
        );
        assert_eq!(
            EditError::HistoryEmpty(HistoryDirection::Redo).to_string(),
            "nothing to redo"
        );
    }

    #[test]
    fn invalid_range_message_carries_span() {
        let err = EditError::invalid_range(4, 3, 5);
        let msg = err.to_string();
        assert!(msg.contains("at 4"));
        assert!(msg.contains("length 5"));
        assert!(!err.is_history_empty());
    }

    #[test]
    fn file_error_exposes_source() {
        use std::error::Error as _;

        let err = EditError::File {
            path: PathBuf::from("/nowhere/notes.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nowhere/notes.txt"));
        assert!(err.source().is_some());
    }

    #[test]
    fn io_error_converts_with_question_mark() {
        fn fails() -> Result<()> {
            Err(io::Error::other("disk on fire"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(EditError::Io(_))));
    }
}
