#![forbid(unsafe_code)]

//! Growable byte text buffer with snapshot-based undo/redo.
//!
//! # Role
//! `scribe-core` owns the editing model: a [`TextBuffer`] with positional
//! edits, a clipboard slot, and a [`HistoryStore`] of immutable
//! [`Snapshot`]s. Front ends (the `scribe` menu binary, tests, embedders)
//! drive it through explicit method calls.
//!
//! # Example
//! ```
//! use scribe_core::TextBuffer;
//!
//! let mut buf = TextBuffer::new();
//! buf.append("hello");
//! buf.append(" world");
//! assert_eq!(buf.find_text("lo"), Some(3));
//!
//! buf.undo().unwrap();
//! assert_eq!(buf.get_text(), b"hello");
//! buf.redo().unwrap();
//! assert_eq!(buf.get_text(), b"hello world");
//! ```
//!
//! # Offsets
//! All positions are raw byte offsets. No grapheme or UTF-8 boundary
//! handling is applied.

pub mod buffer;
pub mod config;
pub mod error;
pub mod history;
pub mod storage;

pub use buffer::{TERMINATOR, TextBuffer};
pub use config::{BufferConfig, ConfigError, DEFAULT_INITIAL_CAPACITY, Quirks};
pub use error::{EditError, HistoryDirection, Result};
pub use history::{HistoryConfig, HistoryStore, Snapshot};
pub use storage::{FileStore, MemoryStore, TextSink, TextSource};
