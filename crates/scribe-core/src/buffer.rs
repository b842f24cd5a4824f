#![forbid(unsafe_code)]

//! Growable byte buffer with clipboard and snapshot undo/redo.
//!
//! # Storage
//!
//! `data` always holds exactly `capacity` slots. Bytes `[0, length)` are the
//! logical content, `data[length]` is the `0` terminator and every slot past
//! it is zero as well.
//!
//! ```text
//!  0         length        capacity
//!  ├─────────┼──┬──────────┤
//!  │ content │\0│  zeroed  │
//!  └─────────┴──┴──────────┘
//! ```
//!
//! # History Contract
//!
//! Every mutating operation validates its arguments first, then records the
//! pre-edit state with [`HistoryStore::record_edit`], then mutates. A
//! rejected call leaves the buffer and both stacks untouched. [`undo`] and
//! [`redo`] move the live state onto the opposite stack instead of clearing
//! it.
//!
//! [`undo`]: TextBuffer::undo
//! [`redo`]: TextBuffer::redo

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use crate::config::{BufferConfig, Quirks};
use crate::error::{EditError, HistoryDirection, Result};
use crate::history::{HistoryStore, Snapshot};
use crate::storage::{FileStore, TextSink, TextSource};

/// Terminator byte stored at `data[length]`.
pub const TERMINATOR: u8 = 0;

/// Mutable text buffer with positional edits and undo/redo.
pub struct TextBuffer {
    data: Vec<u8>,
    length: usize,
    clipboard: Vec<u8>,
    history: HistoryStore,
    quirks: Quirks,
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("length", &self.length)
            .field("capacity", &self.data.len())
            .field("clipboard_len", &self.clipboard.len())
            .field("history", &self.history)
            .finish()
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text_lossy())
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::with_config(BufferConfig::default())
    }
}

impl TextBuffer {
    /// Empty buffer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer using `config`.
    ///
    /// An `initial_capacity` of 0 is raised to 1 so the terminator fits.
    #[must_use]
    pub fn with_config(config: BufferConfig) -> Self {
        let capacity = config.initial_capacity.max(1);
        Self {
            data: vec![TERMINATOR; capacity],
            length: 0,
            clipboard: Vec::new(),
            history: HistoryStore::new(config.history),
            quirks: config.quirks,
        }
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    /// Logical content, `content[0..length)`.
    #[must_use]
    pub fn get_text(&self) -> &[u8] {
        &self.data[..self.length]
    }

    /// Logical content followed by its terminator.
    #[must_use]
    pub fn terminated(&self) -> &[u8] {
        &self.data[..=self.length]
    }

    /// Logical content decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.get_text())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Allocated slots; always greater than [`len`](Self::len).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn clipboard(&self) -> &[u8] {
        &self.clipboard
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    #[must_use]
    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Drop all undo and redo snapshots. Content is unchanged.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ====================================================================
    // Edits
    // ====================================================================

    /// Append `text` to the end, doubling capacity as needed.
    pub fn append(&mut self, text: impl AsRef<[u8]>) {
        let text = text.as_ref();
        let _span = tracing::debug_span!(
            "buffer.edit",
            operation = "append",
            length = self.length,
            text_len = text.len()
        )
        .entered();

        self.record();

        let mut capacity = self.capacity();
        while self.length + text.len() >= capacity {
            capacity *= 2;
        }
        self.resize(capacity);

        let end = self.length + text.len();
        self.data[self.length..end].copy_from_slice(text);
        self.length = end;
    }

    /// Replace `replace_len` bytes at `pos` with `substring`.
    ///
    /// `replace_len == 0` is a pure insert. Grows capacity to twice the new
    /// length when the result would not fit.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidPosition`] if `pos > len()`,
    /// [`EditError::InvalidRange`] if `pos + replace_len > len()`.
    pub fn insert_and_replace(
        &mut self,
        pos: usize,
        substring: impl AsRef<[u8]>,
        replace_len: usize,
    ) -> Result<()> {
        let substring = substring.as_ref();
        let _span = tracing::debug_span!(
            "buffer.edit",
            operation = "insert_and_replace",
            pos,
            replace_len,
            text_len = substring.len()
        )
        .entered();

        if pos > self.length {
            return Err(EditError::invalid_position(pos, self.length));
        }
        let end = pos
            .checked_add(replace_len)
            .filter(|&end| end <= self.length)
            .ok_or_else(|| EditError::invalid_range(pos, replace_len, self.length))?;

        self.record();
        self.splice(pos, end, substring);
        Ok(())
    }

    /// Remove `len` bytes starting at `pos`.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidRange`] if `pos >= len()` or the span runs past
    /// the end.
    pub fn delete_text(&mut self, pos: usize, len: usize) -> Result<()> {
        let _span =
            tracing::debug_span!("buffer.edit", operation = "delete", pos, len).entered();

        let end = self.check_range(pos, len)?;
        self.record();
        self.splice(pos, end, &[]);
        Ok(())
    }

    /// Move `len` bytes at `pos` into the clipboard. Records one snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`delete_text`](Self::delete_text).
    pub fn cut_text(&mut self, pos: usize, len: usize) -> Result<()> {
        let _span = tracing::debug_span!("buffer.edit", operation = "cut", pos, len).entered();

        let end = self.check_range(pos, len)?;
        self.record();
        self.fill_clipboard(pos, end);
        self.splice(pos, end, &[]);
        Ok(())
    }

    /// Copy `len` bytes at `pos` into the clipboard. Touches neither content
    /// nor history.
    ///
    /// # Errors
    ///
    /// Same as [`delete_text`](Self::delete_text).
    pub fn copy_text(&mut self, pos: usize, len: usize) -> Result<()> {
        let end = self.check_range(pos, len)?;
        self.fill_clipboard(pos, end);
        tracing::debug!(pos, len, "buffer.copy");
        Ok(())
    }

    /// Insert the clipboard at `pos`.
    ///
    /// Records one snapshot, or two with
    /// [`Quirks::double_record_paste`].
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidPosition`] if `pos > len()`.
    pub fn paste_text(&mut self, pos: usize) -> Result<()> {
        let _span = tracing::debug_span!(
            "buffer.edit",
            operation = "paste",
            pos,
            clipboard_len = self.clipboard.len()
        )
        .entered();

        if pos > self.length {
            return Err(EditError::invalid_position(pos, self.length));
        }

        self.record();
        if self.quirks.double_record_paste {
            self.record();
        }

        let clipboard = std::mem::take(&mut self.clipboard);
        self.splice(pos, pos, &clipboard);
        self.clipboard = clipboard;
        Ok(())
    }

    // ====================================================================
    // History
    // ====================================================================

    /// Restore the state before the most recent edit.
    ///
    /// # Errors
    ///
    /// [`EditError::HistoryEmpty`] when there is nothing to undo.
    pub fn undo(&mut self) -> Result<()> {
        self.step_history(HistoryDirection::Undo)
    }

    /// Restore the state left behind by the most recent undo.
    ///
    /// # Errors
    ///
    /// [`EditError::HistoryEmpty`] when there is nothing to redo.
    pub fn redo(&mut self) -> Result<()> {
        self.step_history(HistoryDirection::Redo)
    }

    fn step_history(&mut self, direction: HistoryDirection) -> Result<()> {
        let _span = tracing::debug_span!(
            "buffer.history",
            %direction,
            undo_depth = self.history.undo_depth(),
            redo_depth = self.history.redo_depth()
        )
        .entered();

        // Legacy order: the live state is pushed before we know whether the
        // pop will succeed.
        if self.quirks.push_on_empty_history {
            self.preserve_live_state(direction);
        }

        let popped = match direction {
            HistoryDirection::Undo => self.history.pop_undo(),
            HistoryDirection::Redo => self.history.pop_redo(),
        };
        let Some(snapshot) = popped else {
            return Err(EditError::HistoryEmpty(direction));
        };

        if !self.quirks.push_on_empty_history {
            self.preserve_live_state(direction);
        }
        self.restore(&snapshot);
        Ok(())
    }

    fn preserve_live_state(&mut self, direction: HistoryDirection) {
        let capacity = self.data.len();
        let content = &self.data[..self.length];
        match direction {
            HistoryDirection::Undo => self.history.push_redo(content, capacity),
            HistoryDirection::Redo => self.history.push_undo(content, capacity),
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        if self.capacity() != snapshot.saved_capacity() {
            self.resize(snapshot.saved_capacity());
        }
        let size = snapshot.saved_size();
        self.data[..size].copy_from_slice(snapshot.data());
        self.data[size..].fill(TERMINATOR);
        self.length = size;
    }

    // ====================================================================
    // Search
    // ====================================================================

    /// Offset of the first occurrence of `search`, or `None`.
    ///
    /// An empty needle matches at 0.
    #[must_use]
    pub fn find_text(&self, search: impl AsRef<[u8]>) -> Option<usize> {
        let needle = search.as_ref();
        if needle.is_empty() {
            return Some(0);
        }
        self.get_text()
            .windows(needle.len())
            .position(|window| window == needle)
    }

    /// Offsets of every non-overlapping occurrence of `search`.
    ///
    /// An empty needle yields no matches.
    #[must_use]
    pub fn find_all(&self, search: impl AsRef<[u8]>) -> Vec<usize> {
        let needle = search.as_ref();
        let haystack = self.get_text();
        let mut results = Vec::new();
        if needle.is_empty() {
            return results;
        }
        let mut start = 0;
        while start + needle.len() <= haystack.len() {
            match haystack[start..]
                .windows(needle.len())
                .position(|window| window == needle)
            {
                Some(offset) => {
                    results.push(start + offset);
                    start += offset + needle.len();
                }
                None => break,
            }
        }
        results
    }

    // ====================================================================
    // Load / Save
    // ====================================================================

    /// Replace the whole content with whatever `source` yields.
    ///
    /// Capacity becomes `size + 1`. Recorded as an edit unless
    /// [`Quirks::load_bypasses_history`] is set.
    ///
    /// # Errors
    ///
    /// [`EditError::Io`] if the collaborator fails; the buffer is unchanged.
    pub fn load_from(&mut self, mut source: impl TextSource) -> Result<()> {
        let bytes = source.read_all()?;
        self.replace_all(bytes);
        Ok(())
    }

    /// Write the logical content to `sink`.
    ///
    /// # Errors
    ///
    /// [`EditError::Io`] if the collaborator fails.
    pub fn save_to(&self, mut sink: impl TextSink) -> Result<()> {
        sink.write_all(self.get_text())?;
        tracing::debug!(length = self.length, "buffer.saved");
        Ok(())
    }

    /// [`load_from`](Self::load_from) a file.
    ///
    /// # Errors
    ///
    /// [`EditError::File`] naming `path` if it cannot be read.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = FileStore::new(path)
            .read_all()
            .map_err(|source| EditError::File {
                path: path.to_path_buf(),
                source,
            })?;
        self.replace_all(bytes);
        tracing::info!(path = %path.display(), length = self.length, "buffer.loaded");
        Ok(())
    }

    /// [`save_to`](Self::save_to) a file, overwriting it.
    ///
    /// # Errors
    ///
    /// [`EditError::File`] naming `path` if it cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        FileStore::new(path)
            .write_all(self.get_text())
            .map_err(|source| EditError::File {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), length = self.length, "buffer.saved");
        Ok(())
    }

    fn replace_all(&mut self, mut bytes: Vec<u8>) {
        let _span = tracing::debug_span!("buffer.edit", operation = "load", new_len = bytes.len())
            .entered();

        if !self.quirks.load_bypasses_history {
            self.record();
        }
        self.length = bytes.len();
        bytes.push(TERMINATOR);
        self.data = bytes;
    }

    // ====================================================================
    // Internals
    // ====================================================================

    fn record(&mut self) {
        self.history
            .record_edit(&self.data[..self.length], self.data.len());
    }

    /// Validate a span for delete/cut/copy and return its end offset.
    fn check_range(&self, pos: usize, len: usize) -> Result<usize> {
        if pos >= self.length {
            return Err(EditError::invalid_range(pos, len, self.length));
        }
        pos.checked_add(len)
            .filter(|&end| end <= self.length)
            .ok_or_else(|| EditError::invalid_range(pos, len, self.length))
    }

    fn fill_clipboard(&mut self, pos: usize, end: usize) {
        self.clipboard.clear();
        self.clipboard.extend_from_slice(&self.data[pos..end]);
    }

    /// Replace `data[pos..end]` with `replacement`. Caller has validated
    /// `pos <= end <= length`.
    fn splice(&mut self, pos: usize, end: usize, replacement: &[u8]) {
        let old_length = self.length;
        let new_length = old_length - (end - pos) + replacement.len();
        if new_length >= self.capacity() {
            self.resize(new_length * 2);
        }

        self.data.copy_within(end..old_length, pos + replacement.len());
        self.data[pos..pos + replacement.len()].copy_from_slice(replacement);
        if new_length < old_length {
            self.data[new_length..old_length].fill(TERMINATOR);
        }
        self.length = new_length;
    }

    fn resize(&mut self, new_capacity: usize) {
        if new_capacity != self.data.len() {
            tracing::debug!(from = self.data.len(), to = new_capacity, "buffer.resize");
            self.data.resize(new_capacity, TERMINATOR);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
