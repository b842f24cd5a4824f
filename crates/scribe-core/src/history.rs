#![forbid(unsafe_code)]

//! Snapshot-based undo/redo store.
//!
//! [`HistoryStore`] keeps two stacks of immutable [`Snapshot`]s. It knows
//! nothing about editing: the buffer hands it raw state and later takes a
//! snapshot back to restore.
//!
//! # Architecture
//!
//! ```text
//! record_edit(s3)
//! ┌──────────────────────────────────────────┐
//! │ Undo Stack:  [s0, s1, s2, s3]            │
//! │ Redo Stack:  []                          │
//! └──────────────────────────────────────────┘
//!
//! push_redo(live) + pop_undo()  (buffer undo)
//! ┌──────────────────────────────────────────┐
//! │ Undo Stack:  [s0, s1, s2]    → s3 applied│
//! │ Redo Stack:  [live]                      │
//! └──────────────────────────────────────────┘
//!
//! record_edit(s4): new branch, clears redo
//! ┌──────────────────────────────────────────┐
//! │ Undo Stack:  [s0, s1, s2, s4]            │
//! │ Redo Stack:  []                          │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. [`record_edit`](HistoryStore::record_edit) clears the redo stack.
//! 2. [`push_undo`](HistoryStore::push_undo) and
//!    [`push_redo`](HistoryStore::push_redo) never touch the opposite stack.
//! 3. With a `max_depth` set, neither stack exceeds it after any operation.
//! 4. A snapshot is never mutated; popping moves it out exactly once.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration for the history store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots retained per stack, or `None` for no
    /// limit. Oldest snapshots are evicted when the limit is exceeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl HistoryConfig {
    /// Keep at most `max_depth` snapshots per stack.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    /// No depth limit. This is the default.
    #[must_use]
    pub fn unlimited() -> Self {
        Self { max_depth: None }
    }
}

/// Immutable capture of buffer state at one point in time.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    data: Box<[u8]>,
    saved_capacity: usize,
}

impl Snapshot {
    /// Capture `content` (the logical bytes) together with the capacity the
    /// buffer had at capture time.
    #[must_use]
    pub fn capture(content: &[u8], capacity: usize) -> Self {
        Self {
            data: content.into(),
            saved_capacity: capacity,
        }
    }

    /// Logical bytes at capture time.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn saved_size(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn saved_capacity(&self) -> usize {
        self.saved_capacity
    }

    /// Approximate heap + inline footprint.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.data.len()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("saved_size", &self.data.len())
            .field("saved_capacity", &self.saved_capacity)
            .finish()
    }
}

/// Dual-stack owner of [`Snapshot`]s.
pub struct HistoryStore {
    /// Snapshots reachable by undo (newest at back).
    undo_stack: VecDeque<Snapshot>,
    /// Snapshots reachable by redo (newest at back).
    redo_stack: VecDeque<Snapshot>,
    config: HistoryConfig,
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryStore {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            config,
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Record the pre-edit state of a forward edit.
    ///
    /// Pushes onto the undo stack and discards every redo snapshot.
    pub fn record_edit(&mut self, content: &[u8], capacity: usize) {
        if !self.redo_stack.is_empty() {
            tracing::debug!(
                discarded = self.redo_stack.len(),
                "history.redo_invalidated"
            );
            self.redo_stack.clear();
        }
        Self::push_bounded(
            &mut self.undo_stack,
            Snapshot::capture(content, capacity),
            self.config.max_depth,
        );
    }

    /// Push onto the undo stack, leaving the redo stack intact.
    pub fn push_undo(&mut self, content: &[u8], capacity: usize) {
        Self::push_bounded(
            &mut self.undo_stack,
            Snapshot::capture(content, capacity),
            self.config.max_depth,
        );
    }

    /// Push onto the redo stack, leaving the undo stack intact.
    pub fn push_redo(&mut self, content: &[u8], capacity: usize) {
        Self::push_bounded(
            &mut self.redo_stack,
            Snapshot::capture(content, capacity),
            self.config.max_depth,
        );
    }

    /// Take the most recent undo snapshot, if any.
    pub fn pop_undo(&mut self) -> Option<Snapshot> {
        self.undo_stack.pop_back()
    }

    /// Take the most recent redo snapshot, if any.
    pub fn pop_redo(&mut self) -> Option<Snapshot> {
        self.redo_stack.pop_back()
    }

    // ====================================================================
    // Query
    // ====================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    #[must_use]
    pub fn total_snapshots(&self) -> usize {
        self.undo_stack.len() + self.redo_stack.len()
    }

    /// Sum of [`Snapshot::size_bytes`] across both stacks.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(Snapshot::size_bytes)
            .sum()
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    /// Drop every snapshot on both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_bounded(
        stack: &mut VecDeque<Snapshot>,
        snapshot: Snapshot,
        max_depth: Option<usize>,
    ) {
        stack.push_back(snapshot);
        let Some(max_depth) = max_depth else {
            return;
        };
        while stack.len() > max_depth {
            stack.pop_front();
            tracing::debug!(max_depth, "history.evicted_oldest");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HistoryStore {
        HistoryStore::new(HistoryConfig::unlimited())
    }

    #[test]
    fn new_store_is_empty() {
        let store = HistoryStore::default();
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert_eq!(store.undo_depth(), 0);
        assert_eq!(store.redo_depth(), 0);
        assert_eq!(store.total_snapshots(), 0);
        assert_eq!(store.total_bytes(), 0);
    }

    #[test]
    fn record_edit_pushes_undo() {
        let mut store = store();
        store.record_edit(b"abc", 10);
        assert!(store.can_undo());
        assert_eq!(store.undo_depth(), 1);
        let snap = store.pop_undo().unwrap();
        assert_eq!(snap.data(), b"abc");
        assert_eq!(snap.saved_size(), 3);
        assert_eq!(snap.saved_capacity(), 10);
    }

    #[test]
    fn record_edit_clears_redo() {
        let mut store = store();
        store.push_redo(b"one", 10);
        store.push_redo(b"two", 10);
        assert_eq!(store.redo_depth(), 2);

        store.record_edit(b"three", 10);
        assert!(!store.can_redo());
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn push_undo_keeps_redo() {
        let mut store = store();
        store.push_redo(b"r", 10);
        store.push_undo(b"u", 10);
        assert_eq!(store.undo_depth(), 1);
        assert_eq!(store.redo_depth(), 1);
    }

    #[test]
    fn push_redo_keeps_undo() {
        let mut store = store();
        store.record_edit(b"u", 10);
        store.push_redo(b"r", 10);
        assert_eq!(store.undo_depth(), 1);
        assert_eq!(store.redo_depth(), 1);
    }

    #[test]
    fn pops_are_lifo() {
        let mut store = store();
        store.record_edit(b"a", 10);
        store.record_edit(b"ab", 10);
        store.record_edit(b"abc", 20);

        assert_eq!(store.pop_undo().unwrap().data(), b"abc");
        assert_eq!(store.pop_undo().unwrap().data(), b"ab");
        assert_eq!(store.pop_undo().unwrap().data(), b"a");
        assert!(store.pop_undo().is_none());
    }

    #[test]
    fn pop_on_empty_returns_none() {
        let mut store = store();
        assert!(store.pop_undo().is_none());
        assert!(store.pop_redo().is_none());
    }

    #[test]
    fn pop_transfers_ownership() {
        let mut store = store();
        store.push_redo(b"xyz", 8);
        let snap = store.pop_redo().unwrap();
        assert_eq!(store.redo_depth(), 0);
        assert_eq!(snap.data(), b"xyz");
        assert_eq!(snap.saved_capacity(), 8);
    }

    #[test]
    fn depth_limit_evicts_oldest() {
        let mut store = HistoryStore::new(HistoryConfig::new(2));
        store.record_edit(b"1", 10);
        store.record_edit(b"2", 10);
        store.record_edit(b"3", 10);

        assert_eq!(store.undo_depth(), 2);
        assert_eq!(store.pop_undo().unwrap().data(), b"3");
        assert_eq!(store.pop_undo().unwrap().data(), b"2");
        assert!(store.pop_undo().is_none());
    }

    #[test]
    fn depth_limit_applies_to_redo() {
        let mut store = HistoryStore::new(HistoryConfig::new(1));
        store.push_redo(b"old", 10);
        store.push_redo(b"new", 10);
        assert_eq!(store.redo_depth(), 1);
        assert_eq!(store.pop_redo().unwrap().data(), b"new");
    }

    #[test]
    fn total_bytes_accounts_for_both_stacks() {
        let mut store = store();
        store.record_edit(b"hello", 10);
        store.push_redo(b"hi", 10);
        let expected = 2 * std::mem::size_of::<Snapshot>() + 5 + 2;
        assert_eq!(store.total_bytes(), expected);
        assert_eq!(store.total_snapshots(), 2);
    }

    #[test]
    fn clear_removes_all() {
        let mut store = store();
        store.record_edit(b"a", 10);
        store.push_redo(b"b", 10);
        store.clear();
        assert_eq!(store.total_snapshots(), 0);
    }

    #[test]
    fn snapshot_is_independent_of_source() {
        let mut live = b"abc".to_vec();
        let snap = Snapshot::capture(&live, 10);
        live[0] = b'z';
        assert_eq!(snap.data(), b"abc");
    }

    #[test]
    fn config_default_and_unlimited() {
        assert_eq!(HistoryConfig::default(), HistoryConfig::unlimited());
        assert_eq!(HistoryConfig::unlimited().max_depth, None);
        assert_eq!(HistoryConfig::new(3).max_depth, Some(3));
    }

    #[test]
    fn default_store_never_evicts() {
        let mut store = HistoryStore::default();
        for i in 0..1500usize {
            store.record_edit(&i.to_le_bytes(), 10);
        }
        assert_eq!(store.undo_depth(), 1500);
        assert_eq!(store.pop_undo().unwrap().data(), &1499usize.to_le_bytes()[..]);
    }

    #[test]
    fn store_debug() {
        let mut store = store();
        store.record_edit(b"a", 10);
        let s = format!("{store:?}");
        assert!(s.contains("HistoryStore"));
        assert!(s.contains("undo_depth"));
        let snap = format!("{:?}", store.pop_undo().unwrap());
        assert!(snap.contains("saved_capacity"));
    }
}
