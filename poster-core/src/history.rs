//! Linear undo/redo history over scene snapshots.
//!
//! The store is an append/truncate log with a cursor. Every entry holds
//! the full serialized scene as it was immediately *before* the action
//! that pushed it, so undo restores pre-action state and redo re-applies
//! the state captured at the subsequent push. Pushing after an undo
//! discards every entry past the cursor: the history is strictly linear.

use serde::{Deserialize, Serialize};

/// One recorded scene snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Serialized scene markup.
    pub markup: String,
    /// Milliseconds since the epoch when the entry was recorded.
    pub timestamp_ms: u64,
}

impl HistoryEntry {
    /// Record a snapshot now.
    #[must_use]
    pub fn new(markup: String) -> Self {
        Self {
            markup,
            timestamp_ms: crate::now_ms(),
        }
    }
}

/// Append/truncate snapshot log with a cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    /// Index of the current entry; `None` before the first push.
    cursor: Option<usize>,
}

impl HistoryStore {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot, discarding any redo entries past the cursor.
    pub fn push(&mut self, markup: String) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(HistoryEntry::new(markup));
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step the cursor back and return the entry now under it.
    /// No-op returning `None` at the start of history.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1)
    }

    /// Step the cursor forward and return the entry now under it.
    /// No-op returning `None` at the end of history.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        self.entries.get(cursor + 1)
    }

    /// Whether undo would change state.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether redo would change state.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|c| c + 1 < self.entries.len())
    }

    /// The entry currently under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor?)
    }

    /// Whether the cursor sits on the newest entry.
    #[must_use]
    pub fn at_tip(&self) -> bool {
        self.cursor
            .is_some_and(|c| c + 1 == self.entries.len())
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(snapshots: &[&str]) -> HistoryStore {
        let mut store = HistoryStore::new();
        for s in snapshots {
            store.push((*s).to_owned());
        }
        store
    }

    #[test]
    fn test_empty_store() {
        let mut store = HistoryStore::new();
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert!(store.undo().is_none());
        assert!(store.redo().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut store = store_with(&["a", "b", "c"]);
        assert_eq!(store.len(), 3);
        assert!(store.can_undo());
        assert!(!store.can_redo());

        assert_eq!(store.undo().map(|e| e.markup.as_str()), Some("b"));
        assert_eq!(store.undo().map(|e| e.markup.as_str()), Some("a"));
        assert!(store.undo().is_none());
        assert!(!store.can_undo());

        assert_eq!(store.redo().map(|e| e.markup.as_str()), Some("b"));
        assert_eq!(store.redo().map(|e| e.markup.as_str()), Some("c"));
        assert!(store.redo().is_none());
        assert!(store.at_tip());
    }

    #[test]
    fn test_push_after_undo_discards_redo() {
        let mut store = store_with(&["a", "b"]);
        assert_eq!(store.undo().map(|e| e.markup.as_str()), Some("a"));
        assert!(store.can_redo());

        store.push("c".to_owned());
        assert!(!store.can_redo());
        assert!(store.redo().is_none());
        assert_eq!(store.len(), 2);
        assert_eq!(store.current().map(|e| e.markup.as_str()), Some("c"));
    }

    #[test]
    fn test_entry_timestamps_set() {
        let store = store_with(&["a"]);
        let entry = store.current().expect("should hold one entry");
        assert!(entry.timestamp_ms > 0);
    }
}
