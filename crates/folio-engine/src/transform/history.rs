//! # Undo/Redo History
//!
//! Snapshot-based history of history-tagged transactions.
//!
//! - Each history-tagged transaction records the document and selection it replaced
//! - Undo restores the most recent snapshot and moves the current state to the redo stack
//! - Redo reapplies the undone state
//! - New entries clear the redo stack
//! - "No-history" transactions never enter the stacks

use crate::model::{Document, Selection};

/// A recorded editor state
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub doc: Document,
    pub selection: Selection,
    pub label: Option<String>,
}

#[derive(Debug)]
pub struct History {
    /// Most recent last
    undo_stack: Vec<HistoryEntry>,
    /// Most recent last
    redo_stack: Vec<HistoryEntry>,
    /// Maximum number of undo levels (0 = unlimited)
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record the state a transaction is about to replace
    pub fn record(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();

        if self.max_depth > 0 && self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(0..excess);
        }
    }

    /// Pop the state to restore, stashing `current` for redo
    pub fn undo(&mut self, mut current: HistoryEntry) -> Option<HistoryEntry> {
        let previous = self.undo_stack.pop()?;
        current.label = previous.label.clone();
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pop the state to reapply, stashing `current` for undo
    pub fn redo(&mut self, mut current: HistoryEntry) -> Option<HistoryEntry> {
        let next = self.redo_stack.pop()?;
        current.label = next.label.clone();
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Label of the step `undo` would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().and_then(|entry| entry.label.as_deref())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build::*;

    fn entry(content: &str) -> HistoryEntry {
        HistoryEntry {
            doc: doc(vec![para(content)]),
            selection: Selection::cursor(1),
            label: Some(content.to_string()),
        }
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::default();
        history.record(entry("one"));

        let restored = history.undo(entry("two")).unwrap();
        assert_eq!(restored.doc.text_content(), "one");
        assert!(history.can_redo());

        let reapplied = history.redo(entry("one")).unwrap();
        assert_eq!(reapplied.doc.text_content(), "two");
        assert!(history.can_undo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::default();
        history.record(entry("one"));
        history.undo(entry("two"));

        history.record(entry("three"));

        assert!(!history.can_redo());
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut history = History::new(2);
        history.record(entry("one"));
        history.record(entry("two"));
        history.record(entry("three"));

        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo_label(), Some("three"));
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut history = History::default();
        assert!(history.undo(entry("current")).is_none());
        assert!(!history.can_redo());
    }
}
