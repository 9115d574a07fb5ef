//! Bounded undo/redo ring over full buffer snapshots, deduped by content
//! hash so no-op edits don't grow the stack.

use ahash::AHasher;
use std::hash::{Hash, Hasher};

#[derive(Clone)]
struct Snapshot {
    text: String,
    cursor: usize,
    hash: u64,
}

fn hash_text(s: &str) -> u64 {
    let mut h = AHasher::default();
    s.hash(&mut h);
    h.finish()
}

pub struct UndoEngine {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    capacity: usize,
    dropped: u64,
}

impl UndoEngine {
    pub fn new(capacity: usize) -> Self {
        Self { undo_stack: Vec::new(), redo_stack: Vec::new(), capacity: capacity.max(1), dropped: 0 }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn dropped_snapshots(&self) -> u64 {
        self.dropped
    }

    /// Called immediately before a structural mutation. A snapshot identical
    /// to the last one is skipped; pushing a new snapshot clears the redo
    /// tail (future edits invalidate it) and silently drops the oldest
    /// snapshot once the ring is full.
    pub fn push_snapshot(&mut self, text: &str, cursor: usize) {
        let hash = hash_text(text);
        if self.undo_stack.last().map(|s| s.hash) == Some(hash) {
            return;
        }
        self.undo_stack.push(Snapshot { text: text.to_string(), cursor, hash });
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
            self.dropped += 1;
        }
        self.redo_stack.clear();
    }

    /// Restores the previous snapshot, pushing the current state onto the
    /// redo stack. Returns the restored `(text, cursor)`, or `None` if the
    /// undo stack is empty.
    pub fn undo(&mut self, current_text: &str, current_cursor: usize) -> Option<(String, usize)> {
        let snap = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot { text: current_text.to_string(), cursor: current_cursor, hash: hash_text(current_text) });
        Some((snap.text, snap.cursor))
    }

    pub fn redo(&mut self, current_text: &str, current_cursor: usize) -> Option<(String, usize)> {
        let snap = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot { text: current_text.to_string(), cursor: current_cursor, hash: hash_text(current_text) });
        Some((snap.text, snap.cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_restores_prior_snapshot() {
        let mut u = UndoEngine::new(10);
        u.push_snapshot("hello", 5);
        let (text, cursor) = u.undo("hello world", 11).unwrap();
        assert_eq!(text, "hello");
        assert_eq!(cursor, 5);
    }

    #[test]
    fn redo_after_undo_restores_current() {
        let mut u = UndoEngine::new(10);
        u.push_snapshot("hello", 5);
        let (_, _) = u.undo("hello world", 11).unwrap();
        let (text, cursor) = u.redo("hello", 5).unwrap();
        assert_eq!(text, "hello world");
        assert_eq!(cursor, 11);
    }

    #[test]
    fn identical_consecutive_snapshots_are_deduped() {
        let mut u = UndoEngine::new(10);
        u.push_snapshot("same", 0);
        u.push_snapshot("same", 0);
        assert_eq!(u.undo_depth(), 1);
    }

    #[test]
    fn ring_drops_oldest_past_capacity() {
        let mut u = UndoEngine::new(2);
        u.push_snapshot("a", 0);
        u.push_snapshot("b", 0);
        u.push_snapshot("c", 0);
        assert_eq!(u.undo_depth(), 2);
        assert_eq!(u.dropped_snapshots(), 1);
    }

    #[test]
    fn new_edit_after_undo_clears_redo() {
        let mut u = UndoEngine::new(10);
        u.push_snapshot("a", 0);
        u.undo("b", 0);
        u.push_snapshot("c", 0);
        assert_eq!(u.redo_depth(), 0);
    }
}
