//! Bounded linear undo/redo history.
//!
//! Two stacks of snapshots share a single capacity: `undo + redo <= max`.
//! Committing clears the redo stack, so history never branches. When the
//! capacity is exceeded the oldest undo entry is evicted first, then the
//! oldest redo entry. The live state is never stored here; callers hand it
//! over (through a capture closure) only when a transition actually happens.

use std::collections::VecDeque;

use tracing::debug;

/// Undo/redo stacks of full snapshots.
#[derive(Debug, Clone)]
pub struct HistoryManager<T> {
    /// Most recent at the back
    undo_stack: VecDeque<T>,
    /// Most recent at the back
    redo_stack: VecDeque<T>,
    max_history: usize,
}

impl<T> HistoryManager<T> {
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_history,
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Change the capacity, evicting immediately if needed.
    pub fn set_max_history(&mut self, max_history: usize) {
        self.max_history = max_history;
        self.enforce_bound();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Total stored snapshots.
    pub fn len(&self) -> usize {
        self.undo_stack.len() + self.redo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record the state from before a stroke-step. Discards all redo entries.
    pub fn commit(&mut self, snapshot: T) {
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
        self.enforce_bound();
    }

    /// Step back one entry.
    ///
    /// `capture_live` is called only if an entry exists; its result goes onto
    /// the redo stack. Returns the snapshot that should become live, or
    /// `None` if there was nothing to undo.
    pub fn undo(&mut self, capture_live: impl FnOnce() -> T) -> Option<T> {
        let Some(previous) = self.undo_stack.pop_back() else {
            debug!("Undo: no entries available");
            return None;
        };
        self.redo_stack.push_back(capture_live());
        self.enforce_bound();
        Some(previous)
    }

    /// Step forward one entry. The live state goes onto the undo stack
    /// without clearing the remaining redo entries.
    pub fn redo(&mut self, capture_live: impl FnOnce() -> T) -> Option<T> {
        let Some(next) = self.redo_stack.pop_back() else {
            debug!("Redo: no entries available");
            return None;
        };
        self.undo_stack.push_back(capture_live());
        self.enforce_bound();
        Some(next)
    }

    /// Drop every stored snapshot.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Evict oldest entries, undo stack first, until within capacity.
    fn enforce_bound(&mut self) -> usize {
        let mut evicted = 0;
        while self.len() > self.max_history {
            if self.undo_stack.pop_front().is_none() {
                self.redo_stack.pop_front();
            }
            evicted += 1;
        }
        if evicted > 0 {
            debug!(
                "History: evicted {} snapshot(s), {} undo / {} redo remain",
                evicted,
                self.undo_stack.len(),
                self.redo_stack.len()
            );
        }
        evicted
    }
}

impl<T> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new(sculpt_config::DEFAULT_MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Live value plus its history, the way a session drives it.
    struct Doc {
        live: u32,
        history: HistoryManager<u32>,
    }

    impl Doc {
        fn new(max: usize) -> Self {
            Self {
                live: 0,
                history: HistoryManager::new(max),
            }
        }

        fn edit(&mut self, value: u32) {
            self.history.commit(self.live);
            self.live = value;
        }

        fn undo(&mut self) -> bool {
            let live = self.live;
            match self.history.undo(|| live) {
                Some(previous) => {
                    self.live = previous;
                    true
                }
                None => false,
            }
        }

        fn redo(&mut self) -> bool {
            let live = self.live;
            match self.history.redo(|| live) {
                Some(next) => {
                    self.live = next;
                    true
                }
                None => false,
            }
        }
    }

    #[test]
    fn test_commit_then_undo_restores() {
        let mut doc = Doc::new(10);
        doc.edit(1);
        assert!(doc.history.can_undo());
        assert!(doc.undo());
        assert_eq!(doc.live, 0);
        assert!(!doc.history.can_undo());
        assert!(doc.history.can_redo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut doc = Doc::new(10);
        doc.edit(1);
        doc.edit(2);
        doc.edit(3);

        assert!(doc.undo());
        assert_eq!(doc.live, 2);
        assert!(doc.redo());
        assert_eq!(doc.live, 3);
        assert_eq!(doc.history.undo_count(), 3);
        assert_eq!(doc.history.redo_count(), 0);
    }

    #[test]
    fn test_redo_keeps_remaining_redo_entries() {
        let mut doc = Doc::new(10);
        doc.edit(1);
        doc.edit(2);
        doc.undo();
        doc.undo();
        assert_eq!(doc.history.redo_count(), 2);

        assert!(doc.redo());
        assert_eq!(doc.live, 1);
        assert_eq!(doc.history.redo_count(), 1);
        assert!(doc.redo());
        assert_eq!(doc.live, 2);
    }

    #[test]
    fn test_commit_after_undo_discards_redo() {
        let mut doc = Doc::new(10);
        doc.edit(10); // A
        doc.edit(20); // B
        doc.undo(); // back to A
        doc.edit(30); // C
        assert!(!doc.history.can_redo());
        assert!(!doc.redo());
        assert_eq!(doc.live, 30);
    }

    #[test]
    fn test_underflow_is_noop() {
        let mut doc = Doc::new(10);
        let mut captured = false;
        assert!(doc.history.undo(|| {
            captured = true;
            0
        })
        .is_none());
        assert!(!captured);
        assert!(!doc.redo());
        assert_eq!(doc.live, 0);
        assert!(doc.history.is_empty());
    }

    #[test]
    fn test_size_never_exceeds_bound() {
        let mut doc = Doc::new(3);
        for value in 1..=10 {
            doc.edit(value);
            assert!(doc.history.len() <= 3);
        }
        assert_eq!(doc.history.undo_count(), 3);

        // Oldest were evicted: three undos land on 7
        doc.undo();
        doc.undo();
        doc.undo();
        assert_eq!(doc.live, 7);
        assert!(!doc.undo());
        assert_eq!(doc.live, 7);
    }

    #[test]
    fn test_bound_holds_across_interleavings() {
        let mut doc = Doc::new(4);
        let script = [1, 1, 0, 1, 2, 2, 1, 0, 0, 1, 2, 1, 1, 1, 0, 0, 0, 0, 0, 2, 2, 2];
        let mut next = 100;
        for op in script {
            match op {
                0 => {
                    doc.undo();
                }
                1 => {
                    next += 1;
                    doc.edit(next);
                }
                _ => {
                    doc.redo();
                }
            }
            assert!(doc.history.len() <= 4);
        }
    }

    #[test]
    fn test_shrinking_evicts_undo_first() {
        let mut history = HistoryManager::new(10);
        for value in 0..4 {
            history.commit(value);
        }
        // Move two entries to the redo stack
        history.undo(|| 99);
        history.undo(|| 98);
        assert_eq!((history.undo_count(), history.redo_count()), (2, 2));

        history.set_max_history(3);
        assert_eq!((history.undo_count(), history.redo_count()), (1, 2));

        history.set_max_history(1);
        assert_eq!((history.undo_count(), history.redo_count()), (0, 1));
        // Oldest redo entry went first; the most recent undo target remains
        assert_eq!(history.redo(|| 0), Some(98));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut history = HistoryManager::new(0);
        history.commit(1);
        assert!(history.is_empty());
        assert!(history.undo(|| 0).is_none());
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryManager::default();
        history.commit(1);
        history.commit(2);
        history.undo(|| 3);
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.max_history(), sculpt_config::DEFAULT_MAX_HISTORY);
    }
}
