//! # Undo/Redo History
//!
//! Bounded, linear log of `(blocks, metadata)` snapshots with a pointer to
//! the current entry.
//!
//! ## Design
//!
//! - Each commit drops every entry right of the pointer (branch discard),
//!   appends a copy of the new state and moves the pointer onto it
//! - The oldest entry is evicted once the log exceeds its capacity
//! - Debounced pushes park the state in a single pending slot; a newer
//!   push replaces it and restarts the quiet period, so a burst of
//!   keystrokes turns into one entry holding the final state
//! - Undo and redo hand back copies; nothing handed out aliases the log
//!
//! ```text
//!   [A, B, C]  pointer=2
//!   undo, undo            → pointer=0
//!   push D                → [A, D] pointer=1
//! ```
//!
//! Time is read from a [`Clock`]; the host calls [`History::poll`] from its
//! event loop to fire a commit whose quiet period has elapsed.

use crate::clock::{Clock, SystemClock};
use crate::config::HistoryConfig;
use folio_model::{Block, ReportMetadata};
use std::sync::Arc;
use std::time::Instant;

/// One immutable snapshot of the document
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub blocks: Vec<Block>,
    pub metadata: ReportMetadata,
}

impl HistoryEntry {
    pub fn new(blocks: &[Block], metadata: &ReportMetadata) -> Self {
        Self {
            blocks: blocks.to_vec(),
            metadata: metadata.clone(),
        }
    }
}

/// A debounced commit waiting for its quiet period to pass
#[derive(Debug)]
struct PendingCommit {
    entry: HistoryEntry,
    deadline: Instant,
}

#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,

    /// Index of the current entry, always within `entries`
    pointer: usize,

    pending: Option<PendingCommit>,
    config: HistoryConfig,
    clock: Arc<dyn Clock>,
}

impl History {
    /// History holding a single entry for the initial state
    pub fn new(blocks: &[Block], metadata: &ReportMetadata, config: HistoryConfig) -> Self {
        Self::with_clock(blocks, metadata, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        blocks: &[Block],
        metadata: &ReportMetadata,
        config: HistoryConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: vec![HistoryEntry::new(blocks, metadata)],
            pointer: 0,
            pending: None,
            config: config.normalized(),
            clock,
        }
    }

    /// Record a new state. Debounced pushes are coalesced; immediate ones
    /// first drop any pending commit, since they carry the newer state.
    pub fn push_state(&mut self, blocks: &[Block], metadata: &ReportMetadata, debounce: bool) {
        self.poll();
        let entry = HistoryEntry::new(blocks, metadata);

        if debounce {
            let deadline = self.clock.now() + self.config.debounce();
            if self.pending.replace(PendingCommit { entry, deadline }).is_some() {
                tracing::trace!("history: rescheduled pending commit");
            }
        } else {
            self.pending = None;
            self.commit(entry);
        }
    }

    /// Commit the pending entry if its quiet period is over.
    /// Returns true when a commit happened.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        let due = self.pending.as_ref().map_or(false, |pending| now >= pending.deadline);
        if due {
            self.flush()
        } else {
            false
        }
    }

    /// Commit the pending entry right away, if there is one.
    /// Returns true when a new entry was added.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => self.commit(pending.entry),
            None => false,
        }
    }

    /// An entry equal to the current one is dropped, e.g. a burst of edits
    /// that ends where it started
    fn commit(&mut self, entry: HistoryEntry) -> bool {
        if self.entries[self.pointer] == entry {
            tracing::trace!("history: state unchanged, nothing to commit");
            return false;
        }

        self.entries.truncate(self.pointer + 1);
        self.entries.push(entry);

        let capacity = self.config.capacity;
        if self.entries.len() > capacity {
            let excess = self.entries.len() - capacity;
            self.entries.drain(..excess);
            tracing::trace!("history: evicted {} oldest entries", excess);
        }
        self.pointer = self.entries.len() - 1;
        true
    }

    /// Step back one entry. A pending edit is committed first so that it is
    /// the one being undone.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        self.flush();
        if self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        Some(self.entries[self.pointer].clone())
    }

    pub fn redo(&mut self) -> Option<HistoryEntry> {
        self.flush();
        if self.pointer + 1 >= self.entries.len() {
            return None;
        }
        self.pointer += 1;
        Some(self.entries[self.pointer].clone())
    }

    /// Replace the whole log with a single entry. Any pending commit is dropped.
    pub fn reset(&mut self, blocks: &[Block], metadata: &ReportMetadata) {
        self.pending = None;
        self.entries = vec![HistoryEntry::new(blocks, metadata)];
        self.pointer = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0 || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.pending.is_none() && self.pointer + 1 < self.entries.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of committed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.pointer]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn state(label: &str) -> Vec<Block> {
        vec![Block::text("t", label)]
    }

    fn history_with_clock(capacity: usize) -> (History, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let config = HistoryConfig {
            capacity,
            debounce_ms: 500,
        };
        let history = History::with_clock(&state("A"), &ReportMetadata::default(), config, clock.clone());
        (history, clock)
    }

    fn labels(history: &History) -> Vec<String> {
        history.entries().iter().map(|e| e.blocks[0].content.clone()).collect()
    }

    #[test]
    fn test_history_creation() {
        let (history, _) = history_with_clock(50);
        assert_eq!(history.len(), 1);
        assert_eq!(history.pointer(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_walks_pointer() {
        let (mut history, _) = history_with_clock(50);
        let meta = ReportMetadata::default();
        history.push_state(&state("B"), &meta, false);
        history.push_state(&state("C"), &meta, false);

        assert_eq!(history.undo().unwrap().blocks, state("B"));
        assert_eq!(history.undo().unwrap().blocks, state("A"));
        assert!(history.undo().is_none());

        assert_eq!(history.redo().unwrap().blocks, state("B"));
        assert!(history.can_redo());
    }

    #[test]
    fn test_new_commit_discards_future() {
        let (mut history, _) = history_with_clock(50);
        let meta = ReportMetadata::default();
        history.push_state(&state("B"), &meta, false);
        history.push_state(&state("C"), &meta, false);
        history.undo();
        history.undo();

        history.push_state(&state("D"), &meta, false);
        assert_eq!(labels(&history), vec!["A", "D"]);
        assert_eq!(history.pointer(), 1);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_debounced_pushes_coalesce() {
        let (mut history, clock) = history_with_clock(50);
        let meta = ReportMetadata::default();

        for i in 0..10 {
            history.push_state(&state(&format!("v{}", i)), &meta, true);
            clock.advance(Duration::from_millis(100));
        }
        assert_eq!(history.len(), 1);
        assert!(history.has_pending());

        clock.advance(Duration::from_millis(400));
        assert!(history.poll());
        assert_eq!(labels(&history), vec!["A", "v9"]);
        assert!(!history.poll());
    }

    #[test]
    fn test_poll_waits_for_quiet_period() {
        let (mut history, clock) = history_with_clock(50);
        history.push_state(&state("B"), &ReportMetadata::default(), true);

        clock.advance(Duration::from_millis(499));
        assert!(!history.poll());
        clock.advance(Duration::from_millis(1));
        assert!(history.poll());
    }

    #[test]
    fn test_immediate_push_drops_pending() {
        let (mut history, _) = history_with_clock(50);
        let meta = ReportMetadata::default();
        history.push_state(&state("typing"), &meta, true);
        history.push_state(&state("structural"), &meta, false);

        assert!(!history.has_pending());
        assert_eq!(labels(&history), vec!["A", "structural"]);
    }

    #[test]
    fn test_undo_commits_pending_edit_first() {
        let (mut history, _) = history_with_clock(50);
        history.push_state(&state("B"), &ReportMetadata::default(), true);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        let entry = history.undo().unwrap();
        assert_eq!(entry.blocks, state("A"));
        assert_eq!(labels(&history), vec!["A", "B"]);
        assert!(history.can_redo());
    }

    #[test]
    fn test_burst_ending_on_current_state_adds_nothing() {
        let (mut history, clock) = history_with_clock(50);
        let meta = ReportMetadata::default();
        history.push_state(&state("B"), &meta, false);

        history.push_state(&state("Ba"), &meta, true);
        history.push_state(&state("B"), &meta, true);
        clock.advance(Duration::from_millis(500));

        assert!(!history.poll());
        assert!(!history.has_pending());
        assert_eq!(labels(&history), vec!["A", "B"]);
        assert_eq!(history.undo().unwrap().blocks, state("A"));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_unchanged_flush_keeps_redo() {
        let (mut history, _) = history_with_clock(50);
        let meta = ReportMetadata::default();
        history.push_state(&state("B"), &meta, false);
        history.undo();

        history.push_state(&state("A"), &meta, true);
        assert!(!history.flush());
        assert_eq!(labels(&history), vec!["A", "B"]);
        assert!(history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let (mut history, _) = history_with_clock(3);
        let meta = ReportMetadata::default();
        for label in ["B", "C", "D", "E"] {
            history.push_state(&state(label), &meta, false);
        }

        assert_eq!(labels(&history), vec!["C", "D", "E"]);
        assert_eq!(history.pointer(), 2);
        history.undo();
        assert_eq!(history.undo().unwrap().blocks, state("C"));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_reset_drops_everything() {
        let (mut history, _) = history_with_clock(50);
        let meta = ReportMetadata::default();
        history.push_state(&state("B"), &meta, false);
        history.push_state(&state("C"), &meta, true);

        history.reset(&state("Z"), &meta);
        assert_eq!(labels(&history), vec!["Z"]);
        assert!(!history.has_pending());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_returned_entries_are_copies() {
        let (mut history, _) = history_with_clock(50);
        let meta = ReportMetadata::default();
        history.push_state(&state("B"), &meta, false);

        let mut entry = history.undo().unwrap();
        entry.blocks[0].content = "mutated".to_string();
        assert_eq!(history.current().blocks, state("A"));
    }
}
