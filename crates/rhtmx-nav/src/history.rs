// File: src/history.rs
// Purpose: Bounded navigation history with back/forward and branch-truncation

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::query::QueryParams;
use crate::routes::{Params, RouteMetadata};
use crate::scroll::ScrollPosition;

/// Default upper bound on the number of history entries
pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 50;

/// A recorded navigation. Entries are never modified once created.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub path: String,
    pub params: Params,
    pub query: QueryParams,
    /// Scroll offset the page was shown at on arrival
    pub scroll_position: ScrollPosition,
    pub metadata: RouteMetadata,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(path: impl Into<String>, metadata: RouteMetadata) -> Self {
        Self {
            path: path.into(),
            params: Params::new(),
            query: QueryParams::new(),
            scroll_position: ScrollPosition::ORIGIN,
            metadata,
            timestamp: Utc::now(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_scroll_position(mut self, position: ScrollPosition) -> Self {
        self.scroll_position = position;
        self
    }
}

/// Ordered entries plus a cursor.
///
/// Never empty: `0 <= index < len` always holds.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    index: usize,
    max_length: usize,
}

impl History {
    /// Starts a history at `initial`. A `max_length` of zero is raised to one.
    pub fn new(initial: HistoryEntry, max_length: usize) -> Self {
        let mut entries = VecDeque::with_capacity(max_length.min(64));
        entries.push_back(initial);
        Self {
            entries,
            index: 0,
            max_length: max_length.max(1),
        }
    }

    /// Appends `entry` after the cursor.
    ///
    /// Entries after the cursor are discarded first; when the bound is
    /// exceeded the oldest entry is evicted. The cursor ends on the new entry.
    pub fn push(&mut self, entry: HistoryEntry) {
        let discarded = self.entries.len() - (self.index + 1);
        self.entries.truncate(self.index + 1);
        self.entries.push_back(entry);

        let mut evicted = 0;
        while self.entries.len() > self.max_length {
            self.entries.pop_front();
            evicted += 1;
        }

        self.index = self.entries.len() - 1;
        tracing::debug!(
            discarded,
            evicted,
            index = self.index,
            len = self.entries.len(),
            "History entry pushed"
        );
    }

    /// Entry one step back, with its index; the cursor does not move
    pub fn back_target(&self) -> Option<(usize, &HistoryEntry)> {
        let target = self.index.checked_sub(1)?;
        self.entries.get(target).map(|entry| (target, entry))
    }

    /// Entry one step forward, with its index; the cursor does not move
    pub fn forward_target(&self) -> Option<(usize, &HistoryEntry)> {
        let target = self.index + 1;
        self.entries.get(target).map(|entry| (target, entry))
    }

    /// Moves the cursor; out-of-range indexes are refused
    pub fn move_to(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// History always holds at least the initial entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(path: &str) -> HistoryEntry {
        HistoryEntry::new(path, RouteMetadata::untitled())
    }

    fn history(paths: &[&str], max: usize) -> History {
        let mut history = History::new(entry(paths[0]), max);
        for path in &paths[1..] {
            history.push(entry(path));
        }
        history
    }

    #[test]
    fn test_starts_with_the_initial_entry() {
        let history = History::new(entry("/"), 50);
        assert!(!history.is_empty());
        assert_eq!(history.len(), 1);
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_push_moves_cursor_to_tip() {
        let history = history(&["/a", "/b", "/c"], 50);
        assert_eq!(history.paths(), vec!["/a", "/b", "/c"]);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().path, "/c");
    }

    #[test]
    fn test_push_after_going_back_truncates() {
        let mut history = history(&["/a", "/b", "/c"], 50);
        assert!(history.move_to(0));
        history.push(entry("/d"));
        assert_eq!(history.paths(), vec!["/a", "/d"]);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_eviction_drops_oldest_first() {
        let mut history = History::new(entry("/0"), 50);
        for i in 1..=50 {
            history.push(entry(&format!("/{}", i)));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.paths()[0], "/1");
        assert_eq!(history.paths()[49], "/50");
        assert_eq!(history.index(), 49);
    }

    #[test]
    fn test_zero_bound_keeps_one_entry() {
        let history = history(&["/a", "/b"], 0);
        assert_eq!(history.max_length(), 1);
        assert_eq!(history.paths(), vec!["/b"]);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_targets_at_the_edges() {
        let mut history = history(&["/a", "/b"], 50);
        assert!(history.forward_target().is_none());
        assert_eq!(history.back_target().map(|(i, e)| (i, e.path.as_str())), Some((0, "/a")));

        history.move_to(0);
        assert!(history.back_target().is_none());
        assert!(!history.can_go_back());
        assert!(history.can_go_forward());
        assert!(!history.move_to(2));
        assert_eq!(history.index(), 0);
    }
}
