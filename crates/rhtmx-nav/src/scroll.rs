// File: src/scroll.rs
// Purpose: Per-path scroll offsets and the viewport they are read from

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Viewport offset in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    pub const ORIGIN: ScrollPosition = ScrollPosition { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Last known offset of every visited path. Entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct ScrollStore {
    positions: HashMap<String, ScrollPosition>,
}

impl ScrollStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `position` for `path`, replacing any earlier one
    pub fn save(&mut self, path: &str, position: ScrollPosition) {
        tracing::debug!(path, x = position.x, y = position.y, "Scroll position saved");
        self.positions.insert(path.to_string(), position);
    }

    pub fn get(&self, path: &str) -> Option<ScrollPosition> {
        self.positions.get(path).copied()
    }

    /// Stored offset for `path`, or the origin for unvisited paths
    pub fn restore_target(&self, path: &str) -> ScrollPosition {
        self.get(path).unwrap_or(ScrollPosition::ORIGIN)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// The scrollable surface of the host page
pub trait Viewport: Send + Sync {
    /// Current offset
    fn offset(&self) -> ScrollPosition;

    fn scroll_to(&self, position: ScrollPosition);
}

/// Headless viewport that only remembers its offset
#[derive(Debug, Default)]
pub struct MemoryViewport {
    offset: Mutex<ScrollPosition>,
}

impl MemoryViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the user scrolling
    pub fn set_offset(&self, position: ScrollPosition) {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner) = position;
    }
}

impl Viewport for MemoryViewport {
    fn offset(&self) -> ScrollPosition {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn scroll_to(&self, position: ScrollPosition) {
        self.set_offset(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut store = ScrollStore::new();
        store.save("/about", ScrollPosition::new(0.0, 100.0));
        store.save("/about", ScrollPosition::new(10.0, 20.0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.restore_target("/about"), ScrollPosition::new(10.0, 20.0));
    }

    #[test]
    fn test_unvisited_path_restores_origin() {
        let store = ScrollStore::new();
        assert_eq!(store.get("/never"), None);
        assert_eq!(store.restore_target("/never"), ScrollPosition::ORIGIN);
    }

    #[test]
    fn test_memory_viewport() {
        let viewport = MemoryViewport::new();
        assert_eq!(viewport.offset(), ScrollPosition::ORIGIN);
        viewport.scroll_to(ScrollPosition::new(3.0, 4.0));
        assert_eq!(viewport.offset(), ScrollPosition::new(3.0, 4.0));
    }
}
