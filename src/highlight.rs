// Highlight registry - transient emphasis on recently changed elements

use crate::graph_store::{EdgeKey, NodeId};
use std::collections::HashMap;

/// How many clock ticks a registration stays visible.
pub const HIGHLIGHT_TICKS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKey {
    Node(NodeId),
    Edge(EdgeKey),
}

/// Registry of element -> expiry tick. Each registration expires
/// independently; mode changes clear the whole set at once.
#[derive(Default)]
pub struct Highlights {
    entries: HashMap<HighlightKey, u64>,
}

impl Highlights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: HighlightKey, now: u64) {
        self.entries.insert(key, now + HIGHLIGHT_TICKS);
    }

    pub fn contains(&self, key: HighlightKey, now: u64) -> bool {
        self.entries.get(&key).is_some_and(|&expiry| now < expiry)
    }

    pub fn remove(&mut self, key: HighlightKey) {
        self.entries.remove(&key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop expired entries. Safe to call at any tick; reads are
    /// already expiry-checked, so this is only bookkeeping.
    pub fn prune(&mut self, now: u64) {
        self.entries.retain(|_, &mut expiry| now < expiry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
