//! Recency order of resident pages.
//!
//! Each access stamps the page with a monotonically increasing tick. The
//! smallest live tick is the least recently used page, so moving a page to the
//! most-recent end is "drop old tick, insert new tick" rather than a linear
//! remove from a list.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct LruTracker {
    /// tick -> page, ordered oldest first
    order: BTreeMap<u64, u64>,
    /// page -> its current tick
    ticks: HashMap<u64, u64>,
    clock: u64,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    #[inline]
    pub fn contains(&self, page: u64) -> bool {
        self.ticks.contains_key(&page)
    }

    /// Append `page` at the most-recently-used end.
    ///
    /// A page already tracked is moved rather than duplicated.
    pub fn push_back(&mut self, page: u64) {
        let tick = self.clock;
        self.clock += 1;
        if let Some(old) = self.ticks.insert(page, tick) {
            self.order.remove(&old);
        }
        self.order.insert(tick, page);
    }

    /// Move a tracked page to the most-recently-used end.
    ///
    /// Returns false if the page is not tracked.
    pub fn touch(&mut self, page: u64) -> bool {
        if !self.contains(page) {
            return false;
        }
        self.push_back(page);
        true
    }

    /// Remove and return the least recently used page
    pub fn pop_front(&mut self) -> Option<u64> {
        let (_, page) = self.order.pop_first()?;
        self.ticks.remove(&page);
        Some(page)
    }

    /// Pages from least to most recently used
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.order.values().copied()
    }
}
