//! Bounded response cache with insertion-order eviction.

use std::collections::{HashMap, VecDeque};

/// Maps query text to the remote suggestions returned for it.
///
/// When full, the entry inserted first is dropped, regardless of how recently
/// it was read. Entries never expire by age.
#[derive(Debug, Clone)]
pub struct FifoCache {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, Vec<String>>,
}

impl FifoCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, query: &str) -> Option<&Vec<String>> {
        self.entries.get(query)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    /// Store `suggestions` for `query`.
    ///
    /// Replacing an existing entry keeps its original position in the eviction
    /// order. Returns the evicted query, if any.
    pub fn insert(&mut self, query: String, suggestions: Vec<String>) -> Option<String> {
        if self.capacity == 0 {
            return None;
        }
        if let Some(existing) = self.entries.get_mut(&query) {
            *existing = suggestions;
            return None;
        }

        self.order.push_back(query.clone());
        self.entries.insert(query, suggestions);

        if self.order.len() > self.capacity {
            let evicted = self.order.pop_front()?;
            self.entries.remove(&evicted);
            return Some(evicted);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
