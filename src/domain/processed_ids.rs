//! In-memory set of link ids already resolved in this process.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Deduplication set for successfully resolved links.
///
/// Unbounded and never persisted; it lives as long as the resolver.
#[derive(Debug, Default)]
pub struct ProcessedIds {
    ids: Mutex<HashSet<String>>,
}

impl ProcessedIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Records `id`; returns false if it was already present.
    pub fn insert(&self, id: &str) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
