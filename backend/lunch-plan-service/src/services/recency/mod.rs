// ============================================
// Recency Store (最近推薦記錄)
// ============================================
//
// Short per-category memory of recently shown template ids, newest first.
// Used to bias selection away from repeats across sessions.
//
// Invariants per category:
// - at most RECENCY_CAPACITY ids
// - no duplicates
//
// The engine treats the store as synchronous and always available.
// Backends that can fail log the failure and degrade to "no history".

mod redis_store;

pub use redis_store::RedisRecencyStore;

use crate::models::Category;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use thiserror::Error;

/// Ids remembered per category.
pub const RECENCY_CAPACITY: usize = 5;

#[derive(Debug, Error)]
pub enum RecencyError {
    #[error("Redis error: {0}")]
    RedisError(String),
}

impl From<redis::RedisError> for RecencyError {
    fn from(e: redis::RedisError) -> Self {
        RecencyError::RedisError(e.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait RecencyStore: Send + Sync {
    /// Recent ids for `category`, newest first.
    fn get(&self, category: Category) -> Vec<u64>;

    /// Moves `id` to the front, dropping anything past capacity.
    fn add(&self, category: Category, id: u64);

    fn clear(&self, category: Category);
}

/// Apply an `add` to an ordered history in place.
pub(crate) fn push_recent(history: &mut VecDeque<u64>, id: u64) {
    history.retain(|&existing| existing != id);
    history.push_front(id);
    history.truncate(RECENCY_CAPACITY);
}

/// Process-local store. Default backend and the one used in tests.
#[derive(Debug, Default)]
pub struct InMemoryRecencyStore {
    records: Mutex<HashMap<Category, VecDeque<u64>>>,
}

impl InMemoryRecencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<Category, VecDeque<u64>>> {
        // 記錄只是提示，poisoned 時照常使用
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecencyStore for InMemoryRecencyStore {
    fn get(&self, category: Category) -> Vec<u64> {
        self.records()
            .get(&category)
            .map(|history| history.iter().copied().collect())
            .unwrap_or_default()
    }

    fn add(&self, category: Category, id: u64) {
        let mut records = self.records();
        push_recent(records.entry(category).or_default(), id);
    }

    fn clear(&self, category: Category) {
        self.records().remove(&category);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_add_prepends_newest_first() {
        let store = InMemoryRecencyStore::new();
        store.add(Category::Cheap, 1);
        store.add(Category::Cheap, 2);
        store.add(Category::Cheap, 3);
        assert_eq!(store.get(Category::Cheap), vec![3, 2, 1]);
    }

    #[test]
    fn test_add_existing_moves_to_front() {
        let store = InMemoryRecencyStore::new();
        for id in [1, 2, 3] {
            store.add(Category::Light, id);
        }
        store.add(Category::Light, 1);
        assert_eq!(store.get(Category::Light), vec![1, 3, 2]);
    }

    #[test]
    fn test_capacity_and_uniqueness_after_many_adds() {
        let store = InMemoryRecencyStore::new();
        let ids = [4, 8, 4, 15, 16, 23, 42, 8, 8, 1, 42, 7];
        for id in ids {
            store.add(Category::Easy, id);
            let history = store.get(Category::Easy);
            assert!(history.len() <= RECENCY_CAPACITY);
            let unique: HashSet<_> = history.iter().collect();
            assert_eq!(unique.len(), history.len());
            assert_eq!(history[0], id);
        }
        assert_eq!(store.get(Category::Easy), vec![7, 42, 1, 8, 23]);
    }

    #[test]
    fn test_categories_are_independent() {
        let store = InMemoryRecencyStore::new();
        store.add(Category::Cheap, 1);
        store.add(Category::Easy, 2);
        store.clear(Category::Cheap);

        assert!(store.get(Category::Cheap).is_empty());
        assert_eq!(store.get(Category::Easy), vec![2]);
        assert!(store.get(Category::Light).is_empty());
    }
}
