//! In-memory storage adapter
//!
//! # Design
//!
//! - DashMap: sharded, lock-free reads, writes lock only the target shard
//! - Keys are the engine's string keys verbatim (`$schema`, `$nodes`, uids, ...)
//! - Values are stored as `serde_json::Value` without re-encoding
//!
//! Suitable for embedding, tests, and as the base of a [`StagedStore`].
//!
//! [`StagedStore`]: crate::StagedStore

use dashmap::DashMap;
use serde_json::Value;

use crate::adapter::KvStore;

/// Thread-safe in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: DashMap<String, Value>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Create a store with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: DashMap::with_capacity(capacity),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `key` holds a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }
}
