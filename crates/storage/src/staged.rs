//! Write-buffering overlay over another adapter.
//!
//! A [`StagedStore`] reads through to its base adapter but keeps every `set`
//! in a local buffer. Nothing reaches the base until [`StagedStore::commit`]
//! is called; dropping the overlay discards the buffered writes. The graph
//! engine uses it to run an insertion batch all-or-nothing.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::adapter::KvStore;

#[derive(Default)]
struct Pending {
    values: FxHashMap<String, Value>,
    /// Keys in first-write order, so commit replays writes in the order the
    /// engine issued them.
    order: Vec<String>,
}

/// Buffered overlay over a base [`KvStore`].
pub struct StagedStore<'a> {
    base: &'a dyn KvStore,
    pending: Mutex<Pending>,
}

impl<'a> StagedStore<'a> {
    /// Create an overlay with an empty buffer.
    pub fn new(base: &'a dyn KvStore) -> Self {
        Self {
            base,
            pending: Mutex::new(Pending::default()),
        }
    }

    /// Number of distinct keys written since creation.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().order.len()
    }

    /// Apply every buffered write to the base adapter, returning how many
    /// keys were written.
    pub fn commit(self) -> usize {
        let Pending { mut values, order } = self.pending.into_inner();
        let written = order.len();
        for key in order {
            if let Some(value) = values.remove(&key) {
                self.base.set(&key, value);
            }
        }
        written
    }
}

impl KvStore for StagedStore<'_> {
    fn get(&self, key: &str) -> Option<Value> {
        if let Some(v) = self.pending.lock().values.get(key) {
            return Some(v.clone());
        }
        self.base.get(key)
    }

    fn set(&self, key: &str, value: Value) {
        let mut pending = self.pending.lock();
        if pending.values.insert(key.to_string(), value).is_none() {
            pending.order.push(key.to_string());
        }
    }
}
