//! The storage adapter contract.

use std::sync::Arc;

use serde_json::Value;

/// Synchronous key-value primitive the graph engine is layered on.
///
/// Both operations are total: the engine models no adapter-level failures,
/// partial writes, or transactions. Durability and isolation are whatever the
/// implementation provides.
pub trait KvStore: Send + Sync {
    /// Read the value stored at `key`, or `None` if nothing was ever set.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` at `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value);
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) {
        (**self).set(key, value)
    }
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) {
        (**self).set(key, value)
    }
}
