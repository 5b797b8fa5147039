//! Schema-driven graph store over a flat key-value adapter.
//!
//! Nodes are JSON objects stored under their uid. The schema, the node-type
//! registry and the secondary indices live under reserved `$`-prefixed keys
//! (see [`keys`]). The store is split into three parts that share one
//! [`GraphStore`] handle:
//!
//! - [`schema`]: reads and edits the stored schema
//! - [`mutation`]: validated batch insertion with placeholder resolution
//! - [`query`]: directive-driven projection of stored nodes

pub mod format;
pub mod keys;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

use std::sync::Arc;

use serde_json::Value;
use skein_core::GraphResult;
use skein_storage::{KvStore, MemoryStore};

use crate::config::GraphConfig;
use crate::uid::{UidGenerator, UuidGenerator};
use types::*;

/// Graph store handle.
///
/// Cheap to clone; clones share the same storage adapter and uid generator.
#[derive(Clone)]
pub struct GraphStore {
    store: Arc<dyn KvStore>,
    config: GraphConfig,
    uids: Arc<dyn UidGenerator>,
}

impl GraphStore {
    /// Create a store over `store` with the default configuration.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            config: GraphConfig::default(),
            uids: Arc::new(UuidGenerator),
        }
    }

    /// Create a store over a fresh in-memory adapter.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Create a store with an explicit configuration.
    pub fn with_config(store: Arc<dyn KvStore>, config: GraphConfig) -> GraphResult<Self> {
        config.validate()?;
        tracing::debug!(
            placeholder_prefix = %config.placeholder_prefix,
            staged_inserts = config.staged_inserts,
            dedupe_sort_index = config.dedupe_sort_index,
            "Opened graph store"
        );
        Ok(Self {
            store,
            config,
            uids: Arc::new(UuidGenerator),
        })
    }

    /// Replace the generator used for placeholder uids.
    pub fn with_uid_generator(mut self, uids: Arc<dyn UidGenerator>) -> Self {
        self.uids = uids;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// The underlying storage adapter.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    pub(crate) fn kv(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    /// Raw stored record for `uid`, including its `$node` tag.
    ///
    /// Returns `None` if nothing is stored under `uid` or the stored value is
    /// not an object.
    pub fn get_node(&self, uid: &str) -> Option<NodeRecord> {
        match self.store.get(uid)? {
            Value::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Uids registered under a node type, in insertion order.
    pub fn node_uids(&self, node: &str) -> GraphResult<Vec<String>> {
        let registry = mutation::load_registry(self.kv())?;
        Ok(registry.uids(node).to_vec())
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
