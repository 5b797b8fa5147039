//! Mutation engine: schema-validated batch insertion.
//!
//! A batch is processed in three passes:
//!
//! 1. Resolve placeholder ids to durable uids, register every uid under its
//!    node type, validate every edge against the schema, write exact-index
//!    entries, and queue sort-index work.
//! 2. Rewrite placeholder references inside edge values to durable uids and
//!    write each node record with its `$node` tag.
//! 3. Rebuild every queued sort index from the stored values of its members.
//!
//! The node-type registry is written last. Writes are not atomic: a failure
//! part-way through leaves earlier writes in place unless the store runs the
//! batch through a [`StagedStore`](skein_storage::StagedStore).

use serde_json::{Map, Value};
use skein_core::value::compare_values;
use skein_core::{GraphError, GraphResult};
use skein_storage::{KvStore, StagedStore};

use super::keys;
use super::schema::load_schema;
use super::types::*;
use super::GraphStore;
use crate::config::GraphConfig;
use crate::uid::UidGenerator;

/// Queued sort-index insertion.
struct SortAddition {
    uid: String,
    node: String,
    edge: String,
}

/// Node record waiting for placeholder rewriting.
struct PendingNode {
    uid: String,
    node: String,
    values: Map<String, Value>,
}

/// Load the node-type registry, or an empty one.
pub(crate) fn load_registry(store: &dyn KvStore) -> GraphResult<NodeRegistry> {
    match store.get(keys::NODES_KEY) {
        None | Some(Value::Null) => Ok(NodeRegistry::default()),
        Some(v) => serde_json::from_value(v).map_err(|e| {
            GraphError::serialization(format!("Stored node registry is invalid: {}", e))
        }),
    }
}

/// Run one insertion batch against `store`.
pub(crate) fn insert_batch(
    store: &dyn KvStore,
    config: &GraphConfig,
    uids: &dyn UidGenerator,
    entries: Vec<InsertEntry>,
) -> GraphResult<ResolvedUids> {
    let prefix = config.placeholder_prefix.as_str();
    let schema = load_schema(store)?;
    let mut registry = load_registry(store)?;
    let mut resolved = ResolvedUids::default();
    let mut pending = Vec::with_capacity(entries.len());
    let mut sort_additions = Vec::new();

    // Pass 1: resolve ids, register, validate, exact indices
    for entry in entries {
        let InsertEntry { id, node, values } = entry;
        let values = match values {
            Value::Object(map) => map,
            other => {
                return Err(GraphError::invalid_input(format!(
                    "Values for '{}' must be an object, got {}",
                    id,
                    skein_core::value::type_name(&other)
                )))
            }
        };

        let uid = if id.starts_with(prefix) {
            let uid = uids.generate();
            resolved.record(id.clone(), uid.clone());
            uid
        } else {
            keys::validate_uid(&id)?;
            id.clone()
        };

        registry.push(&node, uid.clone());

        for (edge, value) in &values {
            let node_def = schema.node(&node).ok_or_else(|| GraphError::InvalidNode {
                node: node.clone(),
            })?;
            let def = node_def.get(edge).ok_or_else(|| GraphError::InvalidEdge {
                node: node.clone(),
                edge: edge.clone(),
            })?;

            if let Some(data_type) = def.data_type {
                if !data_type.accepts(value) {
                    return Err(GraphError::InvalidEdgeDataType {
                        node: node.clone(),
                        edge: edge.clone(),
                        uid: id.clone(),
                        expected: data_type.expected_scalar().unwrap_or("reference"),
                    });
                }
            }

            if def.has_index(IndexKind::Exact) {
                let key = keys::exact_index_key(&node, edge, value);
                tracing::trace!(key = %key, uid = %uid, "Writing exact index entry");
                store.set(&key, Value::String(uid.clone()));
            }
            if def.has_index(IndexKind::Sort) {
                sort_additions.push(SortAddition {
                    uid: uid.clone(),
                    node: node.clone(),
                    edge: edge.clone(),
                });
            }
        }

        pending.push(PendingNode { uid, node, values });
    }

    // Pass 2: rewrite placeholder references, write node records
    let node_count = pending.len();
    for PendingNode {
        uid,
        node,
        mut values,
    } in pending
    {
        for value in values.values_mut() {
            resolve_references(value, prefix, &resolved);
        }
        values.insert(keys::NODE_TAG.to_string(), Value::String(node));
        store.set(&uid, Value::Object(values));
    }

    // Pass 3: rebuild sort indices
    for addition in &sort_additions {
        rebuild_sort_index(store, config, addition)?;
    }

    store.set(keys::NODES_KEY, serde_json::to_value(&registry)?);

    tracing::debug!(
        nodes = node_count,
        placeholders = resolved.len(),
        sort_rebuilds = sort_additions.len(),
        "Inserted batch"
    );
    Ok(resolved)
}

/// Replace mapped placeholders in a single reference or a reference list.
/// Unmapped placeholders are left as literal strings.
fn resolve_references(value: &mut Value, prefix: &str, resolved: &ResolvedUids) {
    match value {
        Value::String(s) => {
            if s.starts_with(prefix) {
                if let Some(uid) = resolved.get(s) {
                    *s = uid.to_string();
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if let Value::String(s) = item {
                    if s.starts_with(prefix) {
                        if let Some(uid) = resolved.get(s) {
                            *s = uid.to_string();
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

/// Add one uid to a sort index and re-sort the whole list by stored values.
fn rebuild_sort_index(
    store: &dyn KvStore,
    config: &GraphConfig,
    addition: &SortAddition,
) -> GraphResult<()> {
    let SortAddition { uid, node, edge } = addition;
    let key = keys::sort_index_key(node, edge);

    let mut members: Vec<String> = match store.get(&key) {
        None | Some(Value::Null) => Vec::new(),
        Some(v) => serde_json::from_value(v).map_err(|e| {
            GraphError::serialization(format!("Sort index {} is invalid: {}", key, e))
        })?,
    };
    if !(config.dedupe_sort_index && members.contains(uid)) {
        members.push(uid.clone());
    }

    let mut keyed = Vec::with_capacity(members.len());
    for member in members {
        let record = match store.get(&member) {
            Some(Value::Object(record)) => record,
            _ => {
                return Err(GraphError::InvalidSortValue {
                    uid: member,
                    node: node.clone(),
                    edge: edge.clone(),
                })
            }
        };
        match record.get(edge) {
            Some(v) if !v.is_null() => {
                let v = v.clone();
                keyed.push((member, v));
            }
            _ => {
                return Err(GraphError::InvalidSortEdge {
                    uid: member,
                    node: node.clone(),
                    edge: edge.clone(),
                })
            }
        }
    }

    keyed.sort_by(|(_, a), (_, b)| compare_values(Some(a), Some(b)));
    let sorted: Vec<Value> = keyed.into_iter().map(|(m, _)| Value::String(m)).collect();
    tracing::debug!(key = %key, members = sorted.len(), "Rebuilt sort index");
    store.set(&key, Value::Array(sorted));
    Ok(())
}

impl GraphStore {
    /// Insert a batch of nodes.
    ///
    /// Returns the durable uid chosen for every placeholder id in the batch.
    /// Entries with literal uids are stored under those uids and do not
    /// appear in the result.
    ///
    /// Unless the store is configured with `staged_inserts`, a failing batch
    /// may leave part of its writes behind: exact-index entries of entries
    /// validated before the failure are already stored.
    pub fn insert(&self, entries: Vec<InsertEntry>) -> GraphResult<ResolvedUids> {
        if self.config.staged_inserts {
            let staged = StagedStore::new(self.kv());
            let resolved = insert_batch(&staged, &self.config, self.uids.as_ref(), entries)?;
            let written = staged.commit();
            tracing::info!(keys = written, "Committed staged insert batch");
            Ok(resolved)
        } else {
            insert_batch(self.kv(), &self.config, self.uids.as_ref(), entries)
        }
    }
}
