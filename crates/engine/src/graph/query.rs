//! Query engine: directive-driven projection of stored nodes.
//!
//! The engine reads node records and index entries straight from the storage
//! adapter and never consults the schema. It reports no errors: absent nodes,
//! dangling references, undecodable records and filtered-out nodes are left
//! out of the result.

use std::collections::BTreeMap;

use serde_json::Value;
use skein_core::value::compare_values;
use skein_storage::KvStore;

use super::format::*;
use super::keys;
use super::mutation::load_registry;
use super::types::NodeRecord;
use super::GraphStore;

/// A node that survived projection, with its stored record kept for sorting.
struct Projected {
    record: NodeRecord,
    projection: Projection,
}

/// Run one query against `store`.
pub fn run_query(store: &dyn KvStore, query: &Query) -> QueryOutput {
    let format = &query.format;
    match &query.selector {
        Selector::Uid(uid) => {
            QueryOutput::Object(project(store, uid, format).map(|p| p.projection))
        }
        Selector::Exact { node, edge, value } => {
            let key = keys::exact_index_key(node, edge, value);
            let projection = match store.get(&key) {
                Some(Value::String(uid)) => project(store, &uid, format).map(|p| p.projection),
                _ => None,
            };
            QueryOutput::Object(projection)
        }
        Selector::Node(node) => {
            let (candidates, presorted) = node_candidates(store, node, format);
            QueryOutput::Array(project_siblings(store, &candidates, format, presorted))
        }
    }
}

/// Run several keyed queries. Keys whose result is an absent object are
/// omitted; array results are always present, even when empty.
pub fn run_queries(store: &dyn KvStore, queries: &[(String, Query)]) -> BTreeMap<String, QueryOutput> {
    let mut response = BTreeMap::new();
    for (key, query) in queries {
        let output = run_query(store, query);
        if !output.is_absent() {
            response.insert(key.clone(), output);
        }
    }
    response
}

/// Candidate uids for a node-type query, and whether they are already in
/// ascending order of the requested sort edge.
fn node_candidates(store: &dyn KvStore, node: &str, format: &Format) -> (Vec<String>, bool) {
    if let Some(sort) = format.sort() {
        let key = keys::sort_index_key(node, &sort.edge);
        if let Some(v) = store.get(&key) {
            match serde_json::from_value::<Vec<String>>(v) {
                Ok(uids) => return (uids, true),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Ignoring undecodable sort index")
                }
            }
        }
    }

    match load_registry(store) {
        Ok(registry) => (registry.uids(node).to_vec(), false),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring undecodable node registry");
            (Vec::new(), false)
        }
    }
}

/// Load a node record; anything that is not a JSON object counts as absent.
fn load_node(store: &dyn KvStore, uid: &str) -> Option<NodeRecord> {
    match store.get(uid)? {
        Value::Object(record) => Some(record),
        other => {
            tracing::warn!(
                uid = %uid,
                found = skein_core::value::type_name(&other),
                "Ignoring node record that is not an object"
            );
            None
        }
    }
}

/// Project one node with `format`. `None` means the node is absent or was
/// rejected by the format's filter.
fn project(store: &dyn KvStore, uid: &str, format: &Format) -> Option<Projected> {
    let record = load_node(store, uid)?;
    let mut projection = Projection::new();

    if format.includes_uid() {
        projection.insert(UID.to_string(), Value::String(uid.to_string()));
    }

    for (edge, selection) in format.fields() {
        let stored = record.get(edge);
        match selection {
            Selection::Value => {
                if let Some(v) = stored {
                    projection.insert(edge.clone(), v.clone());
                }
            }
            Selection::Nested(inner) => match stored {
                Some(Value::String(target)) => {
                    if let Some(nested) = project(store, target, inner) {
                        projection.insert(edge.clone(), Value::Object(nested.projection));
                    }
                }
                Some(Value::Array(members)) => {
                    let uids: Vec<String> = members
                        .iter()
                        .filter_map(|m| m.as_str().map(str::to_string))
                        .collect();
                    let items = project_siblings(store, &uids, inner, false);
                    projection.insert(
                        edge.clone(),
                        Value::Array(items.into_iter().map(Value::Object).collect()),
                    );
                }
                _ => {}
            },
        }
    }

    if let Some(filter) = format.filter_fn() {
        if !filter(&projection) {
            return None;
        }
    }

    Some(Projected { record, projection })
}

/// Project every uid with the same format, then sort and window the array.
fn project_siblings(
    store: &dyn KvStore,
    uids: &[String],
    format: &Format,
    presorted: bool,
) -> Vec<Projection> {
    let mut items: Vec<Projected> = uids
        .iter()
        .filter_map(|uid| project(store, uid, format))
        .collect();

    if format.has_array_options() {
        if let Some(sort) = format.sort() {
            if !presorted {
                items.sort_by(|a, b| {
                    compare_values(a.record.get(&sort.edge), b.record.get(&sort.edge))
                });
            }
            if sort.direction == SortDirection::Dsc {
                items.reverse();
            }
        }
        let end = format.end_index().filter(|e| *e > 0);
        let count = format.count_limit().filter(|c| *c > 0);
        if end.is_some() && count.is_some() {
            tracing::warn!(
                end = ?format.end_index(),
                count = ?format.count_limit(),
                "Both $end and $count given; $count is ignored"
            );
        }
        apply_window(
            &mut items,
            format.start_index(),
            format.end_index(),
            format.count_limit(),
        );
    }

    items.into_iter().map(|p| p.projection).collect()
}

/// Window a sibling array.
///
/// `end` is inclusive and only honoured together with `start`; `count` is
/// only honoured when no `end` is given. A zero `end` or `count` counts as
/// not given.
pub(crate) fn apply_window<T>(
    items: &mut Vec<T>,
    start: Option<usize>,
    end: Option<usize>,
    count: Option<usize>,
) {
    let end = end.filter(|e| *e > 0);
    let count = count.filter(|c| *c > 0);

    if let Some(start) = start {
        if let Some(end) = end {
            items.truncate(end.saturating_add(1));
        }
        items.drain(..start.min(items.len()));
    }
    if end.is_none() {
        if let Some(count) = count {
            items.truncate(count);
        }
    }
}

impl GraphStore {
    /// Run one query.
    pub fn query(&self, query: &Query) -> QueryOutput {
        run_query(self.kv(), query)
    }

    /// Run several keyed queries; see [`run_queries`].
    pub fn queries(&self, queries: &[(String, Query)]) -> BTreeMap<String, QueryOutput> {
        run_queries(self.kv(), queries)
    }
}
