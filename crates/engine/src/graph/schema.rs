//! Schema registry: read-modify-write operations over the `$schema` blob.
//!
//! The only rule enforced here is that an edge needs a `dataType` before an
//! index kind can be attached to it.

use serde_json::Value;
use skein_core::{GraphError, GraphResult};
use skein_storage::KvStore;

use super::keys;
use super::types::*;
use super::GraphStore;

/// Load the schema, or an empty one if none has been stored.
pub(crate) fn load_schema(store: &dyn KvStore) -> GraphResult<Schema> {
    match store.get(keys::SCHEMA_KEY) {
        None | Some(Value::Null) => Ok(Schema::new()),
        Some(v) => serde_json::from_value(v)
            .map_err(|e| GraphError::serialization(format!("Stored schema is invalid: {}", e))),
    }
}

/// Replace the stored schema.
pub(crate) fn save_schema(store: &dyn KvStore, schema: &Schema) -> GraphResult<()> {
    store.set(keys::SCHEMA_KEY, serde_json::to_value(schema)?);
    Ok(())
}

impl GraphStore {
    /// Read the whole schema.
    pub fn get_schema(&self) -> GraphResult<Schema> {
        load_schema(self.kv())
    }

    /// Replace the whole schema.
    pub fn set_schema(&self, schema: &Schema) -> GraphResult<()> {
        save_schema(self.kv(), schema)
    }

    /// Set a node type's entire edge-definition map.
    pub fn set_schema_node(&self, node: &str, edges: SchemaNode) -> GraphResult<()> {
        let mut schema = load_schema(self.kv())?;
        schema.0.insert(node.to_string(), edges);
        save_schema(self.kv(), &schema)
    }

    /// Set or replace one edge definition, creating the node type if needed.
    pub fn set_schema_edge(&self, node: &str, edge: &str, def: EdgeDef) -> GraphResult<()> {
        let mut schema = load_schema(self.kv())?;
        schema
            .0
            .entry(node.to_string())
            .or_default()
            .insert(edge.to_string(), def);
        save_schema(self.kv(), &schema)
    }

    /// Set an edge's `dataType`, creating the node and edge entries as
    /// needed. Existing indices on the edge are kept.
    pub fn set_edge_data_type(
        &self,
        node: &str,
        edge: &str,
        data_type: DataType,
    ) -> GraphResult<()> {
        let mut schema = load_schema(self.kv())?;
        schema
            .0
            .entry(node.to_string())
            .or_default()
            .entry(edge.to_string())
            .or_default()
            .data_type = Some(data_type);
        save_schema(self.kv(), &schema)
    }

    /// Attach an index kind to an edge.
    ///
    /// Fails with `missing-data-type` if the edge does not exist or has no
    /// `dataType`. Adding a kind the edge already carries is a no-op.
    pub fn add_edge_index(&self, node: &str, edge: &str, index: IndexKind) -> GraphResult<()> {
        let mut schema = load_schema(self.kv())?;
        let def = match schema.edge_mut(node, edge) {
            Some(def) if def.data_type.is_some() => def,
            _ => {
                return Err(GraphError::MissingDataType {
                    node: node.to_string(),
                    edge: edge.to_string(),
                    index: index.to_string(),
                })
            }
        };
        if !def.indices.contains(&index) {
            def.indices.push(index);
        }
        save_schema(self.kv(), &schema)
    }

    /// Remove an index kind from an edge; a no-op if it is not attached.
    ///
    /// Index records already written for the edge are left in storage.
    pub fn remove_edge_index(&self, node: &str, edge: &str, index: IndexKind) -> GraphResult<()> {
        let mut schema = load_schema(self.kv())?;
        if let Some(def) = schema.edge_mut(node, edge) {
            def.indices.retain(|k| *k != index);
        }
        save_schema(self.kv(), &schema)
    }
}
