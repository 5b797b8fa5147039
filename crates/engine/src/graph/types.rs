//! Core graph types: schema definitions, registry, and insertion batches.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared type of an edge value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// A string scalar.
    Str,
    /// A number scalar.
    Num,
    /// A single node reference (a uid).
    Uid,
    /// A list of node references.
    Uids,
}

impl DataType {
    /// Name of the runtime type a scalar edge must carry, if checked.
    pub fn expected_scalar(&self) -> Option<&'static str> {
        match self {
            DataType::Str => Some("string"),
            DataType::Num => Some("number"),
            DataType::Uid | DataType::Uids => None,
        }
    }

    /// Whether `value` satisfies this type. Reference types are not checked.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            DataType::Str => value.is_string(),
            DataType::Num => value.is_number(),
            DataType::Uid | DataType::Uids => true,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Str => write!(f, "str"),
            DataType::Num => write!(f, "num"),
            DataType::Uid => write!(f, "uid"),
            DataType::Uids => write!(f, "uids"),
        }
    }
}

/// Secondary index kinds an edge may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Point lookup from a scalar value to one uid.
    Exact,
    /// Ordered uid list rebuilt on every insertion.
    Sort,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Exact => write!(f, "exact"),
            IndexKind::Sort => write!(f, "sort"),
        }
    }
}

/// Definition of one edge on a node type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDef {
    /// Declared value type. An edge without one cannot carry indices.
    #[serde(rename = "dataType", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Index kinds maintained for this edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<IndexKind>,
}

impl EdgeDef {
    /// Edge of the given type with no indices.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type: Some(data_type),
            indices: Vec::new(),
        }
    }

    /// Builder-style: add an index kind.
    pub fn with_index(mut self, kind: IndexKind) -> Self {
        if !self.indices.contains(&kind) {
            self.indices.push(kind);
        }
        self
    }

    /// Whether this edge carries `kind`.
    pub fn has_index(&self, kind: IndexKind) -> bool {
        self.indices.contains(&kind)
    }
}

/// Edge definitions of one node type, keyed by edge name.
pub type SchemaNode = BTreeMap<String, EdgeDef>;

/// The whole schema: node type → edge definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(pub BTreeMap<String, SchemaNode>);

impl Schema {
    /// Empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Edge definitions for `node`, if the type exists.
    pub fn node(&self, node: &str) -> Option<&SchemaNode> {
        self.0.get(node)
    }

    /// Definition of `node.edge`, if present.
    pub fn edge(&self, node: &str, edge: &str) -> Option<&EdgeDef> {
        self.0.get(node).and_then(|n| n.get(edge))
    }

    /// Mutable definition of `node.edge`, if present.
    pub fn edge_mut(&mut self, node: &str, edge: &str) -> Option<&mut EdgeDef> {
        self.0.get_mut(node).and_then(|n| n.get_mut(edge))
    }

    /// Builder-style: set a node type's edge map.
    pub fn with_node(mut self, node: impl Into<String>, edges: SchemaNode) -> Self {
        self.0.insert(node.into(), edges);
        self
    }

    /// Builder-style: set one edge definition.
    pub fn with_edge(mut self, node: &str, edge: impl Into<String>, def: EdgeDef) -> Self {
        self.0
            .entry(node.to_string())
            .or_default()
            .insert(edge.into(), def);
        self
    }

    /// Node type names, sorted.
    pub fn node_types(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

/// Node-type registry: node type → every uid inserted for it, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeRegistry(pub BTreeMap<String, Vec<String>>);

impl NodeRegistry {
    /// Append `uid` to the list for `node`.
    pub fn push(&mut self, node: &str, uid: String) {
        self.0.entry(node.to_string()).or_default().push(uid);
    }

    /// Uids registered for `node`, in insertion order.
    pub fn uids(&self, node: &str) -> &[String] {
        self.0.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A stored node: edge name → value, plus the `$node` tag.
pub type NodeRecord = Map<String, Value>;

/// One element of an insertion batch.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertEntry {
    /// Literal uid, or a placeholder carrying the configured prefix.
    pub id: String,
    /// Node type the values are validated against.
    pub node: String,
    /// Edge values; must be a JSON object.
    pub values: Value,
}

impl InsertEntry {
    /// Build an entry.
    pub fn new(id: impl Into<String>, node: impl Into<String>, values: Value) -> Self {
        Self {
            id: id.into(),
            node: node.into(),
            values,
        }
    }
}

/// Placeholder → durable uid pairs produced by one insertion batch.
///
/// Pairs keep the order in which placeholders were first seen. A placeholder
/// used twice in one batch maps to the uid generated for its last use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedUids {
    pairs: Vec<(String, String)>,
    // placeholder -> position in `pairs`
    index: FxHashMap<String, usize>,
}

impl ResolvedUids {
    /// Record a resolution, replacing an earlier one for the same placeholder.
    pub fn record(&mut self, placeholder: String, uid: String) {
        match self.index.get(&placeholder) {
            Some(&pos) => self.pairs[pos].1 = uid,
            None => {
                self.index.insert(placeholder.clone(), self.pairs.len());
                self.pairs.push((placeholder, uid));
            }
        }
    }

    /// Durable uid for `placeholder`.
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.index
            .get(placeholder)
            .map(|&pos| self.pairs[pos].1.as_str())
    }

    /// Iterate `(placeholder, uid)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// Number of resolved placeholders.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when the batch used no placeholders.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Consume into the pair list.
    pub fn into_vec(self) -> Vec<(String, String)> {
        self.pairs
    }
}
