//! Error types for the Skein graph store.
//!
//! Every failure the schema registry or the mutation engine can report is a
//! [`GraphError`] variant. The query engine never produces one of the domain
//! variants: missing or malformed data is omitted from results instead.

use thiserror::Error;

/// Result alias used across all Skein crates.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised by schema and mutation operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphError {
    /// The inserted node type has no entry in the schema.
    #[error("node type '{node}' is not in the schema")]
    InvalidNode {
        /// Node type supplied by the caller.
        node: String,
    },

    /// The inserted value carries an edge the node type does not define.
    #[error("edge '{edge}' is not defined for node type '{node}'")]
    InvalidEdge {
        /// Node type supplied by the caller.
        node: String,
        /// Offending edge name.
        edge: String,
    },

    /// A scalar edge was given a value of the wrong runtime type.
    #[error("edge '{edge}' on '{node}' (uid {uid}) must be a {expected}")]
    InvalidEdgeDataType {
        /// Node type supplied by the caller.
        node: String,
        /// Offending edge name.
        edge: String,
        /// Identifier as supplied in the batch (placeholder or literal).
        uid: String,
        /// Human-readable name of the declared type ("string" or "number").
        expected: &'static str,
    },

    /// A uid listed in a sort index has no stored node.
    #[error("sort index {node}.{edge} references uid {uid}, which has no stored node")]
    InvalidSortValue {
        /// Uid found in the sort index.
        uid: String,
        /// Node type of the sort index.
        node: String,
        /// Sorted edge.
        edge: String,
    },

    /// A uid listed in a sort index no longer carries the sorted edge.
    #[error("node {uid} has no value for sorted edge {node}.{edge}")]
    InvalidSortEdge {
        /// Uid found in the sort index.
        uid: String,
        /// Node type of the sort index.
        node: String,
        /// Sorted edge.
        edge: String,
    },

    /// An index kind was attached to an edge without a dataType.
    #[error("cannot add {index} index to {node}.{edge}: the edge has no dataType")]
    MissingDataType {
        /// Node type in the schema.
        node: String,
        /// Edge in the schema.
        edge: String,
        /// Index kind that was being attached.
        index: String,
    },

    /// A reserved record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Caller input (directive JSON, configuration) was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl GraphError {
    /// Build a [`GraphError::Serialization`].
    pub fn serialization(msg: impl Into<String>) -> Self {
        GraphError::Serialization(msg.into())
    }

    /// Build a [`GraphError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        GraphError::InvalidInput(msg.into())
    }

    /// Stable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::InvalidNode { .. } => "invalid-node",
            GraphError::InvalidEdge { .. } => "invalid-edge",
            GraphError::InvalidEdgeDataType { .. } => "invalid-edge-dataType",
            GraphError::InvalidSortValue { .. } => "invalid-sort-value",
            GraphError::InvalidSortEdge { .. } => "invalid-sort-edge",
            GraphError::MissingDataType { .. } => "missing-data-type",
            GraphError::Serialization(_) => "serialization",
            GraphError::InvalidInput(_) => "invalid-input",
        }
    }

    /// True for errors raised while validating a batch against the schema.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GraphError::InvalidNode { .. }
                | GraphError::InvalidEdge { .. }
                | GraphError::InvalidEdgeDataType { .. }
        )
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::Serialization(e.to_string())
    }
}
