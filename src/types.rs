//! Public types for the Skein API.
//!
//! This module re-exports types from the internal crates with a single
//! public interface.

// ============================================================================
// Errors and values
// ============================================================================

pub use skein_core::{GraphError, GraphResult, Value};

// ============================================================================
// Storage adapters
// ============================================================================

pub use skein_storage::{KvStore, MemoryStore, StagedStore};

// ============================================================================
// Graph store
// ============================================================================

pub use skein_engine::{
    DataType, EdgeDef, Format, GraphConfig, GraphStore, IndexKind, InsertEntry, NodeRecord,
    Projection, Query, QueryOutput, ResolvedUids, Schema, SchemaNode, Selector,
    SequentialGenerator, SortDirection, UidGenerator, UuidGenerator, DEFAULT_PLACEHOLDER_PREFIX,
};
