//! Graph engine for Skein
//!
//! This crate implements the three layers of the graph store on top of a
//! [`KvStore`](skein_storage::KvStore) adapter:
//! - Schema registry: node types, edge data types and index declarations
//! - Mutation engine: validated batch insertion with placeholder uids
//! - Query engine: uid / exact-index / node-type selectors with recursive
//!   projection, filtering, sorting and windowing
//!
//! All three are methods on [`GraphStore`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod uid;

pub use config::{GraphConfig, DEFAULT_PLACEHOLDER_PREFIX};
pub use graph::format::{Format, Projection, Query, QueryOutput, Selector, SortDirection};
pub use graph::types::{
    DataType, EdgeDef, IndexKind, InsertEntry, NodeRecord, ResolvedUids, Schema, SchemaNode,
};
pub use graph::GraphStore;
pub use uid::{SequentialGenerator, UidGenerator, UuidGenerator};
