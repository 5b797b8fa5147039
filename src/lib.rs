//! Skein: a schema-driven graph store over a pluggable key-value adapter.
//!
//! ```ignore
//! use serde_json::json;
//! use skein::{DataType, EdgeDef, Format, GraphStore, IndexKind, InsertEntry, Query, Schema};
//!
//! let graph = GraphStore::in_memory();
//! graph.set_schema(
//!     &Schema::new()
//!         .with_edge("User", "name", EdgeDef::new(DataType::Str))
//!         .with_edge("User", "age", EdgeDef::new(DataType::Num).with_index(IndexKind::Sort)),
//! )?;
//! let uids = graph.insert(vec![InsertEntry::new("_:a", "User", json!({"name": "Ann", "age": 31}))])?;
//! let users = graph.query(&Query::by_node("User", Format::new().uid().edge("name").dsc("age")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;

pub use types::*;
