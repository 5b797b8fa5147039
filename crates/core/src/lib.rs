//! Core types for Skein
//!
//! Shared by the storage adapters and the graph engine:
//! - [`GraphError`] / [`GraphResult`]: the error taxonomy
//! - [`value`]: ordering and index-key rendering of stored values

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod value;

pub use error::{GraphError, GraphResult};
pub use serde_json::Value;
