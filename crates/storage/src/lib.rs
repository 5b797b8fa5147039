//! Storage adapters for Skein
//!
//! The graph engine talks to storage only through [`KvStore`]: a synchronous,
//! total `get`/`set` over string keys and JSON values. This crate provides the
//! contract and two implementations:
//! - [`MemoryStore`]: sharded in-memory map
//! - [`StagedStore`]: buffering overlay used for all-or-nothing batches

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod memory;
pub mod staged;

pub use adapter::KvStore;
pub use memory::MemoryStore;
pub use staged::StagedStore;
