//! Reserved storage keys.
//!
//! The engine shares one flat keyspace with node records: node records live
//! directly at their uid, everything else lives under a `$`-prefixed key.
//! These formats are part of the on-disk contract and must not change.

use serde_json::Value;
use skein_core::value::index_segment;
use skein_core::{GraphError, GraphResult};

/// Separator between segments of an index key.
const SEP: &str = "___";

/// Key holding the whole schema blob.
pub const SCHEMA_KEY: &str = "$schema";

/// Key holding the node-type registry.
pub const NODES_KEY: &str = "$nodes";

/// Field on a node record holding its node type.
pub const NODE_TAG: &str = "$node";

/// Prefix shared by every reserved key.
pub const RESERVED_PREFIX: char = '$';

// =============================================================================
// Validation
// =============================================================================

/// Validate a literal (non-placeholder) uid supplied for insertion.
///
/// Uids are used as storage keys verbatim, so they must not be empty and must
/// not collide with the reserved keyspace.
pub fn validate_uid(uid: &str) -> GraphResult<()> {
    if uid.is_empty() {
        return Err(GraphError::invalid_input("Node uid must not be empty"));
    }
    if uid.starts_with(RESERVED_PREFIX) {
        return Err(GraphError::invalid_input(format!(
            "Node uid '{}' must not start with '{}' (reserved)",
            uid, RESERVED_PREFIX
        )));
    }
    Ok(())
}

// =============================================================================
// Key Construction
// =============================================================================

/// Exact index key: `$index___exact___{node}___{edge}___{value}`
pub fn exact_index_key(node: &str, edge: &str, value: &Value) -> String {
    format!(
        "$index{SEP}exact{SEP}{}{SEP}{}{SEP}{}",
        node,
        edge,
        index_segment(value)
    )
}

/// Sort index key: `$index___sort___{node}___{edge}`
pub fn sort_index_key(node: &str, edge: &str) -> String {
    format!("$index{SEP}sort{SEP}{}{SEP}{}", node, edge)
}
