//! Graph store configuration.
//!
//! Use the builder methods to configure a store in code, or load the same
//! settings from TOML:
//!
//! ```ignore
//! use skein_engine::GraphConfig;
//!
//! let cfg = GraphConfig::new().staged_inserts(true);
//! let cfg = GraphConfig::from_toml_str("placeholder_prefix = \"tmp:\"")?;
//! ```

use serde::{Deserialize, Serialize};
use skein_core::{GraphError, GraphResult};

/// Prefix marking batch-local placeholder uids unless configured otherwise.
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "_:";

/// Settings for a [`GraphStore`](crate::graph::GraphStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Prefix that marks an insertion id as a batch-local placeholder.
    pub placeholder_prefix: String,
    /// Buffer all writes of an insertion batch and apply them only if the
    /// whole batch succeeds.
    pub staged_inserts: bool,
    /// Skip appending a uid to a sort index that already lists it.
    pub dedupe_sort_index: bool,
}

impl GraphConfig {
    /// Configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder prefix.
    pub fn placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.placeholder_prefix = prefix.into();
        self
    }

    /// Enable or disable staged (all-or-nothing) insertion batches.
    pub fn staged_inserts(mut self, enabled: bool) -> Self {
        self.staged_inserts = enabled;
        self
    }

    /// Enable or disable sort-index membership deduplication.
    pub fn dedupe_sort_index(mut self, enabled: bool) -> Self {
        self.dedupe_sort_index = enabled;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> GraphResult<Self> {
        let cfg: GraphConfig = toml::from_str(s)
            .map_err(|e| GraphError::invalid_input(format!("Invalid graph config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> GraphResult<()> {
        if self.placeholder_prefix.is_empty() {
            return Err(GraphError::invalid_input(
                "placeholder_prefix must not be empty",
            ));
        }
        if self.placeholder_prefix.starts_with('$') {
            return Err(GraphError::invalid_input(
                "placeholder_prefix must not start with '$' (reserved)",
            ));
        }
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string(),
            staged_inserts: false,
            dedupe_sort_index: true,
        }
    }
}
