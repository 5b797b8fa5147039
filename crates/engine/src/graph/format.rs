//! Query requests and directive trees.
//!
//! A [`Format`] describes, for one level of a result, which edges to project,
//! which to follow into nested formats, and how an array of sibling results at
//! that level is filtered, sorted, and windowed. Formats nest to any depth;
//! query recursion is bounded by the depth of the format, never by the shape
//! of the graph.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use skein_core::{GraphError, GraphResult};

/// A projected node: requested edge name → value.
pub type Projection = Map<String, Value>;

/// Predicate over a fully assembled projection.
///
/// Filters are expected to be pure; the engine calls them once per candidate
/// node at the level they are attached to.
pub type Filter = Arc<dyn Fn(&Projection) -> bool + Send + Sync>;

/// Reserved directive names. They are never projected as edges.
pub const FILTER: &str = "$filter";
/// Sort ascending by an edge.
pub const ASC: &str = "$asc";
/// Sort descending by an edge.
pub const DSC: &str = "$dsc";
/// Keep at most this many entries.
pub const COUNT: &str = "$count";
/// First index to keep.
pub const START: &str = "$start";
/// Last index to keep (inclusive).
pub const END: &str = "$end";
/// Edge name that projects the node's own uid.
pub const UID: &str = "uid";

/// Sort order for sibling arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Dsc,
}

/// Requested ordering of a sibling array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Direction.
    pub direction: SortDirection,
    /// Edge whose stored value orders the array.
    pub edge: String,
}

/// How one edge is projected.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Copy the stored value verbatim.
    Value,
    /// Follow the reference(s) and project with a nested format.
    Nested(Format),
}

/// One level of a directive tree.
#[derive(Clone, Default)]
pub struct Format {
    include_uid: bool,
    fields: Vec<(String, Selection)>,
    filter: Option<Filter>,
    sort: Option<Sort>,
    start: Option<usize>,
    end: Option<usize>,
    count: Option<usize>,
}

impl Format {
    /// Empty format: projects nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the node's uid under `uid`.
    pub fn uid(mut self) -> Self {
        self.include_uid = true;
        self
    }

    /// Copy the stored value of `edge`.
    pub fn edge(mut self, edge: impl Into<String>) -> Self {
        let edge = edge.into();
        if edge == UID {
            self.include_uid = true;
        } else {
            self.set_field(edge, Selection::Value);
        }
        self
    }

    /// Follow `edge` and project the referenced node(s) with `format`.
    pub fn nested(mut self, edge: impl Into<String>, format: Format) -> Self {
        let edge = edge.into();
        if edge == UID {
            self.include_uid = true;
        } else {
            self.set_field(edge, Selection::Nested(format));
        }
        self
    }

    /// Drop nodes at this level whose projection fails `predicate`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Projection) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(predicate));
        self
    }

    /// Sort sibling results ascending by `edge`.
    pub fn asc(mut self, edge: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            direction: SortDirection::Asc,
            edge: edge.into(),
        });
        self
    }

    /// Sort sibling results descending by `edge`.
    pub fn dsc(mut self, edge: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            direction: SortDirection::Dsc,
            edge: edge.into(),
        });
        self
    }

    /// Skip the first `start` sibling results.
    pub fn start(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }

    /// Keep sibling results up to index `end`, inclusive. Only applies
    /// together with [`Format::start`]; zero means unset.
    pub fn end(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }

    /// Keep at most `count` sibling results. Ignored when a nonzero `end` is
    /// set; zero means unset.
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    fn set_field(&mut self, edge: String, selection: Selection) {
        match self.fields.iter_mut().find(|(name, _)| *name == edge) {
            Some(field) => field.1 = selection,
            None => self.fields.push((edge, selection)),
        }
    }

    /// Whether `uid` is projected.
    pub fn includes_uid(&self) -> bool {
        self.include_uid
    }

    /// Projected edges in declaration order.
    pub fn fields(&self) -> &[(String, Selection)] {
        &self.fields
    }

    /// Attached filter, if any.
    pub fn filter_fn(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Requested ordering, if any.
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// `$start`, if set.
    pub fn start_index(&self) -> Option<usize> {
        self.start
    }

    /// `$end`, if set.
    pub fn end_index(&self) -> Option<usize> {
        self.end
    }

    /// `$count`, if set.
    pub fn count_limit(&self) -> Option<usize> {
        self.count
    }

    /// Whether any sort or window directive is present at this level.
    pub fn has_array_options(&self) -> bool {
        self.sort.is_some() || self.start.is_some() || self.end.is_some() || self.count.is_some()
    }

    /// Parse a directive tree from JSON.
    ///
    /// Edges map to `true` (copy), `false` (ignored) or a nested object.
    /// `$asc`/`$dsc` take an edge name; `$start`, `$end` and `$count` take
    /// non-negative integers. `$filter` cannot be expressed in JSON; attach it
    /// with [`Format::filter`].
    pub fn from_json(value: &Value) -> GraphResult<Format> {
        let section = value.as_object().ok_or_else(|| {
            GraphError::invalid_input(format!("Format section must be an object, got {}", value))
        })?;

        let mut format = Format::new();
        for (key, v) in section {
            match key.as_str() {
                FILTER => {
                    return Err(GraphError::invalid_input(
                        "$filter cannot be expressed in JSON; attach it with Format::filter",
                    ))
                }
                ASC | DSC => {
                    let edge = v.as_str().ok_or_else(|| {
                        GraphError::invalid_input(format!("{} must name an edge, got {}", key, v))
                    })?;
                    format = if key == ASC {
                        format.asc(edge)
                    } else {
                        format.dsc(edge)
                    };
                }
                START | END | COUNT => {
                    let n = v
                        .as_u64()
                        .and_then(|n| usize::try_from(n).ok())
                        .ok_or_else(|| {
                            GraphError::invalid_input(format!(
                                "{} must be a non-negative integer, got {}",
                                key, v
                            ))
                        })?;
                    format = match key.as_str() {
                        START => format.start(n),
                        END => format.end(n),
                        _ => format.count(n),
                    };
                }
                _ => match v {
                    Value::Bool(true) => format = format.edge(key.as_str()),
                    Value::Bool(false) => {}
                    Value::Object(_) => format = format.nested(key.as_str(), Format::from_json(v)?),
                    other => {
                        return Err(GraphError::invalid_input(format!(
                            "Edge '{}' must be true, false or a nested format, got {}",
                            key, other
                        )))
                    }
                },
            }
        }
        Ok(format)
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("include_uid", &self.include_uid)
            .field("fields", &self.fields)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("sort", &self.sort)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("count", &self.count)
            .finish()
    }
}

/// How a query chooses its root node(s).
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// A single node by uid.
    Uid(String),
    /// A single node through the exact index of `node.edge`.
    Exact {
        /// Node type owning the index.
        node: String,
        /// Indexed edge.
        edge: String,
        /// Value to look up.
        value: Value,
    },
    /// Every node of a type, or the sort index order when one matches.
    Node(String),
}

/// A query: a root selector and the format applied to it.
#[derive(Debug, Clone)]
pub struct Query {
    /// Root selector.
    pub selector: Selector,
    /// Directive tree for the root level.
    pub format: Format,
}

impl Query {
    /// Query one node by uid.
    pub fn by_uid(uid: impl Into<String>, format: Format) -> Self {
        Self {
            selector: Selector::Uid(uid.into()),
            format,
        }
    }

    /// Query one node through an exact index.
    pub fn by_exact(
        node: impl Into<String>,
        edge: impl Into<String>,
        value: impl Into<Value>,
        format: Format,
    ) -> Self {
        Self {
            selector: Selector::Exact {
                node: node.into(),
                edge: edge.into(),
                value: value.into(),
            },
            format,
        }
    }

    /// Query all nodes of a type.
    pub fn by_node(node: impl Into<String>, format: Format) -> Self {
        Self {
            selector: Selector::Node(node.into()),
            format,
        }
    }

    /// Whether the result is a single object rather than an array.
    pub fn returns_object(&self) -> bool {
        !matches!(self.selector, Selector::Node(_))
    }
}

/// Result of one query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Result of a uid or exact query; `None` when nothing matched.
    Object(Option<Projection>),
    /// Result of a node-type query.
    Array(Vec<Projection>),
}

impl QueryOutput {
    /// True for an object result with no match. Arrays are never absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, QueryOutput::Object(None))
    }

    /// The object, if this is a present object result.
    pub fn as_object(&self) -> Option<&Projection> {
        match self {
            QueryOutput::Object(o) => o.as_ref(),
            QueryOutput::Array(_) => None,
        }
    }

    /// The array, if this is an array result.
    pub fn as_array(&self) -> Option<&[Projection]> {
        match self {
            QueryOutput::Array(a) => Some(a),
            QueryOutput::Object(_) => None,
        }
    }

    /// Convert to plain JSON; an absent object becomes `null`.
    pub fn into_json(self) -> Value {
        match self {
            QueryOutput::Object(Some(o)) => Value::Object(o),
            QueryOutput::Object(None) => Value::Null,
            QueryOutput::Array(a) => Value::Array(a.into_iter().map(Value::Object).collect()),
        }
    }
}
