//! Table output events and the lazy-load request object.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::filter::FilterMeta;
use crate::node::NodeId;
use crate::sort::{SortMeta, SortOrder, SortSnapshot};
use crate::value::Value;

/// Descriptive request emitted to an external data source in lazy mode.
///
/// The engine performs no local sorting, filtering, or serialization work
/// for the described range; the data source is trusted to answer with a
/// new tree value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LazyLoadRequest {
    /// Index of the first requested root.
    pub first: usize,
    /// Number of roots requested, when paginating.
    pub rows: Option<usize>,
    /// Active single-sort field.
    pub sort_field: Option<String>,
    /// Active single-sort direction.
    pub sort_order: Option<SortOrder>,
    /// Active multi-sort criteria.
    pub multi_sort_meta: Option<Vec<SortMeta>>,
    /// Active filter entries keyed by field.
    pub filters: HashMap<String, FilterMeta>,
    /// Value of the global filter entry, if one is active.
    pub global_filter: Option<Value>,
}

/// Events pushed by table operations and drained by the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// A node was expanded.
    NodeExpand(NodeId),
    /// A node was collapsed.
    NodeCollapse(NodeId),
    /// A sort pass ran with these criteria.
    SortApplied(SortSnapshot),
    /// A filter pass ran.
    FilterApplied {
        /// Root ids of the resulting tree (all roots when no filter is
        /// active).
        roots: Vec<NodeId>,
    },
    /// Selection state changed.
    SelectionChanged,
    /// The pagination window moved.
    PageChanged {
        /// First root of the new page.
        first: usize,
        /// Roots per page.
        rows: usize,
    },
    /// An external data source should answer this request.
    LazyLoad(LazyLoadRequest),
}
