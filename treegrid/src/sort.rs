//! Recursive tree sorting.
//!
//! Sorting reorders children arrays in place at every level of the tree —
//! the one sanctioned in-place mutation of the store. Comparisons go
//! through [`Value::compare`], so missing fields order like nulls and
//! never error.

use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodeStore};
use crate::value::Value;

/// Sorting strategy for a table: one active criterion, or an ordered set
/// where later entries break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// One active sort criterion.
    #[default]
    Single,
    /// An ordered list of criteria.
    Multiple,
}

/// Sort direction for a single criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// One sort criterion; multi-sort is an ordered sequence of these with
/// earlier entries taking precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortMeta {
    /// Field to resolve on each node's data.
    pub field: String,
    /// Direction to apply.
    pub order: SortOrder,
}

impl SortMeta {
    /// Create a criterion.
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// What a sort pass was asked to do, for events and custom sort hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum SortSnapshot {
    /// Single-criterion sort.
    Single(SortMeta),
    /// Multi-criterion sort; later entries break ties.
    Multiple(Vec<SortMeta>),
}

/// External sort hook replacing the built-in comparator.
///
/// Called once per children array (and once for the roots) with the
/// current order; the returned order is applied verbatim.
pub type SortFunction = Box<dyn Fn(&NodeStore, &[NodeId], &SortSnapshot) -> Vec<NodeId> + Send + Sync>;

/// Sort the whole tree by the given criteria, recursing into every
/// children array.
pub fn sort_tree(store: &mut NodeStore, snapshot: &SortSnapshot, custom: Option<&SortFunction>) {
    let roots = store.roots().to_vec();
    if roots.is_empty() {
        return;
    }
    let sorted = sort_level(store, roots, snapshot, custom);
    for &id in &sorted {
        sort_children(store, id, snapshot, custom);
    }
    store.set_roots(sorted);
    debug!("sort applied: {snapshot:?}");
}

fn sort_children(
    store: &mut NodeStore,
    id: NodeId,
    snapshot: &SortSnapshot,
    custom: Option<&SortFunction>,
) {
    let children = store.children(id).to_vec();
    if children.is_empty() {
        return;
    }
    let sorted = sort_level(store, children, snapshot, custom);
    for &child in &sorted {
        sort_children(store, child, snapshot, custom);
    }
    store.set_children_order(id, sorted);
}

fn sort_level(
    store: &NodeStore,
    mut nodes: Vec<NodeId>,
    snapshot: &SortSnapshot,
    custom: Option<&SortFunction>,
) -> Vec<NodeId> {
    match custom {
        Some(f) => f(store, &nodes, snapshot),
        None => {
            // stable sort: full ties preserve input order
            nodes.sort_by(|&a, &b| compare_nodes(store, a, b, snapshot));
            nodes
        }
    }
}

fn compare_nodes(store: &NodeStore, a: NodeId, b: NodeId, snapshot: &SortSnapshot) -> Ordering {
    match snapshot {
        SortSnapshot::Single(meta) => compare_by(store, a, b, meta),
        SortSnapshot::Multiple(metas) => {
            for meta in metas {
                let ord = compare_by(store, a, b, meta);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        }
    }
}

fn compare_by(store: &NodeStore, a: NodeId, b: NodeId, meta: &SortMeta) -> Ordering {
    let value_a = store.field(a, &meta.field).unwrap_or(&Value::Null);
    let value_b = store.field(b, &meta.field).unwrap_or(&Value::Null);
    let ord = value_a.compare(value_b);
    match meta.order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}
