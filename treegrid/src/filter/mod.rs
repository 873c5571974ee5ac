//! Hierarchical filter engine.
//!
//! A node is retained when it matches every active filter entry, where a
//! single entry is satisfied by the node itself or by a matching
//! descendant. Filtering never touches the source tree; it produces a
//! shallow [`FilteredNode`] view with replaced children lists, committed
//! only after the pass completes.

mod matchers;

pub use matchers::{FilterRegistry, MatchPredicate};

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::{NodeId, NodeStore};
use crate::value::Value;

/// Reserved filter key evaluated across the global filter fields.
pub const GLOBAL_FILTER_KEY: &str = "global";

/// How intermediate (non-leaf) nodes qualify under a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// A node qualifies by matching directly or through any descendant.
    #[default]
    Lenient,
    /// A non-leaf node only qualifies through a matching descendant; a
    /// direct match counts only on leaves.
    Strict,
}

/// One filter entry for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMeta {
    /// Value handed to the match predicate.
    pub value: Value,
    /// Name of the match mode in the registry.
    pub match_mode: String,
}

impl FilterMeta {
    /// Entry with the default `startsWith` mode.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_mode(value, "startsWith")
    }

    /// Entry with an explicit match mode.
    pub fn with_mode(value: impl Into<Value>, match_mode: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            match_mode: match_mode.into(),
        }
    }

    /// Blank values clear a filter instead of being stored: null,
    /// whitespace-only strings, and empty lists.
    pub fn is_blank(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

/// A node retained by a filter pass, with its retained descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredNode {
    /// The retained node.
    pub id: NodeId,
    /// Retained children, in store order.
    pub children: Vec<FilteredNode>,
}

impl FilteredNode {
    /// Ids of the retained children, for assertions and walks.
    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children.iter().map(|child| child.id).collect()
    }
}

/// Run a filter pass over the forest.
///
/// Returns `Ok(None)` when no entries are active (no effective filtering —
/// use the original tree). Entries are ANDed: a root survives only if it
/// qualifies under every per-field entry and, when present, the global
/// entry. The global entry matches across `global_filter_fields`, falling
/// back to `columns`; if neither is available that is a configuration
/// error, surfaced before any work happens.
pub fn apply_filters(
    store: &NodeStore,
    registry: &FilterRegistry,
    mode: FilterMode,
    filters: &HashMap<String, FilterMeta>,
    columns: &[String],
    global_filter_fields: Option<&[String]>,
) -> Result<Option<Vec<FilteredNode>>> {
    if filters.is_empty() {
        return Ok(None);
    }

    // Resolve every predicate and the global field list up front so a
    // configuration error aborts before any tree state is assembled.
    let mut entries: Vec<(&str, &FilterMeta, &MatchPredicate)> = Vec::new();
    for (field, meta) in filters {
        if field == GLOBAL_FILTER_KEY {
            continue;
        }
        let predicate = registry
            .get(&meta.match_mode)
            .ok_or_else(|| Error::UnknownMatchMode(meta.match_mode.clone()))?;
        entries.push((field.as_str(), meta, predicate));
    }
    entries.sort_by_key(|(field, _, _)| *field);

    let global = match filters.get(GLOBAL_FILTER_KEY) {
        Some(meta) => {
            let fields: Vec<String> = global_filter_fields
                .filter(|fields| !fields.is_empty())
                .map(<[String]>::to_vec)
                .or_else(|| (!columns.is_empty()).then(|| columns.to_vec()))
                .ok_or(Error::MissingGlobalFilterFields)?;
            let predicate = registry
                .get(&meta.match_mode)
                .ok_or_else(|| Error::UnknownMatchMode(meta.match_mode.clone()))?;
            Some((meta, predicate, fields))
        }
        None => None,
    };

    let mut filtered: Vec<FilteredNode> = Vec::new();
    for &root in store.roots() {
        let mut view = Some(full_view(store, root));

        for &(field, meta, predicate) in &entries {
            let predicate: &dyn Fn(Option<&Value>, &Value) -> bool = predicate.as_ref();
            view = match view {
                Some(v) => {
                    let direct = |id: NodeId| predicate(store.field(id, field), &meta.value);
                    eval_node(store, v, mode, &direct)
                }
                None => None,
            };
            if view.is_none() {
                break;
            }
        }

        if let Some((meta, predicate, fields)) = global.as_ref() {
            let predicate: &dyn Fn(Option<&Value>, &Value) -> bool = predicate.as_ref();
            view = match view {
                Some(v) => {
                    let direct = |id: NodeId| {
                        fields
                            .iter()
                            .any(|field| predicate(store.field(id, field), &meta.value))
                    };
                    eval_node(store, v, mode, &direct)
                }
                None => None,
            };
        }

        if let Some(v) = view {
            filtered.push(v);
        }
    }

    debug!(
        "filter pass retained {} of {} roots",
        filtered.len(),
        store.roots().len()
    );
    Ok(Some(filtered))
}

/// Mirror the full subtree of a node as a view.
fn full_view(store: &NodeStore, id: NodeId) -> FilteredNode {
    FilteredNode {
        id,
        children: store
            .children(id)
            .iter()
            .map(|&child| full_view(store, child))
            .collect(),
    }
}

/// Evaluate one entry against a view subtree.
///
/// Lenient: a direct match retains the node with its current subtree;
/// otherwise the node survives only with matching descendants, children
/// replaced by the matching subset. Strict: children are always reduced to
/// the matching subset, and a direct match only counts on leaf nodes.
fn eval_node(
    store: &NodeStore,
    view: FilteredNode,
    mode: FilterMode,
    direct: &dyn Fn(NodeId) -> bool,
) -> Option<FilteredNode> {
    let self_match = direct(view.id);
    match mode {
        FilterMode::Lenient => {
            if self_match {
                return Some(view);
            }
            let kept: Vec<FilteredNode> = view
                .children
                .into_iter()
                .filter_map(|child| eval_node(store, child, mode, direct))
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(FilteredNode {
                    id: view.id,
                    children: kept,
                })
            }
        }
        FilterMode::Strict => {
            let id = view.id;
            let kept: Vec<FilteredNode> = view
                .children
                .into_iter()
                .filter_map(|child| eval_node(store, child, mode, direct))
                .collect();
            if !kept.is_empty() || (self_match && store.is_leaf(id)) {
                Some(FilteredNode { id, children: kept })
            } else {
                None
            }
        }
    }
}
