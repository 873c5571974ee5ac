//! Flat row projection of the tree.
//!
//! The serializer walks the (possibly filtered) forest depth-first and
//! produces an ordered sequence of [`Row`] descriptors for linear
//! rendering. Each pass builds a fresh sequence; the previous one is
//! replaced atomically by the caller.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::filter::FilteredNode;
use crate::node::{NodeId, NodeStore};

/// One flattened, position-aware row of the serialized tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// The node this row projects.
    pub node: NodeId,
    /// Index of the parent's row in the same sequence, `None` for roots.
    pub parent: Option<usize>,
    /// Depth in the tree (0 = root).
    pub level: usize,
    /// Whether the row is currently visible.
    pub visible: bool,
}

/// Pagination window over the root list.
///
/// The page size counts roots, not flattened rows; child subtrees of an
/// in-window root are serialized in full regardless of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Index of the first root on the page.
    pub first: usize,
    /// Number of roots per page.
    pub rows: usize,
}

/// Serialize the forest into a flat row sequence.
///
/// When `filtered` is present, the walk follows the filtered view while
/// reading expansion state from the store. When `window` is present, the
/// walk is restricted to the `[first, first + rows)` slice of the root
/// list.
pub fn serialize(
    store: &NodeStore,
    filtered: Option<&[FilteredNode]>,
    window: Option<PageWindow>,
) -> Vec<Row> {
    let mut rows = Vec::new();
    match window {
        Some(window) => serialize_page(store, filtered, window, &mut rows),
        None => match filtered {
            Some(view) => serialize_filtered(store, view, None, 0, true, &mut rows),
            None => serialize_store(store, store.roots(), None, 0, true, &mut rows),
        },
    }
    debug!("serialized {} rows", rows.len());
    rows
}

/// Depth-first pre-order walk over store adjacency.
///
/// A row is visible when its parent chain is visible and expanded; descent
/// stops at invisible or collapsed rows, so hidden subtrees are never
/// emitted.
fn serialize_store(
    store: &NodeStore,
    nodes: &[NodeId],
    parent: Option<(usize, NodeId)>,
    level: usize,
    visible: bool,
    out: &mut Vec<Row>,
) {
    for &id in nodes {
        let row_visible = visible
            && parent
                .map(|(_, parent_id)| store.is_expanded(parent_id))
                .unwrap_or(true);
        let index = out.len();
        out.push(Row {
            node: id,
            parent: parent.map(|(row, _)| row),
            level,
            visible: row_visible,
        });
        if row_visible && store.is_expanded(id) {
            serialize_store(
                store,
                store.children(id),
                Some((index, id)),
                level + 1,
                row_visible,
                out,
            );
        }
    }
}

/// Same walk over a filtered view; children come from the view, expansion
/// state from the store.
fn serialize_filtered(
    store: &NodeStore,
    nodes: &[FilteredNode],
    parent: Option<(usize, NodeId)>,
    level: usize,
    visible: bool,
    out: &mut Vec<Row>,
) {
    for node in nodes {
        let row_visible = visible
            && parent
                .map(|(_, parent_id)| store.is_expanded(parent_id))
                .unwrap_or(true);
        let index = out.len();
        out.push(Row {
            node: node.id,
            parent: parent.map(|(row, _)| row),
            level,
            visible: row_visible,
        });
        if row_visible && store.is_expanded(node.id) {
            serialize_filtered(
                store,
                &node.children,
                Some((index, node.id)),
                level + 1,
                row_visible,
                out,
            );
        }
    }
}

/// Paginated walk: only roots inside the window are emitted, each at level
/// 0 and visible, with children serialized from level 1 under the normal
/// visibility rule.
fn serialize_page(
    store: &NodeStore,
    filtered: Option<&[FilteredNode]>,
    window: PageWindow,
    out: &mut Vec<Row>,
) {
    match filtered {
        Some(view) => {
            for node in view.iter().skip(window.first).take(window.rows) {
                let index = out.len();
                out.push(Row {
                    node: node.id,
                    parent: None,
                    level: 0,
                    visible: true,
                });
                serialize_filtered(store, &node.children, Some((index, node.id)), 1, true, out);
            }
        }
        None => {
            for &id in store.roots().iter().skip(window.first).take(window.rows) {
                let index = out.len();
                out.push(Row {
                    node: id,
                    parent: None,
                    level: 0,
                    visible: true,
                });
                serialize_store(store, store.children(id), Some((index, id)), 1, true, out);
            }
        }
    }
}
