//! Hierarchical selection models.
//!
//! Checkbox-style selection keeps ancestor and descendant state consistent
//! through a two-phase propagation: the toggled node's subtree is set to
//! its terminal state first (down), then every ancestor recomputes its
//! aggregate state from its children (up). State lives either on the nodes
//! themselves plus an explicit selected list (legacy), or in an external
//! map keyed by a resolved node key (key-map). The two storages are
//! mutually exclusive, enforced by the [`SelectionModel`] variant chosen at
//! configuration time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodeStore};

/// Selection mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// No selection allowed.
    #[default]
    None,
    /// Single row selection.
    Single,
    /// Multiple rows with checkbox propagation.
    Multiple,
}

/// Checked/partial state stored per key in key-map mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyState {
    /// Whole subtree selected.
    pub checked: bool,
    /// Some but not all descendants selected.
    pub partial_checked: bool,
}

/// The two mutually exclusive selection storages.
#[derive(Debug, Clone)]
pub enum SelectionModel {
    /// Explicit list of selected nodes; checked/partial flags live on the
    /// nodes.
    Legacy(LegacySelection),
    /// State lives in a map from resolved node key; a missing key means
    /// unchecked, not partial.
    KeyMap(KeySelection),
}

impl SelectionModel {
    /// Whether a node is checked under the active storage.
    ///
    /// Legacy storage answers from the selection list, which checkbox
    /// propagation keeps in sync with the node flags and row-click
    /// selection maintains alone.
    pub fn is_checked(&self, store: &NodeStore, id: NodeId) -> bool {
        match self {
            SelectionModel::Legacy(sel) => sel.contains(id),
            SelectionModel::KeyMap(sel) => sel.is_checked(store, id),
        }
    }

    /// Whether a node is partially checked under the active storage.
    pub fn is_partial_checked(&self, store: &NodeStore, id: NodeId) -> bool {
        match self {
            SelectionModel::Legacy(_) => store.is_partial_selected(id),
            SelectionModel::KeyMap(sel) => sel.is_partial_checked(store, id),
        }
    }
}

/// Legacy selection: an ordered list of selected node ids. The
/// checked/partial flags themselves are read and written on the store.
#[derive(Debug, Clone, Default)]
pub struct LegacySelection {
    selected: Vec<NodeId>,
}

impl LegacySelection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected ids in insertion order.
    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    /// Whether the list contains a node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    /// Clear the list (node flags are untouched; callers propagate).
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    fn add(&mut self, id: NodeId) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    fn remove(&mut self, id: NodeId) {
        self.selected.retain(|&entry| entry != id);
    }

    /// Toggle a node's checked state, propagating down then up.
    ///
    /// Returns the node's new checked state. The down pass runs first so
    /// children reach their terminal state before ancestors recompute
    /// aggregates.
    pub fn toggle(&mut self, store: &mut NodeStore, id: NodeId) -> bool {
        let select = !store.is_checked(id);
        self.propagate_down(store, id, select);
        if let Some(parent) = store.parent(id) {
            self.propagate_up(store, parent);
        }
        select
    }

    /// Set a whole subtree to one checked state.
    pub fn propagate_down(&mut self, store: &mut NodeStore, id: NodeId, select: bool) {
        store.set_checked(id, select);
        store.set_partial_selected(id, false);
        if select {
            self.add(id);
        } else {
            self.remove(id);
        }
        for child in store.children(id).to_vec() {
            self.propagate_down(store, child, select);
        }
    }

    /// Recompute a node's aggregate state from its children, then recurse
    /// to its parent.
    pub fn propagate_up(&mut self, store: &mut NodeStore, id: NodeId) {
        let children = store.children(id).to_vec();
        if !children.is_empty() {
            let checked_count = children
                .iter()
                .filter(|&&child| store.is_checked(child))
                .count();
            let any_partial = children
                .iter()
                .any(|&child| store.is_partial_selected(child));

            if checked_count == children.len() {
                store.set_checked(id, true);
                store.set_partial_selected(id, false);
                self.add(id);
            } else if any_partial || checked_count > 0 {
                store.set_checked(id, false);
                store.set_partial_selected(id, true);
                self.remove(id);
            } else {
                store.set_checked(id, false);
                store.set_partial_selected(id, false);
                self.remove(id);
            }
        }
        if let Some(parent) = store.parent(id) {
            self.propagate_up(store, parent);
        }
    }

    /// Toggle every given root to one state (header checkbox).
    pub fn toggle_all(&mut self, store: &mut NodeStore, roots: &[NodeId], check: bool) {
        for &root in roots {
            self.propagate_down(store, root, check);
        }
    }

    /// Replace the selection with a single row (row-click selection; no
    /// checkbox propagation, node flags untouched).
    pub fn select_only(&mut self, id: NodeId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Toggle bare list membership (multiple-mode row-click selection).
    /// Returns whether the row is now selected.
    pub fn toggle_membership(&mut self, id: NodeId) -> bool {
        if let Some(pos) = self.selected.iter().position(|&entry| entry == id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(id);
            true
        }
    }
}

/// Key-map selection: an external mapping from resolved node key to
/// [`KeyState`].
#[derive(Debug, Clone, Default)]
pub struct KeySelection {
    keys: HashMap<String, KeyState>,
    data_key: Option<String>,
}

impl KeySelection {
    /// Selection keyed by the given data field; `None` falls back to node
    /// identity.
    pub fn new(data_key: Option<String>) -> Self {
        Self {
            keys: HashMap::new(),
            data_key,
        }
    }

    /// The current key map.
    pub fn keys(&self) -> &HashMap<String, KeyState> {
        &self.keys
    }

    /// Replace the key map wholesale (external selection binding).
    pub fn set_keys(&mut self, keys: HashMap<String, KeyState>) {
        self.keys = keys;
    }

    /// Clear all selection state.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Resolve a node's key: the configured data field when present,
    /// otherwise the node's identity.
    pub fn node_key(&self, store: &NodeStore, id: NodeId) -> String {
        self.data_key
            .as_deref()
            .and_then(|field| store.field(id, field))
            .filter(|value| !value.is_null())
            .map(ToString::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    /// State for a node; absent keys read as unchecked, not partial.
    pub fn state(&self, store: &NodeStore, id: NodeId) -> KeyState {
        self.keys
            .get(&self.node_key(store, id))
            .copied()
            .unwrap_or_default()
    }

    /// Whether a node is checked.
    pub fn is_checked(&self, store: &NodeStore, id: NodeId) -> bool {
        self.state(store, id).checked
    }

    /// Whether a node is partially checked.
    pub fn is_partial_checked(&self, store: &NodeStore, id: NodeId) -> bool {
        self.state(store, id).partial_checked
    }

    /// Set a node's checked state, propagating down then up.
    pub fn toggle(&mut self, store: &NodeStore, id: NodeId, check: bool) {
        self.propagate_down(store, id, check);
        if let Some(parent) = store.parent(id) {
            self.propagate_up(store, parent, check);
        }
    }

    /// Set a whole subtree to one checked state; unchecking removes keys
    /// instead of storing an explicit unchecked state.
    pub fn propagate_down(&mut self, store: &NodeStore, id: NodeId, check: bool) {
        let key = self.node_key(store, id);
        if check {
            self.keys.insert(
                key,
                KeyState {
                    checked: true,
                    partial_checked: false,
                },
            );
        } else {
            self.keys.remove(&key);
        }
        for &child in store.children(id) {
            self.propagate_down(store, child, check);
        }
    }

    /// Recompute a node's aggregate state from its children, then recurse
    /// to its parent.
    pub fn propagate_up(&mut self, store: &NodeStore, id: NodeId, check: bool) {
        let children = store.children(id);
        if children.is_empty() {
            return;
        }

        let mut checked_count = 0;
        let mut any_partial = false;
        for &child in children {
            let state = self.state(store, child);
            if state.checked {
                checked_count += 1;
            } else if state.partial_checked {
                any_partial = true;
            }
        }

        let key = self.node_key(store, id);
        if check && checked_count == children.len() {
            self.keys.insert(
                key,
                KeyState {
                    checked: true,
                    partial_checked: false,
                },
            );
        } else {
            let partial = any_partial || (checked_count > 0 && checked_count != children.len());
            self.keys.insert(
                key,
                KeyState {
                    checked: false,
                    partial_checked: partial,
                },
            );
        }

        if let Some(parent) = store.parent(id) {
            self.propagate_up(store, parent, check);
        }
    }

    /// Toggle every given root, replacing the whole map; no partial state
    /// carries over from previous per-node toggles.
    pub fn toggle_all(&mut self, store: &NodeStore, roots: &[NodeId], check: bool) {
        self.keys.clear();
        if check {
            for &root in roots {
                self.propagate_down(store, root, check);
            }
        }
    }

    /// Replace the selection with a single row (row-click selection; no
    /// checkbox propagation).
    pub fn select_only(&mut self, store: &NodeStore, id: NodeId) {
        self.keys.clear();
        self.keys.insert(
            self.node_key(store, id),
            KeyState {
                checked: true,
                partial_checked: false,
            },
        );
    }

    /// Toggle a single row's membership (multiple-mode row-click
    /// selection). Returns whether the row is now selected.
    pub fn toggle_membership(&mut self, store: &NodeStore, id: NodeId) -> bool {
        let key = self.node_key(store, id);
        if self.keys.remove(&key).is_some_and(|state| state.checked) {
            false
        } else {
            self.keys.insert(
                key,
                KeyState {
                    checked: true,
                    partial_checked: false,
                },
            );
            true
        }
    }
}
