//! Tree node storage.
//!
//! Nodes live in an arena owned by [`NodeStore`]; a node's identity is its
//! arena index and the parent link is a plain back-index into the same
//! arena, so upward traversal never creates a second ownership edge.

use std::collections::HashMap;

use crate::value::Value;

/// Index of a node inside a [`NodeStore`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An owned input node used to build or replace a tree.
///
/// # Example
///
/// ```
/// use treegrid::node::TreeNode;
///
/// let root = TreeNode::new()
///     .with_field("name", "Documents")
///     .expanded()
///     .with_children(vec![
///         TreeNode::new().with_field("name", "resume.doc"),
///         TreeNode::new().with_field("name", "notes.txt"),
///     ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeNode {
    /// Field name → value payload for this row.
    pub data: HashMap<String, Value>,
    /// Child nodes, owned exclusively by this node.
    pub children: Vec<TreeNode>,
    /// Whether the node starts out expanded.
    pub expanded: bool,
    /// Leaf override; `None` means "leaf iff no children".
    pub leaf: Option<bool>,
}

impl TreeNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a data field.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// Set the child nodes.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Mark the node as initially expanded.
    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }

    /// Override the leaf flag (a `false` override makes a childless node
    /// expandable, e.g. for lazy-loaded children).
    pub fn with_leaf(mut self, leaf: bool) -> Self {
        self.leaf = Some(leaf);
        self
    }
}

#[derive(Debug, Clone)]
struct NodeSlot {
    data: HashMap<String, Value>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    expanded: bool,
    leaf: Option<bool>,
    checked: bool,
    partial_selected: bool,
}

/// Arena holding one forest of nodes.
///
/// The store is replaced wholesale when a new tree value arrives; node ids
/// from a previous tree do not survive replacement. Reads through a stale
/// id return defaults rather than panicking.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    slots: Vec<NodeSlot>,
    roots: Vec<NodeId>,
}

impl NodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from owned root nodes.
    pub fn from_roots(roots: Vec<TreeNode>) -> Self {
        let mut store = Self::new();
        store.replace(roots);
        store
    }

    /// Replace the whole forest with a new tree value.
    pub fn replace(&mut self, roots: Vec<TreeNode>) {
        self.slots.clear();
        self.roots.clear();
        let ids: Vec<NodeId> = roots
            .into_iter()
            .map(|root| self.insert(root, None))
            .collect();
        self.roots = ids;
    }

    fn insert(&mut self, node: TreeNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(NodeSlot {
            data: node.data,
            children: Vec::new(),
            parent,
            expanded: node.expanded,
            leaf: node.leaf,
            checked: false,
            partial_selected: false,
        });
        let children: Vec<NodeId> = node
            .children
            .into_iter()
            .map(|child| self.insert(child, Some(id)))
            .collect();
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.children = children;
        }
        id
    }

    /// Root node ids in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Reorder the roots (used by the sorter).
    pub(crate) fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    /// Child ids of a node in display order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.0)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    /// Reorder a node's children (used by the sorter).
    pub(crate) fn set_children_order(&mut self, id: NodeId, children: Vec<NodeId>) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.children = children;
        }
    }

    /// Parent of a node, `None` for roots.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.0).and_then(|slot| slot.parent)
    }

    /// Resolve a data field on a node.
    pub fn field(&self, id: NodeId, field: &str) -> Option<&Value> {
        self.slots.get(id.0).and_then(|slot| slot.data.get(field))
    }

    /// Full data map of a node.
    pub fn data(&self, id: NodeId) -> Option<&HashMap<String, Value>> {
        self.slots.get(id.0).map(|slot| &slot.data)
    }

    /// Whether a node is expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.slots.get(id.0).map(|slot| slot.expanded).unwrap_or(false)
    }

    /// Set a node's expanded flag.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.expanded = expanded;
        }
    }

    /// Computed leaf predicate: the override wins, otherwise a node is a
    /// leaf iff it has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.slots
            .get(id.0)
            .map(|slot| slot.leaf.unwrap_or(slot.children.is_empty()))
            .unwrap_or(true)
    }

    /// Legacy selection flag: node is checked.
    pub fn is_checked(&self, id: NodeId) -> bool {
        self.slots.get(id.0).map(|slot| slot.checked).unwrap_or(false)
    }

    /// Set the legacy checked flag.
    pub(crate) fn set_checked(&mut self, id: NodeId, checked: bool) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.checked = checked;
        }
    }

    /// Legacy selection flag: some but not all descendants are checked.
    pub fn is_partial_selected(&self, id: NodeId) -> bool {
        self.slots
            .get(id.0)
            .map(|slot| slot.partial_selected)
            .unwrap_or(false)
    }

    /// Set the legacy partial flag.
    pub(crate) fn set_partial_selected(&mut self, id: NodeId, partial: bool) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.partial_selected = partial;
        }
    }

    /// Total number of nodes in the store.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
