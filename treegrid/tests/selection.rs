use treegrid::node::{NodeId, NodeStore, TreeNode};
use treegrid::selection::{KeySelection, KeyState, LegacySelection};

fn named(name: &str, children: Vec<TreeNode>) -> TreeNode {
    TreeNode::new().with_field("name", name).with_children(children)
}

/// parent [a, b, c]
fn flat_family() -> NodeStore {
    NodeStore::from_roots(vec![named(
        "parent",
        vec![named("a", vec![]), named("b", vec![]), named("c", vec![])],
    )])
}

/// grandparent [parent [a, b]]
fn deep_family() -> NodeStore {
    NodeStore::from_roots(vec![named(
        "grandparent",
        vec![named("parent", vec![named("a", vec![]), named("b", vec![])])],
    )])
}

fn all_nodes(store: &NodeStore) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = store.roots().to_vec();
    while let Some(id) = stack.pop() {
        out.push(id);
        stack.extend(store.children(id));
    }
    out
}

// -----------------------------------------------------------------------------
// Key-map selection
// -----------------------------------------------------------------------------

#[test]
fn test_keymap_checked_leaf_marks_parent_partial() {
    let store = flat_family();
    let parent = store.roots()[0];
    let a = store.children(parent)[0];

    let mut sel = KeySelection::new(Some("name".to_string()));
    sel.toggle(&store, a, true);

    assert!(sel.is_checked(&store, a));
    assert!(!sel.is_partial_checked(&store, a));
    assert_eq!(
        sel.state(&store, parent),
        KeyState {
            checked: false,
            partial_checked: true,
        }
    );
}

#[test]
fn test_keymap_all_children_checked_marks_parent_checked() {
    let store = flat_family();
    let parent = store.roots()[0];

    let mut sel = KeySelection::new(Some("name".to_string()));
    for &child in store.children(parent) {
        sel.toggle(&store, child, true);
    }

    assert_eq!(
        sel.state(&store, parent),
        KeyState {
            checked: true,
            partial_checked: false,
        }
    );
}

#[test]
fn test_keymap_uncheck_clears_key() {
    let store = flat_family();
    let parent = store.roots()[0];
    let a = store.children(parent)[0];

    let mut sel = KeySelection::new(Some("name".to_string()));
    sel.toggle(&store, a, true);
    sel.toggle(&store, a, false);

    // absence of a key means unchecked, not partial
    assert!(!sel.keys().contains_key("a"));
    assert!(!sel.is_checked(&store, a));
    assert!(!sel.is_partial_checked(&store, parent));
}

#[test]
fn test_keymap_checking_parent_checks_subtree() {
    let store = deep_family();
    let grandparent = store.roots()[0];
    let parent = store.children(grandparent)[0];

    let mut sel = KeySelection::new(Some("name".to_string()));
    sel.toggle(&store, parent, true);

    for leaf in store.children(parent) {
        assert!(sel.is_checked(&store, *leaf));
    }
    assert!(sel.is_checked(&store, parent));
    assert_eq!(
        sel.state(&store, grandparent),
        KeyState {
            checked: true,
            partial_checked: false,
        }
    );
}

#[test]
fn test_keymap_partial_propagates_to_all_ancestors() {
    let store = deep_family();
    let grandparent = store.roots()[0];
    let parent = store.children(grandparent)[0];
    let a = store.children(parent)[0];

    let mut sel = KeySelection::new(Some("name".to_string()));
    sel.toggle(&store, a, true);

    assert!(sel.is_partial_checked(&store, parent));
    assert!(sel.is_partial_checked(&store, grandparent));
}

#[test]
fn test_keymap_toggle_all_replaces_map() {
    let store = flat_family();
    let parent = store.roots()[0];
    let a = store.children(parent)[0];

    let mut sel = KeySelection::new(Some("name".to_string()));
    sel.toggle(&store, a, true);
    assert!(sel.is_partial_checked(&store, parent));

    sel.toggle_all(&store, store.roots(), true);
    assert!(sel.is_checked(&store, parent));
    assert!(sel.keys().values().all(|state| state.checked));

    sel.toggle_all(&store, store.roots(), false);
    assert!(sel.keys().is_empty());
}

#[test]
fn test_keymap_falls_back_to_node_identity() {
    let store = flat_family();
    let parent = store.roots()[0];
    let a = store.children(parent)[0];

    let mut sel = KeySelection::new(None);
    sel.toggle(&store, a, true);

    assert!(sel.keys().contains_key(&a.to_string()));
    assert!(sel.is_checked(&store, a));
}

// -----------------------------------------------------------------------------
// Legacy selection
// -----------------------------------------------------------------------------

#[test]
fn test_legacy_checked_leaf_marks_parent_partial() {
    let mut store = flat_family();
    let parent = store.roots()[0];
    let a = store.children(parent)[0];

    let mut sel = LegacySelection::new();
    let selected = sel.toggle(&mut store, a);

    assert!(selected);
    assert!(store.is_checked(a));
    assert!(!store.is_partial_selected(a));
    assert!(!store.is_checked(parent));
    assert!(store.is_partial_selected(parent));
    assert_eq!(sel.selected(), &[a]);
}

#[test]
fn test_legacy_checking_parent_selects_subtree() {
    let mut store = flat_family();
    let parent = store.roots()[0];

    let mut sel = LegacySelection::new();
    sel.toggle(&mut store, parent);

    for id in all_nodes(&store) {
        assert!(store.is_checked(id));
        assert!(!store.is_partial_selected(id));
    }
    assert_eq!(sel.selected().len(), 4);
}

#[test]
fn test_legacy_unchecking_one_child_makes_parent_partial() {
    let mut store = flat_family();
    let parent = store.roots()[0];
    let a = store.children(parent)[0];

    let mut sel = LegacySelection::new();
    sel.toggle(&mut store, parent);
    let selected = sel.toggle(&mut store, a);

    assert!(!selected);
    assert!(!store.is_checked(a));
    assert!(!store.is_checked(parent));
    assert!(store.is_partial_selected(parent));
    // the list keeps the still-checked siblings only
    let b = store.children(parent)[1];
    let c = store.children(parent)[2];
    assert_eq!(sel.selected(), &[b, c]);
}

#[test]
fn test_legacy_unchecking_last_child_clears_parent() {
    let mut store = flat_family();
    let parent = store.roots()[0];
    let a = store.children(parent)[0];

    let mut sel = LegacySelection::new();
    sel.toggle(&mut store, a);
    sel.toggle(&mut store, a);

    assert!(!store.is_checked(parent));
    assert!(!store.is_partial_selected(parent));
    assert!(sel.selected().is_empty());
}

#[test]
fn test_legacy_partial_propagates_to_all_ancestors() {
    let mut store = deep_family();
    let grandparent = store.roots()[0];
    let parent = store.children(grandparent)[0];
    let a = store.children(parent)[0];
    let b = store.children(parent)[1];

    let mut sel = LegacySelection::new();
    sel.toggle(&mut store, a);

    assert!(store.is_partial_selected(parent));
    assert!(store.is_partial_selected(grandparent));

    sel.toggle(&mut store, b);

    assert!(store.is_checked(parent));
    assert!(store.is_checked(grandparent));
    assert!(!store.is_partial_selected(parent));
    assert!(!store.is_partial_selected(grandparent));
}

#[test]
fn test_legacy_never_checked_and_partial_simultaneously() {
    let mut store = deep_family();
    let grandparent = store.roots()[0];
    let parent = store.children(grandparent)[0];
    let a = store.children(parent)[0];

    let mut sel = LegacySelection::new();
    for &id in &[a, parent, a, grandparent, parent] {
        sel.toggle(&mut store, id);
        for node in all_nodes(&store) {
            assert!(
                !(store.is_checked(node) && store.is_partial_selected(node)),
                "node {node} is both checked and partial"
            );
        }
    }
}

#[test]
fn test_legacy_leaf_toggle_never_leaves_leaf_partial() {
    let mut store = flat_family();
    let parent = store.roots()[0];
    let a = store.children(parent)[0];

    let mut sel = LegacySelection::new();
    sel.toggle(&mut store, a);
    assert!(!store.is_partial_selected(a));
    sel.toggle(&mut store, a);
    assert!(!store.is_partial_selected(a));
}

#[test]
fn test_legacy_toggle_all_checks_every_root_subtree() {
    let mut store = NodeStore::from_roots(vec![
        named("r1", vec![named("c1", vec![])]),
        named("r2", vec![]),
    ]);
    let roots = store.roots().to_vec();

    let mut sel = LegacySelection::new();
    sel.toggle_all(&mut store, &roots, true);

    for id in all_nodes(&store) {
        assert!(store.is_checked(id));
    }
    assert_eq!(sel.selected().len(), 3);

    sel.toggle_all(&mut store, &roots, false);
    assert!(sel.selected().is_empty());
    for id in all_nodes(&store) {
        assert!(!store.is_checked(id));
    }
}
