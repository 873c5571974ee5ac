use treegrid::node::{NodeId, NodeStore, TreeNode};
use treegrid::row::{PageWindow, serialize};

fn named(name: &str, children: Vec<TreeNode>) -> TreeNode {
    TreeNode::new().with_field("name", name).with_children(children)
}

fn expanded(name: &str, children: Vec<TreeNode>) -> TreeNode {
    named(name, children).expanded()
}

fn name_of(store: &NodeStore, id: NodeId) -> String {
    store
        .field(id, "name")
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[test]
fn test_collapsed_root_emits_single_row() {
    let store = NodeStore::from_roots(vec![named(
        "A",
        vec![named("B", vec![]), named("C", vec![])],
    )]);

    let rows = serialize(&store, None, None);

    assert_eq!(rows.len(), 1);
    assert!(rows[0].visible);
    assert_eq!(name_of(&store, rows[0].node), "A");
}

#[test]
fn test_collapsed_child_subtree_absent() {
    let store = NodeStore::from_roots(vec![expanded(
        "A",
        vec![
            named("B", vec![named("D", vec![]), named("E", vec![])]),
            named("C", vec![]),
        ],
    )]);

    let rows = serialize(&store, None, None);

    let names: Vec<String> = rows.iter().map(|row| name_of(&store, row.node)).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(rows.iter().all(|row| row.visible));
    assert_eq!(rows[0].level, 0);
    assert_eq!(rows[1].level, 1);
    assert_eq!(rows[2].level, 1);
    assert_eq!(rows[1].parent, Some(0));
    assert_eq!(rows[2].parent, Some(0));
}

#[test]
fn test_serialize_is_idempotent() {
    let store = NodeStore::from_roots(vec![
        expanded(
            "A",
            vec![expanded("B", vec![named("D", vec![])]), named("C", vec![])],
        ),
        named("F", vec![named("G", vec![])]),
    ]);

    let first = serialize(&store, None, None);
    let second = serialize(&store, None, None);

    assert_eq!(first, second);
}

#[test]
fn test_unpaginated_rows_are_all_visible() {
    let store = NodeStore::from_roots(vec![
        expanded("A", vec![named("B", vec![named("C", vec![])])]),
        named("D", vec![named("E", vec![])]),
    ]);

    let rows = serialize(&store, None, None);

    // hidden subtrees are never emitted, so every row is visible
    assert!(rows.iter().all(|row| row.visible));
    let names: Vec<String> = rows.iter().map(|row| name_of(&store, row.node)).collect();
    assert_eq!(names, vec!["A", "B", "D"]);
}

#[test]
fn test_page_window_counts_roots_not_rows() {
    let store = NodeStore::from_roots(vec![
        expanded("r1", vec![named("c1", vec![]), named("c2", vec![])]),
        named("r2", vec![]),
        named("r3", vec![]),
    ]);

    let page_one = serialize(&store, None, Some(PageWindow { first: 0, rows: 2 }));
    let names: Vec<String> = page_one
        .iter()
        .map(|row| name_of(&store, row.node))
        .collect();
    assert_eq!(names, vec!["r1", "c1", "c2", "r2"]);

    let page_two = serialize(&store, None, Some(PageWindow { first: 2, rows: 2 }));
    let names: Vec<String> = page_two
        .iter()
        .map(|row| name_of(&store, row.node))
        .collect();
    assert_eq!(names, vec!["r3"]);
}

#[test]
fn test_collapsed_in_window_root_emits_invisible_children() {
    let store = NodeStore::from_roots(vec![named(
        "A",
        vec![named("B", vec![named("D", vec![])])],
    )]);

    let rows = serialize(&store, None, Some(PageWindow { first: 0, rows: 1 }));

    // the collapsed root contributes its direct children as invisible
    // rows and nothing deeper
    assert_eq!(rows.len(), 2);
    assert_eq!(name_of(&store, rows[0].node), "A");
    assert!(rows[0].visible);
    assert_eq!(name_of(&store, rows[1].node), "B");
    assert!(!rows[1].visible);
}

#[test]
fn test_visible_rows_have_expanded_ancestors() {
    let store = NodeStore::from_roots(vec![expanded(
        "A",
        vec![expanded("B", vec![named("C", vec![])]), named("D", vec![])],
    )]);

    let rows = serialize(&store, None, Some(PageWindow { first: 0, rows: 1 }));

    for row in &rows {
        if !row.visible {
            continue;
        }
        let mut parent = row.parent;
        while let Some(index) = parent {
            assert!(store.is_expanded(rows[index].node));
            assert!(rows[index].visible);
            parent = rows[index].parent;
        }
    }
}
