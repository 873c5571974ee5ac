use treegrid::node::{NodeId, NodeStore, TreeNode};
use treegrid::sort::{SortFunction, SortMeta, SortOrder, SortSnapshot, sort_tree};

fn person(name: &str, age: i64) -> TreeNode {
    TreeNode::new()
        .with_field("name", name)
        .with_field("age", age)
}

fn name_of(store: &NodeStore, id: NodeId) -> String {
    store
        .field(id, "name")
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn root_names(store: &NodeStore) -> Vec<String> {
    store
        .roots()
        .iter()
        .map(|&id| name_of(store, id))
        .collect()
}

fn single(field: &str, order: SortOrder) -> SortSnapshot {
    SortSnapshot::Single(SortMeta::new(field, order))
}

#[test]
fn test_multi_sort_breaks_ties_with_later_criteria() {
    let mut store = NodeStore::from_roots(vec![
        person("z", 30),
        person("a", 30),
        person("m", 20),
    ]);

    let snapshot = SortSnapshot::Multiple(vec![
        SortMeta::new("age", SortOrder::Asc),
        SortMeta::new("name", SortOrder::Asc),
    ]);
    sort_tree(&mut store, &snapshot, None);

    assert_eq!(root_names(&store), vec!["m", "a", "z"]);
}

#[test]
fn test_missing_field_sorts_like_null_before_values() {
    let mut store = NodeStore::from_roots(vec![
        person("b", 1),
        TreeNode::new().with_field("age", 2i64),
        person("a", 3),
    ]);

    sort_tree(&mut store, &single("name", SortOrder::Asc), None);

    let names = root_names(&store);
    assert_eq!(names, vec!["", "a", "b"]);
}

#[test]
fn test_natural_numeric_string_order() {
    let mut store = NodeStore::from_roots(vec![
        person("item10", 0),
        person("item2", 0),
        person("item1", 0),
    ]);

    sort_tree(&mut store, &single("name", SortOrder::Asc), None);

    assert_eq!(root_names(&store), vec!["item1", "item2", "item10"]);
}

#[test]
fn test_full_tie_preserves_input_order() {
    let mut store = NodeStore::from_roots(vec![
        person("first", 30),
        person("second", 30),
        person("third", 30),
    ]);

    let snapshot = SortSnapshot::Multiple(vec![
        SortMeta::new("age", SortOrder::Asc),
        SortMeta::new("missing", SortOrder::Asc),
    ]);
    sort_tree(&mut store, &snapshot, None);

    assert_eq!(root_names(&store), vec!["first", "second", "third"]);
}

#[test]
fn test_descending_order() {
    let mut store = NodeStore::from_roots(vec![
        person("a", 20),
        person("b", 40),
        person("c", 30),
    ]);

    sort_tree(&mut store, &single("age", SortOrder::Desc), None);

    assert_eq!(root_names(&store), vec!["b", "c", "a"]);
}

#[test]
fn test_sort_recurses_into_every_level() {
    let mut store = NodeStore::from_roots(vec![
        TreeNode::new().with_field("name", "root").with_children(vec![
            person("c", 1),
            TreeNode::new().with_field("name", "a").with_children(vec![
                person("z", 1),
                person("y", 1),
            ]),
            person("b", 1),
        ]),
    ]);

    sort_tree(&mut store, &single("name", SortOrder::Asc), None);

    let root = store.roots()[0];
    let children: Vec<String> = store
        .children(root)
        .iter()
        .map(|&id| name_of(&store, id))
        .collect();
    assert_eq!(children, vec!["a", "b", "c"]);

    let inner = store.children(root)[0];
    let grandchildren: Vec<String> = store
        .children(inner)
        .iter()
        .map(|&id| name_of(&store, id))
        .collect();
    assert_eq!(grandchildren, vec!["y", "z"]);
}

#[test]
fn test_custom_sort_result_trusted_verbatim() {
    let mut store = NodeStore::from_roots(vec![
        person("a", 1),
        person("b", 2),
        person("c", 3),
    ]);

    let reverse: SortFunction = Box::new(|_store, nodes, _snapshot| {
        let mut order = nodes.to_vec();
        order.reverse();
        order
    });
    sort_tree(&mut store, &single("name", SortOrder::Asc), Some(&reverse));

    assert_eq!(root_names(&store), vec!["c", "b", "a"]);
}

#[test]
fn test_mixed_numeric_types_compare_numerically() {
    let mut store = NodeStore::from_roots(vec![
        TreeNode::new().with_field("name", "big").with_field("size", 10.5f64),
        TreeNode::new().with_field("name", "small").with_field("size", 2i64),
        TreeNode::new().with_field("name", "mid").with_field("size", 9i64),
    ]);

    sort_tree(&mut store, &single("size", SortOrder::Asc), None);

    assert_eq!(root_names(&store), vec!["small", "mid", "big"]);
}
