//! TreeGrid demo
//!
//! Builds a small department tree, then walks through the engine
//! operations: expand/collapse, sorting, filtering, and checkbox
//! selection.

use std::fs::File;

use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use treegrid::prelude::*;

fn employee(name: &str, age: i64) -> TreeNode {
    TreeNode::new()
        .with_field("name", name)
        .with_field("age", age)
}

fn department(name: &str, children: Vec<TreeNode>) -> TreeNode {
    TreeNode::new()
        .with_field("name", name)
        .expanded()
        .with_children(children)
}

fn print_rows(table: &TreeTable, heading: &str) {
    println!("\n{heading}");
    for row in table.visible_rows() {
        let name = table
            .node_field(row.node, "name")
            .unwrap_or(Value::Null);
        println!("  {}{}", "  ".repeat(row.level), name);
    }
}

fn main() {
    let _ = WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create("treegrid-demo.log").expect("create log file"),
    );

    let table = TreeTable::with_value(vec![
        department(
            "Engineering",
            vec![
                employee("Mara", 41),
                employee("Anton", 29),
                employee("Ines", 35),
            ],
        ),
        department(
            "Sales",
            vec![employee("Bo", 52), employee("Annika", 31)],
        ),
    ])
    .with_columns(vec!["name".to_string(), "age".to_string()])
    .with_selection_mode(SelectionMode::Multiple);

    print_rows(&table, "initial tree:");

    table.sort_by("name").expect("sort");
    print_rows(&table, "sorted by name:");

    table.filter("name", "an", "contains").expect("filter");
    print_rows(&table, "filtered by name contains 'an':");

    table.filter("name", Value::Null, "contains").expect("clear filter");

    let anton = table.find_by_field("name", "Anton").expect("find Anton");
    table.toggle_checkbox(anton);
    let engineering = table.find_by_field("name", "Engineering").expect("find dept");
    println!(
        "\nafter checking Anton: Engineering checked={} partial={}",
        table.is_node_selected(engineering),
        table.is_node_partial_selected(engineering),
    );

    for event in table.drain_events() {
        println!("event: {event:?}");
    }
}
