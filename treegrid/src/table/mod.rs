//! Tree table engine facade.
//!
//! [`TreeTable`] ties the node store, sorter, filter engine, and selection
//! propagation together behind the operations a tree table UI performs,
//! and emits [`events::TableEvent`]s for the consumer to drain.
//!
//! # Example
//!
//! ```
//! use treegrid::node::TreeNode;
//! use treegrid::table::TreeTable;
//!
//! let table = TreeTable::with_value(vec![
//!     TreeNode::new()
//!         .with_field("name", "vendors")
//!         .expanded()
//!         .with_children(vec![
//!             TreeNode::new().with_field("name", "acme"),
//!             TreeNode::new().with_field("name", "globex"),
//!         ]),
//! ]);
//!
//! table.sort_by("name").unwrap();
//! for row in table.visible_rows() {
//!     let name = table.node_field(row.node, "name").unwrap();
//!     println!("{}{}", "  ".repeat(row.level), name);
//! }
//! ```

pub mod events;
mod state;

pub use state::{TreeTable, TreeTableId};
