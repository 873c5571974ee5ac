pub mod error;
pub mod filter;
pub mod node;
pub mod row;
pub mod selection;
pub mod sort;
pub mod table;
pub mod value;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::filter::{FilterMeta, FilterMode, FilterRegistry, GLOBAL_FILTER_KEY};
    pub use crate::node::{NodeId, NodeStore, TreeNode};
    pub use crate::row::{PageWindow, Row};
    pub use crate::selection::{
        KeySelection, KeyState, LegacySelection, SelectionMode, SelectionModel,
    };
    pub use crate::sort::{SortMeta, SortMode, SortOrder, SortSnapshot};
    pub use crate::table::events::{LazyLoadRequest, TableEvent};
    pub use crate::table::{TreeTable, TreeTableId};
    pub use crate::value::Value;
}
