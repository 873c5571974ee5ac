//! Tree table engine state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};
use crate::filter::{
    FilterMeta, FilterMode, FilterRegistry, FilteredNode, GLOBAL_FILTER_KEY, apply_filters,
};
use crate::node::{NodeId, NodeStore, TreeNode};
use crate::row::{PageWindow, Row, serialize};
use crate::selection::{KeySelection, KeyState, LegacySelection, SelectionMode, SelectionModel};
use crate::sort::{SortFunction, SortMeta, SortMode, SortOrder, SortSnapshot, sort_tree};
use crate::table::events::{LazyLoadRequest, TableEvent};
use crate::value::Value;

/// Unique identifier for a TreeTable instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeTableId(usize);

impl TreeTableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TreeTableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__treetable_{}", self.0)
    }
}

/// Internal state for the TreeTable engine.
pub(super) struct Inner {
    /// Node arena for the current tree value.
    store: NodeStore,
    /// Declared column fields (used for global filtering).
    columns: Vec<String>,
    /// Fixed row height handed to the windowed renderer.
    row_height: u16,
    // sort
    sort_mode: SortMode,
    sort_field: Option<String>,
    sort_order: SortOrder,
    default_sort_order: SortOrder,
    multi_sort_meta: Vec<SortMeta>,
    custom_sort: Option<SortFunction>,
    // filter
    filters: HashMap<String, FilterMeta>,
    filter_mode: FilterMode,
    registry: FilterRegistry,
    global_filter_fields: Option<Vec<String>>,
    /// Filtered view, present while filtering is effective.
    filtered: Option<Vec<FilteredNode>>,
    // pagination
    paginator: bool,
    first: usize,
    page_rows: usize,
    total_records: usize,
    // lazy
    lazy: bool,
    // selection
    selection_mode: SelectionMode,
    selection: SelectionModel,
    // derived
    serialized: Vec<Row>,
    events: Vec<TableEvent>,
}

impl Inner {
    fn new() -> Self {
        Self {
            store: NodeStore::new(),
            columns: Vec::new(),
            row_height: 1,
            sort_mode: SortMode::default(),
            sort_field: None,
            sort_order: SortOrder::Asc,
            default_sort_order: SortOrder::Asc,
            multi_sort_meta: Vec::new(),
            custom_sort: None,
            filters: HashMap::new(),
            filter_mode: FilterMode::default(),
            registry: FilterRegistry::default(),
            global_filter_fields: None,
            filtered: None,
            paginator: false,
            first: 0,
            page_rows: 0,
            total_records: 0,
            lazy: false,
            selection_mode: SelectionMode::None,
            selection: SelectionModel::Legacy(LegacySelection::new()),
            serialized: Vec::new(),
            events: Vec::new(),
        }
    }

    fn has_filter(&self) -> bool {
        !self.filters.is_empty()
    }

    fn sort_snapshot(&self) -> Option<SortSnapshot> {
        match self.sort_mode {
            SortMode::Single => self
                .sort_field
                .as_ref()
                .map(|field| SortSnapshot::Single(SortMeta::new(field.clone(), self.sort_order))),
            SortMode::Multiple => (!self.multi_sort_meta.is_empty())
                .then(|| SortSnapshot::Multiple(self.multi_sort_meta.clone())),
        }
    }

    fn active_root_count(&self) -> usize {
        self.filtered
            .as_ref()
            .map(Vec::len)
            .unwrap_or_else(|| self.store.roots().len())
    }

    fn lazy_request(&self) -> LazyLoadRequest {
        LazyLoadRequest {
            first: self.first,
            rows: self.paginator.then_some(self.page_rows),
            sort_field: self.sort_field.clone(),
            sort_order: self.sort_field.is_some().then_some(self.sort_order),
            multi_sort_meta: (!self.multi_sort_meta.is_empty())
                .then(|| self.multi_sort_meta.clone()),
            filters: self.filters.clone(),
            global_filter: self
                .filters
                .get(GLOBAL_FILTER_KEY)
                .map(|meta| meta.value.clone()),
        }
    }

    /// Rebuild the flat row sequence from the current tree and window.
    fn update_serialized(&mut self) {
        let window = self.paginator.then(|| PageWindow {
            // lazy data is already the requested page
            first: if self.lazy { 0 } else { self.first },
            rows: self.page_rows,
        });
        self.serialized = serialize(&self.store, self.filtered.as_deref(), window);
    }

    /// Run the configured sort, then re-filter and reserialize.
    fn run_sort(&mut self) -> Result<()> {
        let Some(snapshot) = self.sort_snapshot() else {
            return Ok(());
        };
        if self.lazy {
            let request = self.lazy_request();
            self.events.push(TableEvent::LazyLoad(request));
        } else {
            sort_tree(&mut self.store, &snapshot, self.custom_sort.as_ref());
            if self.has_filter() {
                self.apply_filter()?;
            }
        }
        self.events.push(TableEvent::SortApplied(snapshot));
        self.update_serialized();
        Ok(())
    }

    /// Run the filter pass, reset to the first page, and reserialize.
    fn run_filter_pass(&mut self) -> Result<()> {
        if self.lazy {
            let request = self.lazy_request();
            self.events.push(TableEvent::LazyLoad(request));
        } else if !self.has_filter() {
            self.filtered = None;
            self.total_records = self.store.roots().len();
        } else {
            self.apply_filter()?;
        }
        self.first = 0;
        let roots = match &self.filtered {
            Some(view) => view.iter().map(|node| node.id).collect(),
            None => self.store.roots().to_vec(),
        };
        self.events.push(TableEvent::FilterApplied { roots });
        self.update_serialized();
        Ok(())
    }

    /// Run `apply_filters`, committing the view only on success.
    fn apply_filter(&mut self) -> Result<()> {
        let filtered = apply_filters(
            &self.store,
            &self.registry,
            self.filter_mode,
            &self.filters,
            &self.columns,
            self.global_filter_fields.as_deref(),
        )?;
        self.filtered = filtered;
        self.total_records = self.active_root_count();
        Ok(())
    }
}

/// Headless tree table engine.
///
/// `TreeTable` owns the node store and every derived artifact: the sorted
/// children order, the filtered view, and the flat row sequence handed to
/// a windowed renderer. Operations mirror the interactions of a tree table
/// UI (sort a column, type into a filter, toggle a checkbox, flip a page)
/// and push [`TableEvent`]s for the consumer to drain.
///
/// # Example
///
/// ```
/// use treegrid::node::TreeNode;
/// use treegrid::table::TreeTable;
///
/// let table = TreeTable::with_value(vec![
///     TreeNode::new().with_field("name", "Documents").expanded().with_children(vec![
///         TreeNode::new().with_field("name", "resume.doc"),
///     ]),
/// ]);
/// table.sort_by("name").unwrap();
/// assert_eq!(table.rows().len(), 2);
/// ```
pub struct TreeTable {
    /// Unique identifier.
    id: TreeTableId,
    /// Internal state.
    inner: Arc<RwLock<Inner>>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
}

impl TreeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            id: TreeTableId::new(),
            inner: Arc::new(RwLock::new(Inner::new())),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a table holding an initial tree value.
    pub fn with_value(roots: Vec<TreeNode>) -> Self {
        let table = Self::new();
        if let Ok(mut guard) = table.inner.write() {
            guard.store.replace(roots);
            guard.total_records = guard.store.roots().len();
            guard.update_serialized();
        }
        table
    }

    /// Get the unique ID.
    pub fn id(&self) -> TreeTableId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Declare the column fields (consulted by the global filter).
    pub fn with_columns(self, columns: Vec<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.columns = columns;
        }
        self
    }

    /// Set the sorting strategy.
    pub fn with_sort_mode(self, mode: SortMode) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.sort_mode = mode;
        }
        self
    }

    /// Set the direction a freshly sorted column starts with.
    pub fn with_default_sort_order(self, order: SortOrder) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.default_sort_order = order;
            guard.sort_order = order;
        }
        self
    }

    /// Replace the built-in comparator with an external sort function.
    pub fn with_custom_sort(self, custom: SortFunction) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.custom_sort = Some(custom);
        }
        self
    }

    /// Set how non-leaf nodes qualify under filters.
    pub fn with_filter_mode(self, mode: FilterMode) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.filter_mode = mode;
        }
        self
    }

    /// Inject a match-mode registry (replaces the default one).
    pub fn with_filter_registry(self, registry: FilterRegistry) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.registry = registry;
        }
        self
    }

    /// Restrict the global filter to an explicit field list.
    pub fn with_global_filter_fields(self, fields: Vec<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.global_filter_fields = Some(fields);
        }
        self
    }

    /// Paginate over roots with the given page size.
    pub fn with_paginator(self, rows: usize) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.paginator = true;
            guard.page_rows = rows;
            guard.update_serialized();
        }
        self
    }

    /// Delegate sorting/filtering/pagination to an external data source.
    ///
    /// `total_records` comes from the source since the local tree only
    /// holds the current page.
    pub fn with_lazy(self, total_records: usize) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.lazy = true;
            guard.total_records = total_records;
            guard.update_serialized();
        }
        self
    }

    /// Set the selection mode.
    pub fn with_selection_mode(self, mode: SelectionMode) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection_mode = mode;
        }
        self
    }

    /// Store selection in an external key map resolved from `data_key`
    /// (falling back to node identity) instead of the legacy node list.
    pub fn with_key_selection(self, data_key: Option<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection = SelectionModel::KeyMap(KeySelection::new(data_key));
        }
        self
    }

    /// Fixed row height handed to the windowed renderer.
    pub fn with_row_height(self, height: u16) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.row_height = height;
        }
        self
    }

    // -------------------------------------------------------------------------
    // Tree value
    // -------------------------------------------------------------------------

    /// Replace the tree wholesale with a new value.
    ///
    /// Re-runs the active sort and filter and rebuilds the row sequence.
    /// Node ids from the previous tree do not survive, so a legacy
    /// selection list is cleared; key-map selection persists across
    /// replacement. Errors only surface from a misconfigured active
    /// filter.
    pub fn set_value(&self, roots: Vec<TreeNode>) -> Result<()> {
        let Ok(mut guard) = self.inner.write() else {
            return Ok(());
        };
        guard.store.replace(roots);
        if let SelectionModel::Legacy(sel) = &mut guard.selection {
            sel.clear();
        }
        if !guard.lazy {
            guard.total_records = guard.store.roots().len();
            if guard.sort_snapshot().is_some() {
                guard.run_sort()?;
            } else if guard.has_filter() {
                guard.run_filter_pass()?;
            }
        }
        guard.update_serialized();
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Expand / collapse
    // -------------------------------------------------------------------------

    /// Toggle a node between expanded and collapsed.
    pub fn toggle_row(&self, id: NodeId) {
        if let Ok(mut guard) = self.inner.write() {
            let expanded = !guard.store.is_expanded(id);
            guard.store.set_expanded(id, expanded);
            guard.events.push(if expanded {
                TableEvent::NodeExpand(id)
            } else {
                TableEvent::NodeCollapse(id)
            });
            guard.update_serialized();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Expand a node.
    pub fn expand(&self, id: NodeId) {
        if let Ok(mut guard) = self.inner.write()
            && !guard.store.is_expanded(id)
        {
            guard.store.set_expanded(id, true);
            guard.events.push(TableEvent::NodeExpand(id));
            guard.update_serialized();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Collapse a node.
    pub fn collapse(&self, id: NodeId) {
        if let Ok(mut guard) = self.inner.write()
            && guard.store.is_expanded(id)
        {
            guard.store.set_expanded(id, false);
            guard.events.push(TableEvent::NodeCollapse(id));
            guard.update_serialized();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Whether a node is expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.inner
            .read()
            .map(|guard| guard.store.is_expanded(id))
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Sort by a column in single mode.
    ///
    /// Sorting the already active field flips its direction; a new field
    /// starts at the default direction.
    pub fn sort_by(&self, field: &str) -> Result<()> {
        let Ok(mut guard) = self.inner.write() else {
            return Ok(());
        };
        if guard.sort_mode != SortMode::Single {
            return Ok(());
        }
        guard.sort_order = if guard.sort_field.as_deref() == Some(field) {
            guard.sort_order.flipped()
        } else {
            guard.default_sort_order
        };
        guard.sort_field = Some(field.to_string());
        guard.run_sort()?;
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Sort by a column in multiple mode.
    ///
    /// With `meta_key` the column is added to (or flipped inside) the
    /// criteria list; without it the list is replaced by this column
    /// alone.
    pub fn sort_by_multi(&self, field: &str, meta_key: bool) -> Result<()> {
        let Ok(mut guard) = self.inner.write() else {
            return Ok(());
        };
        if guard.sort_mode != SortMode::Multiple {
            return Ok(());
        }
        match guard
            .multi_sort_meta
            .iter()
            .position(|meta| meta.field == field)
        {
            Some(pos) => {
                let flipped = guard.multi_sort_meta[pos].order.flipped();
                if meta_key {
                    guard.multi_sort_meta[pos].order = flipped;
                } else {
                    guard.multi_sort_meta = vec![SortMeta::new(field, flipped)];
                }
            }
            None => {
                if !meta_key {
                    guard.multi_sort_meta.clear();
                }
                let order = guard.default_sort_order;
                guard.multi_sort_meta.push(SortMeta::new(field, order));
            }
        }
        guard.run_sort()?;
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// The active multi-sort criteria.
    pub fn multi_sort_meta(&self) -> Vec<SortMeta> {
        self.inner
            .read()
            .map(|guard| guard.multi_sort_meta.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Set or clear a field filter and run the pass.
    ///
    /// Blank values (null, whitespace string, empty list) clear the entry.
    /// Callers typically debounce rapid input themselves; running the pass
    /// repeatedly has no effect beyond producing fresh derived output.
    pub fn filter(&self, field: &str, value: impl Into<Value>, match_mode: &str) -> Result<()> {
        let Ok(mut guard) = self.inner.write() else {
            return Ok(());
        };
        let value = value.into();
        if FilterMeta::is_blank(&value) {
            guard.filters.remove(field);
        } else {
            guard
                .filters
                .insert(field.to_string(), FilterMeta::with_mode(value, match_mode));
        }
        guard.run_filter_pass()?;
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Set or clear the global filter and run the pass.
    pub fn filter_global(&self, value: impl Into<Value>, match_mode: &str) -> Result<()> {
        self.filter(GLOBAL_FILTER_KEY, value, match_mode)
    }

    /// Re-run the filter pass with the current entries.
    pub fn run_filter(&self) -> Result<()> {
        let Ok(mut guard) = self.inner.write() else {
            return Ok(());
        };
        guard.run_filter_pass()?;
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Whether any filter entry is active.
    pub fn has_filter(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.has_filter())
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Move the pagination window.
    pub fn set_page(&self, first: usize, rows: usize) {
        if let Ok(mut guard) = self.inner.write() {
            guard.first = first;
            guard.page_rows = rows;
            if guard.lazy {
                let request = guard.lazy_request();
                guard.events.push(TableEvent::LazyLoad(request));
            } else {
                guard.update_serialized();
            }
            guard.events.push(TableEvent::PageChanged { first, rows });
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Total roots in the active (filtered) tree, or the external total in
    /// lazy mode.
    pub fn total_records(&self) -> usize {
        self.inner
            .read()
            .map(|guard| guard.total_records)
            .unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Row-click selection: single mode replaces the selection, multiple
    /// mode toggles the row's membership. No checkbox propagation.
    pub fn select_row(&self, id: NodeId) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.selection_mode == SelectionMode::None {
                return;
            }
            let single = guard.selection_mode == SelectionMode::Single;
            let inner = &mut *guard;
            match &mut inner.selection {
                SelectionModel::Legacy(sel) => {
                    if single {
                        sel.select_only(id);
                    } else {
                        sel.toggle_membership(id);
                    }
                }
                SelectionModel::KeyMap(sel) => {
                    if single {
                        sel.select_only(&inner.store, id);
                    } else {
                        sel.toggle_membership(&inner.store, id);
                    }
                }
            }
            inner.events.push(TableEvent::SelectionChanged);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Toggle a node's checkbox, propagating down then up.
    pub fn toggle_checkbox(&self, id: NodeId) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.selection_mode != SelectionMode::Multiple {
                return;
            }
            let inner = &mut *guard;
            match &mut inner.selection {
                SelectionModel::Legacy(sel) => {
                    sel.toggle(&mut inner.store, id);
                }
                SelectionModel::KeyMap(sel) => {
                    let check = !sel.is_checked(&inner.store, id);
                    sel.toggle(&inner.store, id, check);
                }
            }
            inner.events.push(TableEvent::SelectionChanged);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Toggle every root of the active (filtered) tree (header checkbox).
    pub fn toggle_all(&self, check: bool) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.selection_mode != SelectionMode::Multiple {
                return;
            }
            let inner = &mut *guard;
            let roots: Vec<NodeId> = match &inner.filtered {
                Some(view) => view.iter().map(|node| node.id).collect(),
                None => inner.store.roots().to_vec(),
            };
            match &mut inner.selection {
                SelectionModel::Legacy(sel) => {
                    sel.toggle_all(&mut inner.store, &roots, check);
                }
                SelectionModel::KeyMap(sel) => {
                    sel.toggle_all(&inner.store, &roots, check);
                }
            }
            inner.events.push(TableEvent::SelectionChanged);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Whether a node is checked under the active selection storage.
    pub fn is_node_selected(&self, id: NodeId) -> bool {
        self.inner
            .read()
            .map(|guard| guard.selection.is_checked(&guard.store, id))
            .unwrap_or(false)
    }

    /// Whether a node is partially checked under the active storage.
    pub fn is_node_partial_selected(&self, id: NodeId) -> bool {
        self.inner
            .read()
            .map(|guard| guard.selection.is_partial_checked(&guard.store, id))
            .unwrap_or(false)
    }

    /// Selected node ids in legacy storage.
    pub fn selected_nodes(&self) -> Result<Vec<NodeId>> {
        let Ok(guard) = self.inner.read() else {
            return Ok(Vec::new());
        };
        match &guard.selection {
            SelectionModel::Legacy(sel) => Ok(sel.selected().to_vec()),
            SelectionModel::KeyMap(_) => Err(Error::SelectionStorageMismatch(
                "selected_nodes requires legacy selection",
            )),
        }
    }

    /// The key map in key-map storage.
    pub fn selection_keys(&self) -> Result<HashMap<String, KeyState>> {
        let Ok(guard) = self.inner.read() else {
            return Ok(HashMap::new());
        };
        match &guard.selection {
            SelectionModel::KeyMap(sel) => Ok(sel.keys().clone()),
            SelectionModel::Legacy(_) => Err(Error::SelectionStorageMismatch(
                "selection_keys requires key-map selection",
            )),
        }
    }

    /// Replace the key map wholesale (external selection binding).
    pub fn set_selection_keys(&self, keys: HashMap<String, KeyState>) -> Result<()> {
        let Ok(mut guard) = self.inner.write() else {
            return Ok(());
        };
        match &mut guard.selection {
            SelectionModel::KeyMap(sel) => {
                sel.set_keys(keys);
                guard.events.push(TableEvent::SelectionChanged);
                self.dirty.store(true, Ordering::SeqCst);
                Ok(())
            }
            SelectionModel::Legacy(_) => Err(Error::SelectionStorageMismatch(
                "set_selection_keys requires key-map selection",
            )),
        }
    }

    // -------------------------------------------------------------------------
    // Reset
    // -------------------------------------------------------------------------

    /// Clear sort, filters, and pagination; restore the unfiltered tree.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.sort_field = None;
            guard.sort_order = guard.default_sort_order;
            guard.multi_sort_meta.clear();
            guard.filters.clear();
            guard.filtered = None;
            guard.first = 0;
            if guard.lazy {
                let request = guard.lazy_request();
                guard.events.push(TableEvent::LazyLoad(request));
            } else {
                guard.total_records = guard.store.roots().len();
            }
            guard.update_serialized();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Row access
    // -------------------------------------------------------------------------

    /// Snapshot of the current flat row sequence.
    pub fn rows(&self) -> Vec<Row> {
        self.inner
            .read()
            .map(|guard| guard.serialized.clone())
            .unwrap_or_default()
    }

    /// The visible subset of the row sequence.
    pub fn visible_rows(&self) -> Vec<Row> {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .serialized
                    .iter()
                    .filter(|row| row.visible)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fixed row height for the windowed renderer.
    pub fn row_height(&self) -> u16 {
        self.inner.read().map(|guard| guard.row_height).unwrap_or(1)
    }

    // -------------------------------------------------------------------------
    // Node access
    // -------------------------------------------------------------------------

    /// Root ids of the unfiltered tree.
    pub fn roots(&self) -> Vec<NodeId> {
        self.inner
            .read()
            .map(|guard| guard.store.roots().to_vec())
            .unwrap_or_default()
    }

    /// Child ids of a node in the unfiltered tree.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.inner
            .read()
            .map(|guard| guard.store.children(id).to_vec())
            .unwrap_or_default()
    }

    /// Resolve a data field on a node.
    pub fn node_field(&self, id: NodeId, field: &str) -> Option<Value> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.store.field(id, field).cloned())
    }

    /// Computed leaf predicate for a node.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.inner
            .read()
            .map(|guard| guard.store.is_leaf(id))
            .unwrap_or(true)
    }

    /// Find the first node (depth-first) whose field equals the value.
    pub fn find_by_field(&self, field: &str, value: impl Into<Value>) -> Option<NodeId> {
        let guard = self.inner.read().ok()?;
        let value = value.into();
        let mut stack: Vec<NodeId> = guard.store.roots().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if guard.store.field(id, field) == Some(&value) {
                return Some(id);
            }
            stack.extend(guard.store.children(id).iter().rev());
        }
        None
    }

    // -------------------------------------------------------------------------
    // Events and dirty tracking
    // -------------------------------------------------------------------------

    /// Return and clear the pending events.
    pub fn drain_events(&self) -> Vec<TableEvent> {
        self.inner
            .write()
            .map(|mut guard| std::mem::take(&mut guard.events))
            .unwrap_or_default()
    }

    /// Check if the table has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for TreeTable {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Default for TreeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TreeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeTable")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
