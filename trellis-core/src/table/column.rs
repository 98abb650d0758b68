//! Column Registry
//!
//! Tables declare their columns as a tree: a grouped header is a column
//! whose `children` are the columns under it. The registry owns that tree
//! and a flattened list of the columns that actually render a cell (the
//! leaves), in depth-first order.
//!
//! # Refresh Model
//!
//! The flattened list is not kept in sync with the tree. Column components
//! register themselves one by one while the table mounts, and the table
//! calls [`ColumnRegistry::update_columns`] once afterwards, so a mount
//! flattens the tree once rather than once per column.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reactive::{Memo, Signal};

/// Identity of a column. Unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ColumnId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One column of a table, possibly grouping child columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnNode {
    pub id: ColumnId,

    /// Display order among siblings; the root level is sorted ascending.
    #[serde(default)]
    pub order: f64,

    /// Row field rendered by this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Pin the column to the left edge while scrolling horizontally.
    #[serde(default)]
    pub fixed_left: bool,

    /// Child columns. `Some(vec![])` is a group with no columns yet, which
    /// renders nothing; `None` is a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ColumnNode>>,
}

impl ColumnNode {
    /// A leaf column with order 0.
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            order: 0.0,
            field: None,
            header: None,
            fixed_left: false,
            children: None,
        }
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.order = order;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_fixed_left(mut self, fixed_left: bool) -> Self {
        self.fixed_left = fixed_left;
        self
    }

    pub fn with_children(mut self, children: Vec<ColumnNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Whether this column renders cells itself.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Depth-first search for the first column with `id`.
fn find_mut<'a>(columns: &'a mut [ColumnNode], id: &ColumnId) -> Option<&'a mut ColumnNode> {
    for column in columns {
        if column.id == *id {
            return Some(column);
        }
        if let Some(found) = column.children.as_deref_mut().and_then(|c| find_mut(c, id)) {
            return Some(found);
        }
    }
    None
}

fn find<'a>(columns: &'a [ColumnNode], id: &ColumnId) -> Option<&'a ColumnNode> {
    columns.iter().find_map(|column| {
        if column.id == *id {
            Some(column)
        } else {
            column.children.as_deref().and_then(|c| find(c, id))
        }
    })
}

/// Leaves of `columns` in depth-first order. A node with a child list
/// contributes its children in its place, even when the list is empty.
pub fn flatten_columns(columns: &[ColumnNode]) -> Vec<ColumnNode> {
    let mut result = Vec::new();
    collect_leaves(columns, &mut result);
    result
}

fn collect_leaves(columns: &[ColumnNode], out: &mut Vec<ColumnNode>) {
    for column in columns {
        match &column.children {
            Some(children) => collect_leaves(children, out),
            None => out.push(column.clone()),
        }
    }
}

fn sort_by_order(columns: &mut [ColumnNode]) {
    // `sort_by` is stable, so equal orders keep registration order.
    columns.sort_by(|a, b| a.order.total_cmp(&b.order));
}

/// The column tree of one table plus its flattened leaf list.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    tree: Signal<Vec<ColumnNode>>,
    flattened: Signal<Vec<ColumnNode>>,
    fixed_left: Memo<bool>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        let tree = Signal::new(Vec::new());
        let fixed_left = Memo::derived(&tree, |columns: &Vec<ColumnNode>| {
            columns.iter().any(|column| column.fixed_left)
        });

        Self {
            tree,
            flattened: Signal::new(Vec::new()),
            fixed_left,
        }
    }

    /// Add `column` at the root, or as the last child of `parent`.
    ///
    /// `parent` is looked up anywhere in the tree. If it is not found the
    /// tree is left unchanged. Either way the root level is re-sorted by
    /// display order afterwards; deeper levels keep insertion order.
    pub fn insert_column(&self, column: ColumnNode, parent: Option<&ColumnId>) {
        let mut columns = self.tree.get();

        match parent {
            None => {
                debug!(column = %column.id, "insert root column");
                columns.push(column);
            }
            Some(parent_id) => match find_mut(&mut columns, parent_id) {
                Some(parent) => {
                    debug!(column = %column.id, parent = %parent_id, "insert child column");
                    parent.children.get_or_insert_with(Vec::new).push(column);
                }
                None => {
                    debug!(column = %column.id, parent = %parent_id, "parent column not found; ignoring insert");
                }
            },
        }

        sort_by_order(&mut columns);
        self.tree.set(columns);
    }

    /// Remove the root-level column with `id`.
    ///
    /// Only the root level is searched: a nested column cannot be removed
    /// this way, and asking to is a no-op.
    pub fn remove_column(&self, id: &ColumnId) {
        let position = self.tree.with(|columns| columns.iter().position(|c| c.id == *id));

        match position {
            Some(index) => {
                debug!(column = %id, "remove column");
                self.tree.modify(|columns| {
                    columns.remove(index);
                });
            }
            None => debug!(column = %id, "column not at root level; ignoring remove"),
        }
    }

    /// Stable-sort the root level ascending by display order.
    pub fn sort_column(&self) {
        self.tree.modify(|columns| sort_by_order(columns));
    }

    /// Recompute the flattened leaf list from the current tree.
    pub fn update_columns(&self) {
        let flattened = self.tree.with(|columns| flatten_columns(columns));
        debug!(leaves = flattened.len(), "update flattened columns");
        self.flattened.set(flattened);
    }

    /// Snapshot of the column tree.
    pub fn column_tree(&self) -> Vec<ColumnNode> {
        self.tree.get()
    }

    /// Flattened leaf columns as of the last [`update_columns`](Self::update_columns).
    pub fn columns(&self) -> Vec<ColumnNode> {
        self.flattened.get()
    }

    /// Find a column anywhere in the tree.
    pub fn find_column(&self, id: &ColumnId) -> Option<ColumnNode> {
        self.tree.with(|columns| find(columns, id).cloned())
    }

    /// Whether any root-level column is pinned left.
    pub fn is_fixed_left(&self) -> bool {
        self.fixed_left.get()
    }

    /// The tree signal, for hosts that re-render on column changes.
    pub fn tree_signal(&self) -> &Signal<Vec<ColumnNode>> {
        &self.tree
    }

    /// The flattened-columns signal, for hosts that re-render the header
    /// row. It only changes on [`ColumnRegistry::update_columns`].
    pub fn columns_signal(&self) -> &Signal<Vec<ColumnNode>> {
        &self.flattened
    }
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
