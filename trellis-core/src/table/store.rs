//! Table Store
//!
//! The store is the state behind one table view. It takes the host's row
//! signal and wires the column registry, selection, sorter and filter
//! around a single shared signal of working rows.
//!
//! # Data Flow
//!
//! ```text
//!   source rows (host) ──watch──► working rows ◄── sort_data / filter_data
//!          │                           │
//!          └──watch──► check list ─────┴──► get_checked_rows
//!                          │
//!                          └──watch──► check_all / half_checked
//! ```
//!
//! Whenever the source rows change, the working rows become a copy of them
//! and every row is unchecked, in that order.
//!
//! Sort and filter share the working rows instead of forming a pipeline.
//! `filter_data` and `reset_filter_data` rebuild them from the source rows,
//! discarding a previous sort; `sort_data` with [`SortDirection::None`]
//! does the same, discarding a previous filter. An ascending or descending
//! sort reorders whatever rows are currently in place.

use serde::Serialize;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::reactive::{Signal, Watch, WatchOptions};

use super::column::{ColumnId, ColumnNode, ColumnRegistry};
use super::filter::{Filter, FilterResults};
use super::record::Record;
use super::selection::Selection;
use super::sorter::{CompareFn, SortDirection, Sorter};

/// Render-ready snapshot of a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStates<T> {
    /// Working rows, after any sort or filter.
    pub data: Vec<T>,
    /// The column tree as registered.
    pub column_tree: Vec<ColumnNode>,
    /// Leaf columns as of the last `update_columns`.
    pub columns: Vec<ColumnNode>,
    pub check_list: Vec<bool>,
    pub check_all: bool,
    pub half_checked: bool,
    pub is_fixed_left: bool,
}

/// State store for one table view.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use trellis_core::reactive::Signal;
/// use trellis_core::table::{create_store, SortDirection};
///
/// let rows = Signal::new(vec![json!({"a": 3}), json!({"a": 1}), json!({"a": 2})]);
/// let store = create_store(&rows);
///
/// store.sort_data("a", SortDirection::Asc, None);
/// assert_eq!(store.states().data, vec![json!({"a": 1}), json!({"a": 2}), json!({"a": 3})]);
/// ```
#[derive(Debug)]
pub struct TableStore<T: Record> {
    config: StoreConfig,
    data: Signal<Vec<T>>,
    columns: ColumnRegistry,
    selection: Selection<T>,
    sorter: Sorter<T>,
    filter: Filter<T>,
    data_watch: Watch,
}

/// Create a store over `source` with the default configuration.
pub fn create_store<T: Record>(source: &Signal<Vec<T>>) -> TableStore<T> {
    TableStore::with_config(source, StoreConfig::default())
}

impl<T: Record> TableStore<T> {
    /// Create a store over `source`.
    pub fn with_config(source: &Signal<Vec<T>>, config: StoreConfig) -> Self {
        let data = Signal::new(Vec::new());

        // Registered before the selection watch so rows reset before the
        // check list does.
        let data_watch = {
            let data = data.clone();
            Watch::new(
                source,
                move |rows: &Vec<T>| data.set(rows.clone()),
                WatchOptions::immediate(),
            )
        };

        debug!(rows = data.with(|rows| rows.len()), ?config, "create table store");

        Self {
            columns: ColumnRegistry::new(),
            selection: Selection::new(source, &data),
            sorter: Sorter::new(source, &data),
            filter: Filter::new(source, &data, config.filter_mode),
            data,
            data_watch,
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Snapshot of everything a table view renders from.
    pub fn states(&self) -> StoreStates<T> {
        StoreStates {
            data: self.data.get(),
            column_tree: self.columns.column_tree(),
            columns: self.columns.columns(),
            check_list: self.selection.check_list(),
            check_all: self.selection.get_all_checked(),
            half_checked: self.selection.half_checked(),
            is_fixed_left: self.columns.is_fixed_left(),
        }
    }

    /// The working rows signal, for hosts that re-render on change.
    pub fn data_signal(&self) -> &Signal<Vec<T>> {
        &self.data
    }

    pub fn column_registry(&self) -> &ColumnRegistry {
        &self.columns
    }

    pub fn selection(&self) -> &Selection<T> {
        &self.selection
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// See [`ColumnRegistry::insert_column`].
    pub fn insert_column(&self, column: ColumnNode, parent: Option<&ColumnId>) {
        self.columns.insert_column(column, parent);
    }

    /// See [`ColumnRegistry::remove_column`].
    pub fn remove_column(&self, id: &ColumnId) {
        self.columns.remove_column(id);
    }

    pub fn sort_column(&self) {
        self.columns.sort_column();
    }

    pub fn update_columns(&self) {
        self.columns.update_columns();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn get_all_checked(&self) -> bool {
        self.selection.get_all_checked()
    }

    /// Check or uncheck every row (a bulk write, not a flag toggle).
    pub fn set_all_checked(&self, checked: bool) {
        self.selection.set_all_checked(checked);
    }

    pub fn set_row_checked(&self, index: usize, checked: bool) -> Result<()> {
        self.selection.set_row_checked(index, checked)
    }

    pub fn toggle_row(&self, index: usize) -> Result<bool> {
        self.selection.toggle_row(index)
    }

    pub fn get_checked_rows(&self) -> Result<Vec<T>> {
        self.selection.get_checked_rows()
    }

    // ------------------------------------------------------------------
    // Sort and filter
    // ------------------------------------------------------------------

    /// See [`Sorter::sort_data`].
    pub fn sort_data(&self, field: &str, direction: SortDirection, compare: Option<&CompareFn<T>>) {
        self.sorter.sort_data(field, direction, compare);
    }

    /// See [`Filter::filter_data`].
    pub fn filter_data(&self, field: &str, results: &FilterResults) {
        self.filter.filter_data(field, results);
    }

    pub fn reset_filter_data(&self) {
        self.filter.reset_filter_data();
    }

    /// Stop reacting to the source rows. The last state stays readable.
    ///
    /// Called automatically on drop.
    pub fn dispose(&self) {
        if self.data_watch.is_disposed() {
            return;
        }
        debug!("dispose table store");
        self.data_watch.dispose();
        self.selection.dispose();
    }
}

impl<T: Record> Drop for TableStore<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
