//! Table State
//!
//! Everything a table view needs besides rendering: the column tree, the
//! working rows, row selection, sorting and filtering, coordinated by a
//! [`TableStore`].
//!
//! # Overview
//!
//! - `column`: the column tree and its flattened leaf list
//! - `selection`: per-row checkboxes and the header checkbox flags
//! - `sorter`: in-place sorting of the working rows
//! - `filter`: cumulative column filters rebuilt from the source rows
//! - `store`: the facade that wires the above to the host's rows
//!
//! Rows are any type implementing [`Record`].

mod column;
mod filter;
mod record;
mod selection;
mod sorter;
mod store;

pub use column::{flatten_columns, ColumnId, ColumnNode, ColumnRegistry};
pub use filter::{Filter, FilterResults};
pub use record::{cells_equal, compare_cells, field_greater, order_cells, Record};
pub use selection::Selection;
pub use sorter::{CompareFn, SortDirection, Sorter};
pub use store::{create_store, StoreStates, TableStore};
