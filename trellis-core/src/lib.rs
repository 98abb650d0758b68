//! Trellis Core
//!
//! This crate provides the state layer of the Trellis UI component library.
//! It implements:
//!
//! - Reactive primitives (signals, watches, memos)
//! - The table store: columns, working rows, selection, sorting, filtering
//!
//! Rendering and styling live in the view layer; this crate only owns the
//! state those views render from.
//!
//! # Architecture
//!
//! - `reactive`: signals and explicit observers
//! - `table`: the table store and its parts
//! - `config`: store options
//! - `error`: the crate error type
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use trellis_core::reactive::Signal;
//! use trellis_core::table::{create_store, ColumnNode};
//!
//! // The host owns the rows
//! let rows = Signal::new(vec![json!({"x": 1}), json!({"x": 2}), json!({"x": 3})]);
//! let store = create_store(&rows);
//!
//! store.insert_column(ColumnNode::new("x").with_field("x"), None);
//! store.update_columns();
//!
//! store.filter_data("x", &[json!(1), json!(3)]);
//! assert_eq!(store.states().data, vec![json!({"x": 1}), json!({"x": 3})]);
//!
//! // Changing the rows resets the working rows and the selection
//! rows.set(vec![json!({"x": 4})]);
//! assert_eq!(store.states().check_list, vec![false]);
//! ```

pub mod config;
pub mod error;
pub mod reactive;
pub mod table;

pub use config::{FilterMode, StoreConfig};
pub use error::{Result, StoreError};
pub use table::{create_store, TableStore};
