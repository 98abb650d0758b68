//! Error types for the component state layer.

use thiserror::Error;

/// Errors raised by the table store.
///
/// Most store operations are total; structural no-ops (an unknown parent
/// column, a column that is not at the root) are logged, not reported.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A per-row selection write addressed a row that does not exist.
    #[error("row index {index} is out of range for {len} rows")]
    RowOutOfRange { index: usize, len: usize },

    /// The working rows and the selection vector no longer line up, so
    /// checked rows cannot be resolved by position. Happens after a filter
    /// shrinks the working rows.
    #[error("selection vector has {selection} entries but there are {rows} working rows")]
    SelectionMisaligned { rows: usize, selection: usize },

    /// Store configuration could not be parsed.
    #[error("invalid store configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
