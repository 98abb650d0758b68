//! Filter Engine
//!
//! Column filters are cumulative. Each `filter_data` call adds its field to
//! the set of filtered fields and recomputes the working rows from the
//! source rows, keeping a row only if every filtered field passes.
//!
//! What "passes" means depends on [`FilterMode`]:
//!
//! - `SharedResults`: every filtered field is checked against the results
//!   list of the *current* call. Lists passed for earlier fields are not
//!   remembered.
//! - `PerField`: each field is checked against the list it was last
//!   filtered with.

use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::config::FilterMode;
use crate::reactive::Signal;

use super::record::{cells_equal, Record};

/// Accepted cell values for a column filter.
pub type FilterResults = [Value];

#[derive(Debug, Default)]
struct FilterState {
    /// Fields filtered since the last reset, in first-filtered order.
    fields: IndexSet<String>,
    /// Last results list per field; only kept in per-field mode.
    per_field: IndexMap<String, Vec<Value>>,
}

/// Filters the shared working rows.
#[derive(Debug)]
pub struct Filter<T: Record> {
    source: Signal<Vec<T>>,
    data: Signal<Vec<T>>,
    mode: FilterMode,
    state: Mutex<FilterState>,
}

impl<T: Record> Filter<T> {
    pub fn new(source: &Signal<Vec<T>>, data: &Signal<Vec<T>>, mode: FilterMode) -> Self {
        Self {
            source: source.clone(),
            data: data.clone(),
            mode,
            state: Mutex::new(FilterState::default()),
        }
    }

    /// Filter `field` to the cells in `results` and rebuild the working
    /// rows from the source rows.
    pub fn filter_data(&self, field: &str, results: &FilterResults) {
        let rows = {
            let mut state = self.state.lock();
            state.fields.insert(field.to_owned());
            if self.mode == FilterMode::PerField {
                state.per_field.insert(field.to_owned(), results.to_vec());
            }

            self.source.with(|rows| {
                rows.iter()
                    .filter(|row| self.keep(row, &state, results))
                    .cloned()
                    .collect::<Vec<_>>()
            })
        };

        debug!(field, kept = rows.len(), mode = ?self.mode, "filter rows");
        self.data.set(rows);
    }

    fn keep(&self, row: &T, state: &FilterState, results: &FilterResults) -> bool {
        match self.mode {
            FilterMode::SharedResults => state
                .fields
                .iter()
                .all(|field| contains(results, row, field)),
            FilterMode::PerField => state
                .per_field
                .iter()
                .all(|(field, accepted)| contains(accepted, row, field)),
        }
    }

    /// Forget every filter and restore the source rows.
    pub fn reset_filter_data(&self) {
        {
            let mut state = self.state.lock();
            state.fields.clear();
            state.per_field.clear();
        }
        debug!("reset filters");
        self.data.set(self.source.get());
    }

    /// Fields filtered since the last reset.
    pub fn filtered_fields(&self) -> Vec<String> {
        self.state.lock().fields.iter().cloned().collect()
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }
}

/// Whether `row[field]` is one of `accepted`. A missing cell never is.
fn contains<T: Record>(accepted: &FilterResults, row: &T, field: &str) -> bool {
    row.field(field)
        .is_some_and(|cell| accepted.iter().any(|value| cells_equal(value, &cell)))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
