//! Sorter
//!
//! Sorting reorders the working rows in place with a "greater than"
//! comparator: `compare(field, a, b) == true` means `a` belongs after `b`
//! in ascending order. Clearing the sort direction restores the source
//! order, which also drops any filter applied to the working rows.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reactive::Signal;

use super::record::{field_greater, Record};

/// Column sort direction as shown by a header's sort toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
    /// No sort: rows appear in source order.
    #[default]
    #[serde(rename = "")]
    None,
}

/// A "greater than" comparator over one field of two rows.
pub type CompareFn<T> = dyn Fn(&str, &T, &T) -> bool + Send + Sync;

/// Sorts the shared working rows.
#[derive(Debug, Clone)]
pub struct Sorter<T: Record> {
    source: Signal<Vec<T>>,
    data: Signal<Vec<T>>,
}

impl<T: Record> Sorter<T> {
    pub fn new(source: &Signal<Vec<T>>, data: &Signal<Vec<T>>) -> Self {
        Self {
            source: source.clone(),
            data: data.clone(),
        }
    }

    /// Sort the working rows by `field`.
    ///
    /// Without `compare`, cells are compared with [`field_greater`]. Rows
    /// the comparator cannot tell apart keep their current relative order.
    /// A custom comparator must describe a consistent order; the standard
    /// library sort may panic on one that does not.
    pub fn sort_data(&self, field: &str, direction: SortDirection, compare: Option<&CompareFn<T>>) {
        let greater = |a: &T, b: &T| match compare {
            Some(compare) => compare(field, a, b),
            None => field_greater(field, a, b),
        };

        match direction {
            SortDirection::Asc => {
                debug!(field, "sort ascending");
                self.data.modify(|rows| rows.sort_by(|a, b| ascending(greater(a, b), greater(b, a))));
            }
            SortDirection::Desc => {
                debug!(field, "sort descending");
                self.data
                    .modify(|rows| rows.sort_by(|a, b| ascending(greater(a, b), greater(b, a)).reverse()));
            }
            SortDirection::None => {
                debug!(field, "clear sort");
                self.data.set(self.source.get());
            }
        }
    }
}

fn ascending(a_greater: bool, b_greater: bool) -> Ordering {
    match (a_greater, b_greater) {
        (true, _) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => Ordering::Equal,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
