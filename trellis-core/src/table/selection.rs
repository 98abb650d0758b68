//! Selection Tracker
//!
//! Row checkboxes are tracked positionally: `check_list[i]` is the checked
//! state of row `i`. Two aggregate flags drive the header checkbox:
//!
//! - `check_all`: every row is checked.
//! - `half_checked`: some rows are checked and some are not.
//!
//! The flags are recomputed by a watch on the check list. When the check
//! list is empty the recompute is skipped and the flags keep their last
//! values, so emptying the table does not flip the header checkbox on.

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::reactive::{Signal, Watch, WatchOptions};

use super::record::Record;

/// Per-row checked state plus the header checkbox flags.
#[derive(Debug)]
pub struct Selection<T: Record> {
    data: Signal<Vec<T>>,
    check_list: Signal<Vec<bool>>,
    check_all: Signal<bool>,
    half_checked: Signal<bool>,
    watches: Vec<Watch>,
}

impl<T: Record> Selection<T> {
    /// Track selection for the rows of `source`, resolving checked rows
    /// against the working rows in `data`.
    pub fn new(source: &Signal<Vec<T>>, data: &Signal<Vec<T>>) -> Self {
        let check_list = Signal::new(Vec::new());
        let check_all = Signal::new(false);
        let half_checked = Signal::new(false);

        let reset = {
            let check_list = check_list.clone();
            Watch::new(
                source,
                move |rows: &Vec<T>| check_list.set(vec![false; rows.len()]),
                WatchOptions::immediate(),
            )
        };

        let recompute = {
            let (check_all, half_checked) = (check_all.clone(), half_checked.clone());
            Watch::new(
                &check_list,
                move |list: &Vec<bool>| recompute_flags(list, &check_all, &half_checked),
                WatchOptions::immediate(),
            )
        };

        Self {
            data: data.clone(),
            check_list,
            check_all,
            half_checked,
            watches: vec![reset, recompute],
        }
    }

    /// Checked state of every row.
    pub fn check_list(&self) -> Vec<bool> {
        self.check_list.get()
    }

    /// Whether row `index` is checked. Out-of-range rows are unchecked.
    pub fn is_row_checked(&self, index: usize) -> bool {
        self.check_list
            .with(|list| list.get(index).copied().unwrap_or(false))
    }

    /// Check or uncheck one row.
    pub fn set_row_checked(&self, index: usize, checked: bool) -> Result<()> {
        let len = self.check_list.with(|list| list.len());
        if index >= len {
            return Err(StoreError::RowOutOfRange { index, len });
        }
        self.check_list.modify(|list| list[index] = checked);
        Ok(())
    }

    /// Flip one row and return its new state.
    pub fn toggle_row(&self, index: usize) -> Result<bool> {
        let checked = !self.is_row_checked(index);
        self.set_row_checked(index, checked)?;
        Ok(checked)
    }

    /// The header checkbox state.
    pub fn get_all_checked(&self) -> bool {
        self.check_all.get()
    }

    /// Check or uncheck every row.
    ///
    /// This is a bulk write: the flag is set and then `checked` is written
    /// into every entry of the check list.
    pub fn set_all_checked(&self, checked: bool) {
        debug!(checked, "set all rows checked");
        self.check_all.set(checked);
        self.check_list.modify(|list| list.fill(checked));
    }

    /// Whether the selection is mixed.
    pub fn half_checked(&self) -> bool {
        self.half_checked.get()
    }

    /// The working rows whose checkbox is checked.
    ///
    /// Fails if the working rows and the check list have different lengths
    /// (for example after a filter), since positions no longer correspond.
    pub fn get_checked_rows(&self) -> Result<Vec<T>> {
        let list = self.check_list.get();
        self.data.with(|rows| {
            if rows.len() != list.len() {
                return Err(StoreError::SelectionMisaligned {
                    rows: rows.len(),
                    selection: list.len(),
                });
            }
            Ok(rows
                .iter()
                .zip(&list)
                .filter(|(_, checked)| **checked)
                .map(|(row, _)| row.clone())
                .collect())
        })
    }

    /// The check list signal, for hosts that re-render row checkboxes on
    /// change.
    pub fn check_list_signal(&self) -> &Signal<Vec<bool>> {
        &self.check_list
    }

    /// Detach from the source rows. The current state stays readable.
    pub fn dispose(&self) {
        for watch in &self.watches {
            watch.dispose();
        }
    }
}

fn recompute_flags(list: &[bool], check_all: &Signal<bool>, half_checked: &Signal<bool>) {
    if list.is_empty() {
        return;
    }
    let all_true = list.iter().all(|checked| *checked);
    let all_false = list.iter().all(|checked| !*checked);

    check_all.set(all_true);
    half_checked.set(!(all_false || all_true));
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
