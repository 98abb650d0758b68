//! Integration Tests for the Table Store
//!
//! These tests drive a store the way a table view does: the host owns a
//! row signal, columns register themselves, and the user sorts, filters
//! and checks rows.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use trellis_core::reactive::{Signal, Watch, WatchOptions};
use trellis_core::table::{create_store, ColumnNode, SortDirection, TableStore};
use trellis_core::{FilterMode, StoreConfig, StoreError};

fn store_over(rows: Vec<Value>) -> (Signal<Vec<Value>>, TableStore<Value>) {
    let source = Signal::new(rows);
    let store = create_store(&source);
    (source, store)
}

/// Sorting ascending with the default comparator.
#[test]
fn sort_ascending() {
    let (_source, store) = store_over(vec![json!({"a": 3}), json!({"a": 1}), json!({"a": 2})]);

    store.sort_data("a", SortDirection::Asc, None);

    assert_eq!(
        store.states().data,
        vec![json!({"a": 1}), json!({"a": 2}), json!({"a": 3})]
    );
}

/// Sorting descending with the default comparator.
#[test]
fn sort_descending() {
    let (_source, store) = store_over(vec![json!({"a": 3}), json!({"a": 1}), json!({"a": 2})]);

    store.sort_data("a", SortDirection::Desc, None);

    assert_eq!(
        store.states().data,
        vec![json!({"a": 3}), json!({"a": 2}), json!({"a": 1})]
    );
}

/// Clearing the sort gives back a copy of the source rows.
#[test]
fn clearing_sort_round_trips_to_source() {
    let (source, store) = store_over(vec![json!({"a": 3}), json!({"a": 1}), json!({"a": 2})]);

    store.sort_data("a", SortDirection::Desc, None);
    store.sort_data("a", SortDirection::None, None);

    assert_eq!(store.states().data, source.get());
}

/// Filtering one field.
#[test]
fn filter_one_field() {
    let (_source, store) = store_over(vec![json!({"x": 1}), json!({"x": 2}), json!({"x": 3})]);

    store.filter_data("x", &[json!(1), json!(3)]);

    assert_eq!(store.states().data, vec![json!({"x": 1}), json!({"x": 3})]);
}

/// A second field is filtered with the same list, and the first field is
/// checked against that list too.
#[test]
fn filter_second_field_shares_results() {
    let rows = vec![
        json!({"x": 1, "y": 1}),
        json!({"x": 1, "y": 2}),
        json!({"x": 2, "y": 3}),
        json!({"x": 3, "y": 3}),
    ];
    let (_source, store) = store_over(rows);
    let results = [json!(1), json!(3)];

    store.filter_data("x", &results);
    assert_eq!(store.states().data.len(), 3);

    store.filter_data("y", &results);
    assert_eq!(
        store.states().data,
        vec![json!({"x": 1, "y": 1}), json!({"x": 3, "y": 3})]
    );
}

/// The corrected filter mode keeps one list per field.
#[test]
fn per_field_filter_mode() {
    let rows = vec![
        json!({"x": 1, "y": 5}),
        json!({"x": 1, "y": 6}),
        json!({"x": 2, "y": 5}),
    ];
    let source = Signal::new(rows);
    let config = StoreConfig::from_json(r#"{"filter_mode": "per_field"}"#).unwrap();
    assert_eq!(config.filter_mode, FilterMode::PerField);
    let store = TableStore::with_config(&source, config);

    store.filter_data("x", &[json!(1)]);
    store.filter_data("y", &[json!(5)]);

    assert_eq!(store.states().data, vec![json!({"x": 1, "y": 5})]);
}

/// Resetting filters twice leaves the source rows both times.
#[test]
fn reset_filter_is_idempotent() {
    let (source, store) = store_over(vec![json!({"x": 1}), json!({"x": 2})]);
    store.filter_data("x", &[json!(2)]);

    store.reset_filter_data();
    assert_eq!(store.states().data, source.get());

    store.reset_filter_data();
    assert_eq!(store.states().data, source.get());
}

/// A column that gains a child stops being a leaf.
#[test]
fn nested_column_replaces_parent_in_flattened_list() {
    let (_source, store) = store_over(Vec::new());
    let col_a = ColumnNode::new("colA");
    let col_b = ColumnNode::new("colB");

    store.insert_column(col_a.clone(), None);
    store.insert_column(col_b.clone(), Some(&col_a.id));
    store.update_columns();

    let columns = store.states().columns;
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].id, col_b.id);
}

/// Grouped headers flatten depth-first, and the root is ordered.
#[test]
fn column_tree_flattens_depth_first() {
    let (_source, store) = store_over(Vec::new());

    store.insert_column(ColumnNode::new("actions").with_order(9.0), None);
    store.insert_column(ColumnNode::new("person").with_order(1.0), None);
    store.insert_column(ColumnNode::new("first"), Some(&"person".into()));
    store.insert_column(ColumnNode::new("last"), Some(&"person".into()));
    store.insert_column(ColumnNode::new("id").with_order(0.0).with_fixed_left(true), None);
    store.update_columns();

    let states = store.states();
    let leaves: Vec<&str> = states.columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(leaves, vec!["id", "first", "last", "actions"]);
    assert!(states.is_fixed_left);
}

/// Checking all rows from a mixed state.
#[test]
fn set_all_checked_from_mixed_selection() {
    let (_source, store) = store_over(vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 3})]);
    store.set_row_checked(0, true).unwrap();
    store.set_row_checked(2, true).unwrap();
    assert_eq!(store.states().check_list, vec![true, false, true]);
    assert!(store.states().half_checked);

    store.set_all_checked(true);

    let states = store.states();
    assert_eq!(states.check_list, vec![true, true, true]);
    assert!(!states.half_checked);
    assert!(store.get_all_checked());
}

/// The selection vector always matches the source length after a change,
/// and half-checked means a mixed selection.
#[test]
fn selection_invariants_hold_across_source_changes() {
    let (source, store) = store_over(Vec::new());

    for len in [3usize, 0, 5, 1] {
        source.set((0..len).map(|i| json!({ "i": i })).collect());
        let states = store.states();
        assert_eq!(states.check_list.len(), len);

        if len > 1 {
            store.set_row_checked(0, true).unwrap();
            let states = store.states();
            let mixed = states.check_list.contains(&true) && states.check_list.contains(&false);
            assert_eq!(states.half_checked, mixed);
        }
    }
}

/// Checked rows resolve by position while rows and selection line up.
#[test]
fn checked_rows_follow_working_rows() {
    let (_source, store) = store_over(vec![json!({"a": 3}), json!({"a": 1}), json!({"a": 2})]);
    store.set_row_checked(1, true).unwrap();

    assert_eq!(store.get_checked_rows().unwrap(), vec![json!({"a": 1})]);

    store.filter_data("a", &[json!(1)]);
    assert!(matches!(
        store.get_checked_rows(),
        Err(StoreError::SelectionMisaligned { .. })
    ));
}

/// Host watchers on the working rows see every store write.
#[test]
fn host_can_watch_working_rows() {
    let (_source, store) = store_over(vec![json!({"a": 2}), json!({"a": 1})]);
    let renders = Arc::new(AtomicI32::new(0));
    let renders_clone = renders.clone();

    let _watch = Watch::new(
        store.data_signal(),
        move |_| {
            renders_clone.fetch_add(1, Ordering::SeqCst);
        },
        WatchOptions::default(),
    );

    store.sort_data("a", SortDirection::Asc, None);
    store.filter_data("a", &[json!(1)]);
    store.reset_filter_data();

    assert_eq!(renders.load(Ordering::SeqCst), 3);
}

/// A disposed store keeps its last state and ignores the source.
#[test]
fn disposed_store_stops_reacting() {
    let (source, store) = store_over(vec![json!({"a": 1})]);

    store.dispose();
    store.dispose();
    source.set(vec![json!({"a": 1}), json!({"a": 2})]);

    let states = store.states();
    assert_eq!(states.data.len(), 1);
    assert_eq!(states.check_list.len(), 1);
}
