//! Row access for the table store.
//!
//! The store treats rows as opaque except for one capability: looking up a
//! cell by field name. Sorting and filtering only ever go through
//! [`Record::field`], so any row type can be displayed by implementing it.
//! JSON objects implement it out of the box.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::{Map, Value};

/// A row that can be displayed by a table.
///
/// # Example
///
/// ```rust
/// use std::borrow::Cow;
/// use serde_json::{json, Value};
/// use trellis_core::table::Record;
///
/// #[derive(Clone, PartialEq)]
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl Record for User {
///     fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
///         match key {
///             "name" => Some(Cow::Owned(json!(self.name))),
///             "age" => Some(Cow::Owned(json!(self.age))),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record: Clone + Send + Sync + 'static {
    /// The cell under `key`, or `None` if the row has no such field.
    fn field(&self, key: &str) -> Option<Cow<'_, Value>>;
}

impl Record for Value {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.get(key).map(Cow::Borrowed)
    }
}

impl Record for Map<String, Value> {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.get(key).map(Cow::Borrowed)
    }
}

/// Order two cells of the same kind.
///
/// Numbers compare numerically, strings lexicographically, booleans with
/// `false < true`. Any other pairing (mixed kinds, null, arrays, objects)
/// is unordered.
pub fn compare_cells(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Whether two cells are the same value.
///
/// Like `==` on [`Value`], except that numbers compare by numeric value, so
/// `1` and `1.0` are equal.
pub fn cells_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => a == b,
    }
}

/// Rank of a cell's kind, used to order cells of different kinds.
fn kind_rank(cell: Option<&Value>) -> u8 {
    match cell {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order over optional cells: missing and null first, then booleans,
/// numbers, strings, arrays and objects. Arrays and objects tie with their
/// own kind.
pub fn order_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let by_kind = kind_rank(a).cmp(&kind_rank(b));
    if by_kind != Ordering::Equal {
        return by_kind;
    }
    match (a, b) {
        (Some(a), Some(b)) => compare_cells(a, b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// The default sort comparator: `a[field] > b[field]` under [`order_cells`].
pub fn field_greater<T: Record>(field: &str, a: &T, b: &T) -> bool {
    let (a, b) = (a.field(field), b.field(field));
    order_cells(a.as_deref(), b.as_deref()) == Ordering::Greater
}
