//! Row/Value model
//!
//! A row is a structurally untyped record: a mapping from field name to any
//! JSON value. Two rows in the same table may have disjoint field sets.
//! The `preserve_order` feature of serde_json keeps fields in insertion
//! order, so a row round-trips through its table file unchanged.
//!
//! This module also owns the value comparison rules shared by WHERE and
//! ORDER BY evaluation:
//! - equality is numeric when both sides are numbers (`1 == 1.0`),
//!   structural otherwise
//! - ordering comparisons (`<`, `>`, ...) are only defined between numbers
//! - the total order used for sorting ranks values by type first
//!   (null < bool < number < string < array < object), then within type

use std::cmp::Ordering;

use serde_json::Value;

/// One schema-less record within a table
pub type Row = serde_json::Map<String, Value>;

/// Check two values for equality.
///
/// Numbers compare numerically regardless of representation, so an integer
/// literal matches a float field holding the same quantity. Everything else
/// uses structural equality.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => numeric_pair(a, b)
            .map(|(x, y)| x == y)
            .unwrap_or(false),
        _ => a == b,
    }
}

/// Extract both sides as floats, if both are numbers.
///
/// Ordering operators are only defined on numeric pairs; a `None` here
/// means the comparison is a no-match, not an error.
pub fn numeric_pair(a: &Value, b: &Value) -> Option<(f64, f64)> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some((x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

/// Total order over JSON values, used as the ORDER BY sort key.
///
/// Values of different types order by type rank; objects are treated as
/// unordered among themselves (ties keep their original relative order,
/// since the sort is stable).
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Array(x), Value::Array(y)) => {
            for (ax, ay) in x.iter().zip(y.iter()) {
                match compare_values(ax, ay) {
                    Ordering::Equal => continue,
                    ord => return ord,
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(_), Value::Object(_)) => Ordering::Equal,
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

// =============================================================================
// Tests
// =============================================================================
