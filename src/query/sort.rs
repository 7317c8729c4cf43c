//! ORDER BY evaluation
//!
//! Stable sort keyed by one column: rows with equal keys keep their
//! original relative order. A row missing the column compares below every
//! present value, so it sorts first ascending and last descending.

use crate::query::command::{Direction, OrderBy};
use crate::row::{compare_values, Row};
use serde_json::Value;
use std::cmp::Ordering;

/// Sort rows in place according to the ORDER BY specification
pub fn sort_rows(rows: &mut [Row], order_by: &OrderBy) {
    rows.sort_by(|a, b| {
        let ordering = compare_keys(a.get(&order_by.column), b.get(&order_by.column));
        match order_by.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
}

/// Missing keys order below every present value
fn compare_keys(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare_values(x, y),
    }
}

// =============================================================================
// Tests
// =============================================================================
