//! WHERE clause evaluation
//!
//! A row matches when every condition triple holds (conjunction). Rules for
//! one triple:
//! - a column missing from the row is a non-match for every operator
//!   except `!=` (absent is not equal to any value)
//! - `=` / `!=` use numeric equality when both sides are numbers,
//!   structural equality otherwise
//! - ordering operators apply only to numeric pairs; on anything else they
//!   are an error-free no-match

use crate::query::command::{Condition, Operator};
use crate::row::{numeric_pair, values_equal, Row};

/// Does `row` satisfy all of `conditions`? An empty list matches everything.
pub fn matches(row: &Row, conditions: &[Condition]) -> bool {
    conditions.iter().all(|c| matches_condition(row, c))
}

fn matches_condition(row: &Row, condition: &Condition) -> bool {
    let Some(actual) = row.get(&condition.column) else {
        return condition.op == Operator::NotEq;
    };

    match condition.op {
        Operator::Eq => values_equal(actual, &condition.value),
        Operator::NotEq => !values_equal(actual, &condition.value),
        Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le => {
            match numeric_pair(actual, &condition.value) {
                Some((a, b)) => compare_numeric(condition.op, a, b),
                None => false,
            }
        }
    }
}

fn compare_numeric(op: Operator, a: f64, b: f64) -> bool {
    match op {
        Operator::Eq => a == b,
        Operator::NotEq => a != b,
        Operator::Gt => a > b,
        Operator::Lt => a < b,
        Operator::Ge => a >= b,
        Operator::Le => a <= b,
    }
}

// =============================================================================
// Tests
// =============================================================================
