//! Command definitions
//!
//! The typed result of parsing one client request. Commands are ephemeral:
//! they live for exactly one request/response cycle.

use serde_json::Value;

use crate::row::Row;

/// A parsed client request
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create an empty table (no-op if it already exists)
    CreateTable { table: String },

    /// Append one row to an existing table
    Insert { table: String, row: Row },

    /// Read rows, optionally filtered, ordered and truncated
    Select {
        table: String,
        conditions: Vec<Condition>,
        order_by: Option<OrderBy>,
        limit: Option<usize>,
    },

    /// Remove a table and its durable file
    DeleteTable { table: String },

    /// List the names of all tables
    ShowTables,

    /// Anything the parser could not make sense of
    Invalid { reason: String },
}

/// One (column, operator, literal) unit of a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: Operator,
    pub value: Value,
}

/// Comparison operator of a condition triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Operator {
    /// Parse an operator token, `None` for anything unrecognized
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Operator::Eq),
            "!=" => Some(Operator::NotEq),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Ge),
            "<=" => Some(Operator::Le),
            _ => None,
        }
    }
}

/// ORDER BY specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}
