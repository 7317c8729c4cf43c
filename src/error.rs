//! Error types for TabulaDB
//!
//! Provides a unified error type for all operations.
//!
//! Malformed client queries are deliberately NOT errors: the parser turns
//! them into `Command::Invalid`, which the dispatcher answers with a fixed
//! invalid-request response. `TabulaError` covers what can go wrong while
//! executing a well-formed command.

use thiserror::Error;

/// Result type alias using TabulaError
pub type Result<T> = std::result::Result<T, TabulaError>;

/// Unified error type for TabulaDB operations
#[derive(Debug, Error)]
pub enum TabulaError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        TabulaError::Serialization(err.to_string())
    }
}
