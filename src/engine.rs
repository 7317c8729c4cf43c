//! Engine Module
//!
//! The database: a directory of tables plus the dispatcher that maps
//! parsed commands onto them.
//!
//! ## Responsibilities
//! - Load table files from the storage root at startup
//! - Mediate concurrent access (directory lock + per-table locks)
//! - Dispatch commands and render response payloads
//!
//! ## Concurrency Model
//!
//! - The table directory is an `RwLock<HashMap<..>>`: lookups take a brief
//!   read lock, create/delete take the write lock.
//! - Each table serializes its own operations behind its mutex (see
//!   `store::Table`), so operations on different tables never wait on each
//!   other beyond the directory lookup.
//! - Every mutation is durable before its response is produced.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{Result, TabulaError};
use crate::query::{Command, Condition, OrderBy};
use crate::row::Row;
use crate::store::{Table, TABLE_FILE_EXT};

/// The collection of tables and the command dispatcher over them
pub struct Database {
    config: Config,
    data_dir: PathBuf,
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl Database {
    /// Open or create a database rooted at the configured data directory.
    ///
    /// Loads every table file found there. A storage root that cannot be
    /// created or a table file that does not parse is a startup failure;
    /// after startup, per-request errors never tear the database down.
    pub fn open(config: Config) -> Result<Self> {
        let data_dir = config.data_dir.clone();
        fs::create_dir_all(&data_dir)?;

        let mut tables = HashMap::new();
        for entry in fs::read_dir(&data_dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_table_file =
                path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(TABLE_FILE_EXT);
            if !is_table_file {
                continue;
            }

            let table = Table::load(&path)?;
            tracing::debug!(table = %table.name(), rows = table.row_count(), "loaded table");
            tables.insert(table.name().to_string(), Arc::new(table));
        }

        tracing::info!(
            tables = tables.len(),
            dir = %data_dir.display(),
            "database opened"
        );

        Ok(Self {
            config,
            data_dir,
            tables: RwLock::new(tables),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    // =========================================================================
    // Table operations
    // =========================================================================

    /// Create a table if absent. Returns whether it was newly created;
    /// re-creating an existing table is not an error.
    pub fn create_table(&self, name: &str) -> Result<bool> {
        validate_table_name(name)?;

        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Ok(false);
        }

        let table = Arc::new(Table::create(&self.data_dir, name)?);
        tables.insert(name.to_string(), table);
        Ok(true)
    }

    /// Append a row to an existing table
    pub fn insert(&self, name: &str, row: Row) -> Result<()> {
        let table = self
            .lookup(name)
            .ok_or_else(|| TabulaError::TableNotFound(name.to_string()))?;
        table.insert(row)
    }

    /// Read rows: filtered, sorted, truncated. A missing table reads as
    /// empty, not as an error.
    pub fn select(
        &self,
        name: &str,
        conditions: &[Condition],
        order_by: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> Vec<Row> {
        match self.lookup(name) {
            Some(table) => table.select(conditions, order_by, limit),
            None => Vec::new(),
        }
    }

    /// Remove a table and its durable file
    pub fn delete_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        let table = tables
            .remove(name)
            .ok_or_else(|| TabulaError::TableNotFound(name.to_string()))?;

        // Remove the file while still holding the directory lock, so a
        // concurrent create of the same name cannot lose its fresh file.
        table.drop_storage()
    }

    /// Names of all live tables, sorted for stable output
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn lookup(&self, name: &str) -> Option<Arc<Table>> {
        self.tables.read().get(name).cloned()
    }

    // =========================================================================
    // Command dispatch
    // =========================================================================

    /// Execute a parsed command and render its response payload.
    ///
    /// Always produces exactly one response line; errors become error text,
    /// never a dropped request. Invalid commands get a fixed response while
    /// the parser's diagnostic stays in the server log.
    pub fn execute(&self, command: Command) -> String {
        match command {
            Command::CreateTable { table } => match self.create_table(&table) {
                Ok(true) => format!("Table '{table}' created successfully!"),
                Ok(false) => format!("Table '{table}' already exists!"),
                Err(e) => render_error(e),
            },
            Command::Insert { table, row } => match self.insert(&table, row) {
                Ok(()) => "Row inserted successfully!".to_string(),
                Err(e) => render_error(e),
            },
            Command::Select {
                table,
                conditions,
                order_by,
                limit,
            } => {
                let rows = self.select(&table, &conditions, order_by.as_ref(), limit);
                match serde_json::to_string(&rows) {
                    Ok(body) => body,
                    Err(e) => render_error(e.into()),
                }
            }
            Command::DeleteTable { table } => match self.delete_table(&table) {
                Ok(()) => format!("Table '{table}' deleted successfully!"),
                Err(e) => render_error(e),
            },
            Command::ShowTables => {
                let names = self.table_names();
                match serde_json::to_string(&names) {
                    Ok(body) => body,
                    Err(e) => render_error(e.into()),
                }
            }
            Command::Invalid { reason } => {
                tracing::debug!(reason = %reason, "rejected invalid request");
                "Invalid request!".to_string()
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn render_error(e: TabulaError) -> String {
    tracing::warn!(error = %e, "request failed");
    e.to_string()
}

/// A table name becomes a file name under the data directory, so the
/// charset is restricted to keep it there.
fn validate_table_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(TabulaError::InvalidTableName(name.to_string()))
    }
}
