//! Table implementation
//!
//! A table is a named, ordered sequence of schema-less rows backed by one
//! JSON file. All access goes through the table's mutex, which makes
//! concurrent create/insert/read/delete against the same table
//! linearizable: a mutation persists to disk before the lock is released,
//! so the file always reflects a state the table actually held.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{Result, TabulaError};
use crate::query::{matches, sort_rows, Condition, OrderBy};
use crate::row::Row;

/// File extension for table files
pub const TABLE_FILE_EXT: &str = "json";

/// One table: in-memory rows plus their durable file
pub struct Table {
    name: String,
    path: PathBuf,
    state: Mutex<TableState>,
}

struct TableState {
    rows: Vec<Row>,

    /// Set when the table is deleted. An insert racing with the delete may
    /// still hold a handle to this table; the flag makes it fail instead of
    /// resurrecting the file.
    dropped: bool,
}

impl Table {
    /// Create a new empty table and persist its (empty) file
    pub fn create(data_dir: &Path, name: &str) -> Result<Self> {
        let path = data_dir.join(format!("{name}.{TABLE_FILE_EXT}"));
        let table = Self {
            name: name.to_string(),
            path,
            state: Mutex::new(TableState {
                rows: Vec::new(),
                dropped: false,
            }),
        };
        {
            let state = table.state.lock();
            table.persist(&state.rows)?;
        }
        Ok(table)
    }

    /// Load an existing table file
    ///
    /// The file must hold a JSON array of objects; anything else is a
    /// serialization error surfaced at startup.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| TabulaError::InvalidTableName(path.display().to_string()))?
            .to_string();

        let bytes = fs::read(path)?;
        let rows: Vec<Row> = serde_json::from_slice(&bytes).map_err(|e| {
            TabulaError::Serialization(format!("table file {} is corrupt: {e}", path.display()))
        })?;

        Ok(Self {
            name,
            path: path.to_path_buf(),
            state: Mutex::new(TableState {
                rows,
                dropped: false,
            }),
        })
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows currently held
    pub fn row_count(&self) -> usize {
        self.state.lock().rows.len()
    }

    /// Append a row and persist before returning.
    ///
    /// If the write fails the in-memory sequence is rolled back, so memory
    /// and disk stay in lockstep.
    pub fn insert(&self, row: Row) -> Result<()> {
        let mut state = self.state.lock();
        if state.dropped {
            return Err(TabulaError::TableNotFound(self.name.clone()));
        }

        state.rows.push(row);
        if let Err(e) = self.persist(&state.rows) {
            state.rows.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Read rows: filtered, then sorted, then truncated.
    ///
    /// A dropped table reads as empty, matching the contract that SELECT on
    /// a nonexistent table returns no rows rather than an error.
    pub fn select(
        &self,
        conditions: &[Condition],
        order_by: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> Vec<Row> {
        let state = self.state.lock();
        if state.dropped {
            return Vec::new();
        }

        let mut result: Vec<Row> = state
            .rows
            .iter()
            .filter(|row| matches(row, conditions))
            .cloned()
            .collect();
        drop(state);

        if let Some(order_by) = order_by {
            sort_rows(&mut result, order_by);
        }
        if let Some(limit) = limit {
            result.truncate(limit);
        }
        result
    }

    /// Drop the table: mark it dead and remove its file.
    ///
    /// A file that is already gone is not an error; the table is gone
    /// either way.
    pub fn drop_storage(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.dropped = true;
        state.rows.clear();

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Rewrite the table file atomically: write a sibling temp file, sync,
    /// then rename over the old one. A crash mid-write leaves the previous
    /// durable state intact. Called with the table lock held.
    fn persist(&self, rows: &[Row]) -> Result<()> {
        let tmp_path = self.path.with_extension("tmp");
        let bytes = serde_json::to_vec(rows)?;

        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
