//! Store Module
//!
//! One durable file per table: `<data_dir>/<name>.json` holds the table's
//! rows as a JSON array, in insertion order.
//!
//! ## Responsibilities
//! - Keep the in-memory row sequence and the on-disk file in lockstep
//! - Serialize concurrent operations against one table
//! - Replace the file atomically so readers never observe a partial write

mod table;

pub use table::{Table, TABLE_FILE_EXT};
