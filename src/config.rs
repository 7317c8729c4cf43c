//! Configuration for TabulaDB
//!
//! Centralized configuration with sensible defaults. All knobs are plain
//! values handed to the constructors that need them; there is no global
//! mutable state.

use std::path::PathBuf;

/// Main configuration for a TabulaDB instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for table files.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── users.json
    ///     ├── orders.json
    ///     └── ...          (one JSON array of rows per table)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// Verbose diagnostic logging (lowers the default log filter to debug)
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./tabuladb_data"),
            listen_addr: "127.0.0.1:12345".to_string(),
            verbose: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all table files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Enable verbose diagnostic logging
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
