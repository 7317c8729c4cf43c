//! # TabulaDB
//!
//! A minimal client-server table store:
//! - Line-oriented text commands over TCP
//!   (CREATE / INSERT / SELECT / DELETE / SHOW)
//! - Schema-less JSON rows, one durable file per table
//! - Per-table linearizable operations
//! - Thread-per-connection server plus an interactive shell
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 TCP Server                   │
//! │          (thread per connection)             │
//! └─────────────────────┬───────────────────────┘
//!                       │ request line
//! ┌─────────────────────▼───────────────────────┐
//! │               Command Parser                 │
//! └─────────────────────┬───────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────┐
//! │          Database (dispatch + dir)           │
//! └──────────┬─────────────────────┬────────────┘
//!            │                     │
//!     ┌──────▼──────┐       ┌──────▼──────┐
//!     │    Table    │  ...  │    Table    │
//!     │ mutex + file│       │ mutex + file│
//!     └─────────────┘       └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod client;
pub mod engine;
pub mod network;
pub mod query;
pub mod row;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use client::Client;
pub use config::Config;
pub use engine::Database;
pub use error::{Result, TabulaError};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TabulaDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
