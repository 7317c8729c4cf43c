//! Network Module
//!
//! TCP server and per-connection handling.
//!
//! ## Architecture
//! - Single acceptor loop
//! - One worker thread per client connection
//! - Newline-delimited requests and responses: one response line per
//!   request line, no pipelining within a connection

mod connection;
mod server;

pub use connection::{Connection, MAX_REQUEST_LEN};
pub use server::Server;
