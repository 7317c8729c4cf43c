//! TCP Server
//!
//! Accepts connections and spawns one worker thread per client.

use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::engine::Database;
use crate::error::Result;
use crate::network::Connection;

/// TCP server for TabulaDB
pub struct Server {
    config: Config,
    db: Arc<Database>,
}

impl Server {
    /// Create a new server with the given config and database
    pub fn new(config: Config, db: Arc<Database>) -> Self {
        Self { config, db }
    }

    /// Bind and serve (blocking).
    ///
    /// Failure to bind the listen address is fatal and propagated to the
    /// caller. After that, accept and connection errors only affect the
    /// connection they happened on.
    pub fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr)?;
        tracing::info!("Listening on {}", self.config.listen_addr);

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let db = Arc::clone(&self.db);
            thread::spawn(move || match Connection::new(stream, db) {
                Ok(mut connection) => {
                    if let Err(e) = connection.handle() {
                        tracing::warn!(
                            "Connection to {} ended with error: {}",
                            connection.peer_addr(),
                            e
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to set up connection: {}", e);
                }
            });
        }

        Ok(())
    }
}
