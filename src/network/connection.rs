//! Connection Handler
//!
//! Handles one client connection: read a request line, execute it, write
//! the response line, repeat. The loop ends when the client disconnects or
//! sends an empty line. Per-request failures become response text; only
//! wire-level violations end the connection, and never the server.

use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use crate::engine::Database;
use crate::error::{Result, TabulaError};
use crate::query;

/// Longest accepted request line in bytes (newline included)
pub const MAX_REQUEST_LEN: u64 = 1024 * 1024;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the database
    db: Arc<Database>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, db: Arc<Database>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            db,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads requests in a loop and sends responses. Returns when the
    /// client disconnects, sends an empty line, or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let mut line = String::new();

            // Cap the read so a client cannot grow the line buffer without
            // bound
            let mut limited = Read::take(&mut self.reader, MAX_REQUEST_LEN + 1);
            match limited.read_line(&mut line) {
                Ok(0) => {
                    // Client disconnected gracefully
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Ok(_) => {}
                Err(ref e) if e.kind() == ErrorKind::InvalidData => {
                    // Not UTF-8; answer once and drop the connection, since
                    // the line framing can no longer be trusted
                    tracing::warn!("Client {} sent non-UTF-8 data", self.peer_addr);
                    let _ = self.send_line("Invalid request!");
                    return Ok(());
                }
                Err(ref e)
                    if matches!(
                        e.kind(),
                        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
                    ) =>
                {
                    tracing::debug!("Connection reset by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e.into());
                }
            }

            if line.len() as u64 > MAX_REQUEST_LEN {
                let _ = self.send_line("Invalid request!");
                return Err(TabulaError::Protocol(format!(
                    "request line from {} exceeds {} bytes",
                    self.peer_addr, MAX_REQUEST_LEN
                )));
            }

            let request = line.trim();
            if request.is_empty() {
                // An empty payload ends the session, same as a disconnect
                tracing::debug!("Client {} sent empty request, closing", self.peer_addr);
                return Ok(());
            }

            tracing::trace!("Request from {}: {}", self.peer_addr, request);

            // Parse and execute; both always yield a response payload
            let command = query::parse(request);
            let response = self.db.execute(command);

            if let Err(e) = self.send_line(&response) {
                // If the client disconnected before we could send the
                // response, log and exit gracefully rather than treating it
                // as a server error.
                if let TabulaError::Io(ref io_err) = e {
                    match io_err.kind() {
                        ErrorKind::ConnectionAborted
                        | ErrorKind::ConnectionReset
                        | ErrorKind::BrokenPipe => {
                            tracing::debug!(
                                "Client {} disconnected before response could be sent: {}",
                                self.peer_addr,
                                e
                            );
                            return Ok(());
                        }
                        _ => {}
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Send one response line to the client
    fn send_line(&mut self, response: &str) -> Result<()> {
        self.writer.write_all(response.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
