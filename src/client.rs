//! Blocking TCP client
//!
//! One persistent connection speaking the line protocol: send a request
//! line, read the single response line. Used by the interactive shell and
//! by the integration tests.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{Result, TabulaError};

/// A connected TabulaDB client
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one request and wait for its response line
    pub fn request(&mut self, command: &str) -> Result<String> {
        if command.contains('\n') {
            return Err(TabulaError::Protocol(
                "request must be a single line".to_string(),
            ));
        }

        self.writer.write_all(command.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        let mut response = String::new();
        let n = self.reader.read_line(&mut response)?;
        if n == 0 {
            return Err(TabulaError::Protocol(
                "server closed the connection".to_string(),
            ));
        }
        Ok(response.trim_end().to_string())
    }
}
