//! Connection
//!
//! One TCP socket to one endpoint, driven strictly synchronously: a request
//! line goes out, exactly one reply line comes back. The connection also owns
//! the index registry (index ids are scoped to the live socket) and a log of
//! per-call timings.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use crate::error::{HsError, Result};
use crate::protocol::EOL;

/// Direction of a logged wire exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDirection {
    Sent,
    Received,
}

/// One timed wire exchange, kept for diagnostics
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub direction: LogDirection,
    pub elapsed: Duration,
    /// The raw line, terminator included
    pub line: Vec<u8>,
}

/// A synchronous connection to one endpoint
pub struct Connection {
    /// Endpoint address (host:port)
    addr: String,

    /// Read half (buffered for line framing); `None` while closed
    reader: Option<BufReader<TcpStream>>,

    /// Write half; `None` while closed
    writer: Option<TcpStream>,

    /// Index registry: descriptor key -> index id, scoped to the live socket
    indexes: HashMap<String, u32>,

    /// Accumulated wire log; survives reconnects
    logs: Vec<LogEntry>,
}

impl Connection {
    /// Create a closed connection to an endpoint
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            reader: None,
            writer: None,
            indexes: HashMap::new(),
            logs: Vec::new(),
        }
    }

    /// The endpoint address
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Whether a live socket handle exists
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Establish the TCP connection
    ///
    /// Replaces any previous socket; the index registry starts empty.
    pub fn open(&mut self) -> Result<()> {
        self.close();

        let stream = TcpStream::connect(&self.addr).map_err(|source| HsError::Connection {
            addr: self.addr.clone(),
            source,
        })?;
        stream.set_nodelay(true).ok();

        let read_stream = stream.try_clone().map_err(|source| HsError::Connection {
            addr: self.addr.clone(),
            source,
        })?;

        self.reader = Some(BufReader::new(read_stream));
        self.writer = Some(stream);

        tracing::debug!("connected to {}", self.addr);
        Ok(())
    }

    /// Release the socket; safe to call when already closed
    ///
    /// Index ids do not survive the socket, so the registry is cleared here.
    /// The wire log is kept.
    pub fn close(&mut self) {
        if self.writer.take().is_some() {
            tracing::debug!("closed connection to {}", self.addr);
        }
        self.reader = None;
        self.indexes.clear();
    }

    /// Send one request line and receive the reply line
    ///
    /// Writes loop until the full line is out. A failed write closes the
    /// connection and surfaces as an IO error. A zero-length write means the
    /// peer stopped accepting: the connection stays as-is and `Ok(None)` is
    /// returned without waiting for a reply. After a complete write the call
    /// blocks for exactly one newline-terminated reply and returns it with
    /// the terminator stripped.
    pub fn send(&mut self, line: &[u8]) -> Result<Option<Vec<u8>>> {
        let timer = Instant::now();

        let mut written = 0;
        while written < line.len() {
            let writer = self
                .writer
                .as_mut()
                .ok_or_else(|| io_error(ErrorKind::NotConnected, "socket is not open"))?;

            match writer.write(&line[written..]) {
                Ok(0) => return Ok(None),
                Ok(n) => written += n,
                Err(e) => {
                    self.close();
                    return Err(HsError::Io(e));
                }
            }
        }

        tracing::trace!(addr = %self.addr, "sent {} bytes", line.len());
        self.logs.push(LogEntry {
            direction: LogDirection::Sent,
            elapsed: timer.elapsed(),
            line: line.to_vec(),
        });

        self.receive().map(Some)
    }

    /// Look up a registered index id without side effects
    pub fn index_id(&self, key: &str) -> Option<u32> {
        self.indexes.get(key).copied()
    }

    /// Resolve or register an index descriptor
    ///
    /// A known key returns its id untouched. An unknown key is assigned the
    /// next sequential id (starting at 1), the open-index line produced by
    /// `build(id)` is sent on the spot, and the id is stored - so the wire
    /// command goes out exactly once per key per socket lifetime.
    pub fn register_index<F>(&mut self, key: &str, build: F) -> Result<u32>
    where
        F: FnOnce(u32) -> Vec<u8>,
    {
        if let Some(&id) = self.indexes.get(key) {
            return Ok(id);
        }

        let id = self.indexes.len() as u32 + 1;
        self.send(&build(id))?;
        self.indexes.insert(key.to_string(), id);

        Ok(id)
    }

    /// The accumulated wire log
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Block for one newline-terminated reply line
    fn receive(&mut self) -> Result<Vec<u8>> {
        let timer = Instant::now();

        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| io_error(ErrorKind::NotConnected, "socket is not open"))?;

        let mut line = Vec::new();
        match reader.read_until(EOL, &mut line) {
            Ok(_) => {}
            Err(e) => {
                self.close();
                return Err(HsError::Io(e));
            }
        }

        if line.last() != Some(&EOL) {
            self.close();
            return Err(io_error(
                ErrorKind::UnexpectedEof,
                "connection closed before reply terminator",
            ));
        }

        tracing::trace!(addr = %self.addr, "received {} bytes", line.len());
        self.logs.push(LogEntry {
            direction: LogDirection::Received,
            elapsed: timer.elapsed(),
            line: line.clone(),
        });

        line.pop();
        Ok(line)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

fn io_error(kind: ErrorKind, message: &str) -> HsError {
    HsError::Io(std::io::Error::new(kind, message))
}
