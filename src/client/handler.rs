//! HandlerSocket facade
//!
//! Binds a read session and a write session together. The engine serves
//! reads and writes on physically distinct endpoints with independent
//! index-id spaces, so the two roles never share ids unless they are
//! configured with the same address and secret (in which case the pool hands
//! both roles the same connection).

use crate::config::Config;
use crate::error::Result;
use crate::network::{ConnectionPool, LogDirection, LogEntry};
use crate::protocol::{Row, Value};

use super::{IndexSpec, Session};

/// Wire logs for both roles
#[derive(Debug, Clone)]
pub struct SocketLogs {
    pub reader: Vec<LogEntry>,
    pub writer: Vec<LogEntry>,
}

/// A two-role HandlerSocket client
pub struct HandlerSocket {
    read: Session,
    write: Session,
    debug: bool,
}

impl HandlerSocket {
    /// Build both sessions from a config, checking connections out of `pool`
    pub fn new(config: &Config, pool: &ConnectionPool) -> Self {
        Self {
            read: Session::new(pool, &config.read_addr, config.read_secret.as_deref()),
            write: Session::new(pool, &config.write_addr, config.write_secret.as_deref()),
            debug: config.debug,
        }
    }

    /// Build with a private pool
    pub fn with_config(config: &Config) -> Self {
        Self::new(config, &ConnectionPool::new())
    }

    /// Open an index on the read endpoint
    pub fn open_read_index(&self, spec: &IndexSpec) -> Result<u32> {
        self.read.open_index(spec)
    }

    /// Open an index on the write endpoint
    pub fn open_write_index(&self, spec: &IndexSpec) -> Result<u32> {
        self.write.open_index(spec)
    }

    /// Execute a request on the read endpoint
    pub fn read_request(&self, fields: &[Value]) -> Result<Vec<Row>> {
        self.read.request(fields)
    }

    /// Execute a request on the write endpoint
    pub fn write_request(&self, fields: &[Value]) -> Result<Vec<Row>> {
        self.write.request(fields)
    }

    /// Wire logs accumulated by both roles
    pub fn logs(&self) -> SocketLogs {
        SocketLogs {
            reader: self.read.logs(),
            writer: self.write.logs(),
        }
    }

    /// Emit the accumulated wire logs through `tracing`
    pub fn show_logs(&self) {
        let logs = self.logs();
        emit_role("reader", &logs.reader);
        emit_role("writer", &logs.writer);
    }
}

impl Drop for HandlerSocket {
    fn drop(&mut self) {
        if self.debug {
            self.show_logs();
        }
    }
}

fn emit_role(role: &str, entries: &[LogEntry]) {
    let total: f64 = entries.iter().map(|e| e.elapsed.as_secs_f64()).sum();
    tracing::debug!(role, total_secs = total, "wire log");

    for entry in entries {
        let direction = match entry.direction {
            LogDirection::Sent => "sent",
            LogDirection::Received => "recv",
        };
        let line = String::from_utf8_lossy(&entry.line);
        tracing::debug!(
            role,
            direction,
            elapsed_secs = entry.elapsed.as_secs_f64(),
            command = line.trim_end(),
        );
    }
}
