//! Session
//!
//! One endpoint role (read or write): lazily connects and authenticates,
//! resolves index descriptors to ids, and exchanges request lines for parsed
//! rows.

use parking_lot::MutexGuard;

use crate::error::Result;
use crate::network::{Connection, ConnectionPool, LogEntry, SharedConnection};
use crate::protocol::{build_line, parse_reply, Row, Value, AUTH};

use super::IndexSpec;

/// A request client bound to one endpoint
pub struct Session {
    conn: SharedConnection,
    secret: Option<String>,
}

impl Session {
    /// Bind to an endpoint through a pool
    pub fn new(pool: &ConnectionPool, addr: &str, secret: Option<&str>) -> Self {
        Self {
            conn: pool.checkout(addr, secret),
            secret: secret.map(str::to_string),
        }
    }

    /// Resolve an index descriptor to its id, opening it on first use
    ///
    /// The open-index command is emitted once per descriptor per socket
    /// lifetime; after a reconnect the registry starts empty and the command
    /// is sent again.
    pub fn open_index(&self, spec: &IndexSpec) -> Result<u32> {
        let mut conn = self.conn.lock();
        self.ensure_connected(&mut conn)?;

        conn.register_index(&spec.registry_key(), |id| build_line(&spec.open_fields(id)))
    }

    /// Execute one request and parse the reply into rows
    ///
    /// A request whose write was suppressed by the peer (zero-length write)
    /// produces no reply and yields an empty row set.
    pub fn request(&self, fields: &[Value]) -> Result<Vec<Row>> {
        let mut conn = self.conn.lock();
        self.ensure_connected(&mut conn)?;

        match conn.send(&build_line(fields))? {
            Some(reply) => parse_reply(&reply),
            None => Ok(Vec::new()),
        }
    }

    /// Snapshot of the underlying connection's wire log
    pub fn logs(&self) -> Vec<LogEntry> {
        self.conn.lock().logs().to_vec()
    }

    /// Open the socket and authenticate if not already connected
    ///
    /// The auth reply is consumed but not inspected; a rejected secret
    /// surfaces as a server error on the first real request.
    fn ensure_connected(&self, conn: &mut MutexGuard<'_, Connection>) -> Result<()> {
        if conn.is_open() {
            return Ok(());
        }

        conn.open()?;

        if let Some(secret) = &self.secret {
            let fields = [
                Value::from(AUTH),
                Value::from(1u64),
                Value::from(secret.as_str()),
            ];
            conn.send(&build_line(&fields))?;
        }

        Ok(())
    }
}
