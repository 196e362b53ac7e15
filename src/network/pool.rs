//! Connection pool
//!
//! An explicit registry of shared connections keyed by endpoint address and
//! secret, passed to clients instead of hiding behind process-wide state.
//! Sessions that check out the same (address, secret) pair drive the same
//! physical socket and therefore share one index-id space.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Connection;

/// Shared handle to a pooled connection
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Endpoint-keyed registry of connections
///
/// Cloning the pool clones the handle; all clones see the same connections.
#[derive(Clone, Default)]
pub struct ConnectionPool {
    inner: Arc<Mutex<HashMap<String, SharedConnection>>>,
}

impl ConnectionPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out the connection for an endpoint, creating it on first use
    ///
    /// The secret participates in the key so that endpoints that happen to
    /// share an address but authenticate differently get distinct sockets.
    pub fn checkout(&self, addr: &str, secret: Option<&str>) -> SharedConnection {
        let key = format!("{}|{}", addr, secret.unwrap_or(""));

        let mut inner = self.inner.lock();
        Arc::clone(
            inner
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(Connection::new(addr)))),
        )
    }

    /// Number of distinct endpoints seen so far
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the pool has handed out any connections
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
