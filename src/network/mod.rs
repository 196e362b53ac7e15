//! Network Module
//!
//! Socket lifecycle, line-based request/reply exchange, and endpoint-keyed
//! connection sharing.

mod connection;
mod pool;

pub use connection::{Connection, LogDirection, LogEntry};
pub use pool::{ConnectionPool, SharedConnection};
