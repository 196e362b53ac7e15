//! Error types for hsclient
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using HsError
pub type Result<T> = std::result::Result<T, HsError>;

/// Unified error type for hsclient operations
#[derive(Debug, Error)]
pub enum HsError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// The initial TCP connect to an endpoint failed.
    #[error("connection to {addr} failed: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A read or write on an established socket failed. The owning
    /// connection is closed as a side effect; the next request reconnects.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// The server answered with a nonzero error code.
    #[error("server error {code}: {}", .message.as_deref().unwrap_or(""))]
    Protocol { code: i32, message: Option<String> },

    /// The reply line violated the wire format (non-numeric error code or
    /// column count, ragged trailing row).
    #[error("malformed reply: {0}")]
    Malformed(String),
}
