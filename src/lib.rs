//! # hsclient
//!
//! A client for the HandlerSocket line-oriented protocol:
//! - Direct key-indexed reads and writes against a storage engine's indexes
//! - Persistent TCP connections with lazy open and authentication
//! - Connection-scoped index registries (open-index-on-first-use)
//! - A TTL-aware cache abstraction built on top of the protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Cache Layer                             │
//! │         (TableCache / SharedCache / GroupCache)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 HandlerSocket Facade                         │
//! │             (read Session + write Session)                   │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!     ┌─────────────┐               ┌─────────────┐
//!     │ Connection  │               │ Connection  │
//!     │   (read)    │               │   (write)   │
//!     └──────┬──────┘               └──────┬──────┘
//!            │                              │
//!            ▼                              ▼
//!       TCP socket                     TCP socket
//! ```
//!
//! Connections are checked out of an explicit [`ConnectionPool`] keyed by
//! endpoint address and secret, so two logical clients pointed at the same
//! endpoint share one physical socket (and one index-id space).

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;
pub mod cache;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{HsError, Result};
pub use config::Config;
pub use network::{Connection, ConnectionPool};
pub use client::{HandlerSocket, IndexSpec, Session};
pub use cache::{CacheStore, GroupCache, SharedCache, TableCache};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of hsclient
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
