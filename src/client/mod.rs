//! Client Module
//!
//! The request-building layer: index descriptors, per-endpoint sessions, and
//! the read/write facade.

mod handler;
mod index;
mod session;

pub use handler::{HandlerSocket, SocketLogs};
pub use index::IndexSpec;
pub use session::Session;
