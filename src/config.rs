//! Configuration for hsclient
//!
//! Centralized configuration with sensible defaults.
//!
//! The engine exposes reads and writes as physically distinct endpoints, so
//! the client is configured with one address (and optional shared secret) per
//! role.

/// Main configuration for a [`HandlerSocket`](crate::HandlerSocket) client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Address of the read endpoint (host:port)
    pub read_addr: String,

    /// Shared secret for the read endpoint, if the listener requires auth
    pub read_secret: Option<String>,

    /// Address of the write endpoint (host:port)
    pub write_addr: String,

    /// Shared secret for the write endpoint
    pub write_secret: Option<String>,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// When set, dropping the client emits the accumulated per-call timing
    /// logs through `tracing`
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_addr: "localhost:9998".to_string(),
            read_secret: None,
            write_addr: "localhost:9999".to_string(),
            write_secret: None,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the read endpoint address
    pub fn read_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.read_addr = addr.into();
        self
    }

    /// Set the read endpoint secret
    pub fn read_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.read_secret = Some(secret.into());
        self
    }

    /// Set the write endpoint address
    pub fn write_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.write_addr = addr.into();
        self
    }

    /// Set the write endpoint secret
    pub fn write_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.write_secret = Some(secret.into());
        self
    }

    /// Enable the teardown log dump
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
