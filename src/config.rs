//! Configuration for flatkv
//!
//! Centralized configuration with sensible defaults.

use crate::error::{FlatKvError, Result};

/// Main configuration for a flatkv server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Maximum readiness events handled per poll wakeup
    pub max_events: usize,

    // -------------------------------------------------------------------------
    // Connection Configuration
    // -------------------------------------------------------------------------
    /// Size of the fixed chunk used for each non-blocking read (in bytes)
    pub read_chunk_size: usize,

    /// What to do with a request whose start line cannot be parsed
    pub malformed_requests: MalformedRequestPolicy,
}

/// Handling of requests the wire codec rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedRequestPolicy {
    /// Close the connection without writing anything
    Drop,

    /// Answer with `400 Bad Request` and an `error` body, then close
    Reject,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            max_events: 64,
            read_chunk_size: 4096,
            malformed_requests: MalformedRequestPolicy::Drop,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the values can actually drive a server
    pub fn validate(&self) -> Result<()> {
        if self.read_chunk_size == 0 {
            return Err(FlatKvError::Config(
                "read_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.max_events == 0 {
            return Err(FlatKvError::Config(
                "max_events must be greater than zero".to_string(),
            ));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(FlatKvError::Config("listen_addr is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address (host:port)
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Listen on all interfaces at the given port
    pub fn port(mut self, port: u16) -> Self {
        self.config.listen_addr = format!("0.0.0.0:{}", port);
        self
    }

    /// Set the per-poll event capacity
    pub fn max_events(mut self, count: usize) -> Self {
        self.config.max_events = count;
        self
    }

    /// Set the read chunk size (in bytes)
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size;
        self
    }

    /// Set the malformed request policy
    pub fn malformed_requests(mut self, policy: MalformedRequestPolicy) -> Self {
        self.config.malformed_requests = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
