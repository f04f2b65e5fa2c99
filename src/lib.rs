//! # flatkv
//!
//! A minimal HTTP server exposing CRUD over an in-memory key-value store:
//! - Readiness-driven, non-blocking accept/read/write loop (mio)
//! - Exactly one request/response cycle per connection
//! - Lenient HTTP/1.1 framing with flat JSON bodies
//! - Mutex-guarded shared store injected into the router
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Connection Reactor                        │
//! │           (mio Poll, single dispatcher thread)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ raw bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Wire Codec                              │
//! │          (parse request / serialize response)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Request
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Request Router                            │
//! │            (method + path -> store operation)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!                ┌─────────────┐
//!                │    Store    │
//!                │   (Mutex)   │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod store;
pub mod router;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlatKvError, Result};
pub use config::{Config, MalformedRequestPolicy};
pub use store::Store;
pub use router::Router;
pub use network::{Server, ShutdownHandle};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of flatkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
