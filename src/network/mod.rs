//! Network Module
//!
//! Non-blocking HTTP server built on mio.
//!
//! ## Architecture
//! - Single dispatcher thread owns the listener and every connection
//! - Connections live in a token-keyed registry with an explicit state
//! - Requests are routed through a shared `Router`

mod server;
mod connection;

pub use server::{accept_retry, AcceptRetry, Server, ShutdownHandle};
pub use connection::{
    read_until_blocked, write_until_blocked, Connection, ConnectionState, ReadOutcome, Step,
    WriteOutcome,
};
