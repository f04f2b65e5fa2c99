//! Connection Handler
//!
//! Per-connection state machine driven by readiness events.
//!
//! ```text
//! Accepted ──readable──▶ Reading ──▶ Dispatching ──▶ Writing ──▶ Closed
//!     │                     │             │             │
//!     └─────────────────────┴─────────────┴─────────────┴──▶ Closed
//! ```
//!
//! A connection serves exactly one request. It is registered for reads once,
//! drained until the socket would block, answered, and then closed. If the
//! response cannot be written in one go the reactor re-registers it for
//! write-readiness only; it is never read from again.

use std::io::{self, Read, Write};
use std::net::SocketAddr;

use bytes::{Bytes, BytesMut};
use mio::net::TcpStream;

use crate::config::MalformedRequestPolicy;
use crate::protocol::{parse_request, serialize_response, Response};
use crate::router::Router;

/// Lifecycle state of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered for reads, nothing read yet
    Accepted,

    /// Draining the socket
    Reading,

    /// Parsing and routing the buffered request
    Dispatching,

    /// Sending the serialized response
    Writing,

    /// Done; the reactor must deregister and drop it
    Closed,
}

/// What the reactor should do after driving a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing to do until the next event
    Idle,

    /// The response is partially written; wait for write-readiness
    AwaitWritable,

    /// Deregister and drop the connection
    Close,
}

/// How a drain ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The peer closed its side (read returned zero)
    PeerClosed,

    /// No more data right now
    Drained,
}

/// How a flush ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Every byte was written
    Complete,

    /// The socket buffer is full
    Blocked,
}

/// Read into `buffer` in `chunk_size` pieces until EOF or would-block
///
/// Under edge-triggered readiness no second notification arrives while data
/// remains unread, so this must not stop early.
pub fn read_until_blocked<R: Read>(
    reader: &mut R,
    buffer: &mut BytesMut,
    chunk_size: usize,
) -> io::Result<ReadOutcome> {
    let mut chunk = vec![0u8; chunk_size];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(ReadOutcome::PeerClosed),
            Ok(read) => buffer.extend_from_slice(&chunk[..read]),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(ReadOutcome::Drained),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Write `data[*offset..]`, advancing `offset`, until done or would-block
pub fn write_until_blocked<W: Write>(
    writer: &mut W,
    data: &[u8],
    offset: &mut usize,
) -> io::Result<WriteOutcome> {
    while *offset < data.len() {
        match writer.write(&data[*offset..]) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(written) => *offset += written,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(WriteOutcome::Blocked),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(WriteOutcome::Complete)
}

/// A single client connection
pub struct Connection<S = TcpStream> {
    /// Underlying non-blocking stream
    stream: S,

    /// Peer address for logging
    peer_addr: String,

    /// Current lifecycle state
    state: ConnectionState,

    /// Bytes read so far
    inbound: BytesMut,

    /// Serialized response
    outbound: Bytes,

    /// How much of `outbound` has been written
    written: usize,
}

impl<S: Read + Write> Connection<S> {
    /// Wrap a freshly accepted stream
    pub fn new(stream: S, peer_addr: Option<SocketAddr>) -> Self {
        let peer_addr = peer_addr
            .map(|a| a.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            stream,
            peer_addr,
            state: ConnectionState::Accepted,
            inbound: BytesMut::new(),
            outbound: Bytes::new(),
            written: 0,
        }
    }

    /// Drive the connection after a readiness event
    pub fn advance(
        &mut self,
        readable: bool,
        writable: bool,
        router: &Router,
        chunk_size: usize,
        policy: MalformedRequestPolicy,
    ) -> Step {
        match self.state {
            ConnectionState::Accepted if readable => {
                self.read(chunk_size);
                if self.state == ConnectionState::Dispatching {
                    self.dispatch(router, policy);
                }
                if self.state == ConnectionState::Writing {
                    self.flush();
                }
            }
            ConnectionState::Writing if writable => self.flush(),
            _ => {}
        }

        match self.state {
            ConnectionState::Writing => Step::AwaitWritable,
            ConnectionState::Closed => Step::Close,
            _ => Step::Idle,
        }
    }

    /// Accepted -> Reading -> Dispatching, or Closed on error
    fn read(&mut self, chunk_size: usize) {
        self.state = ConnectionState::Reading;

        match read_until_blocked(&mut self.stream, &mut self.inbound, chunk_size) {
            Ok(outcome) => {
                tracing::trace!(
                    "Read {} bytes from {} ({:?})",
                    self.inbound.len(),
                    self.peer_addr,
                    outcome
                );
                self.state = ConnectionState::Dispatching;
            }
            Err(e) => {
                tracing::warn!("Read error from {}: {}", self.peer_addr, e);
                self.state = ConnectionState::Closed;
            }
        }
    }

    /// Dispatching -> Writing, or Closed when there is nothing to answer
    fn dispatch(&mut self, router: &Router, policy: MalformedRequestPolicy) {
        if self.inbound.is_empty() {
            tracing::debug!("Client {} disconnected without sending data", self.peer_addr);
            self.state = ConnectionState::Closed;
            return;
        }

        let response = match parse_request(&self.inbound) {
            Ok(request) => router.handle(&request),
            Err(e) => match policy {
                MalformedRequestPolicy::Drop => {
                    tracing::debug!("Dropping request from {}: {}", self.peer_addr, e);
                    self.state = ConnectionState::Closed;
                    return;
                }
                MalformedRequestPolicy::Reject => {
                    tracing::debug!("Rejecting request from {}: {}", self.peer_addr, e);
                    Response::error(400, "Malformed request")
                }
            },
        };

        self.outbound = serialize_response(&response);
        self.written = 0;
        self.state = ConnectionState::Writing;
    }

    /// Writing -> Closed once every byte is out; stays Writing on would-block
    fn flush(&mut self) {
        match write_until_blocked(&mut self.stream, &self.outbound, &mut self.written) {
            Ok(WriteOutcome::Complete) => {
                tracing::trace!("Sent {} bytes to {}", self.written, self.peer_addr);
                self.state = ConnectionState::Closed;
            }
            Ok(WriteOutcome::Blocked) => {
                tracing::trace!(
                    "Write to {} blocked at {}/{} bytes",
                    self.peer_addr,
                    self.written,
                    self.outbound.len()
                );
            }
            Err(e) => {
                tracing::warn!("Write error to {}: {}", self.peer_addr, e);
                self.state = ConnectionState::Closed;
            }
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Bytes buffered from the peer
    pub fn inbound(&self) -> &[u8] {
        &self.inbound
    }

    /// Bytes of the response written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Mutable access to the stream (for registry calls)
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
