//! TCP Server
//!
//! Readiness-driven reactor: accepts connections and drives each one through
//! its read/dispatch/write cycle on a single thread.

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token, Waker};

use crate::config::Config;
use crate::error::{FlatKvError, Result};
use crate::router::Router;
use crate::store::Store;

use super::connection::{Connection, Step};

const LISTENER: Token = Token(0);
const WAKER: Token = Token(1);
const FIRST_CONNECTION: usize = 2;

/// Requests a running [`Server`] to stop
///
/// Cloneable and usable from any thread.
#[derive(Clone)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    waker: Arc<Waker>,
}

impl ShutdownHandle {
    /// Ask the server to close all connections and return from `run`
    pub fn shutdown(&self) {
        self.requested.store(true, Ordering::SeqCst);
        if let Err(e) = self.waker.wake() {
            tracing::warn!("Failed to wake server for shutdown: {}", e);
        }
    }

    /// Whether shutdown has been requested
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// HTTP server for flatkv
pub struct Server {
    /// Server configuration
    config: Config,

    /// Dispatches parsed requests to the store
    router: Router,

    /// Readiness notification facility
    poll: Poll,

    /// Non-blocking listening socket
    listener: TcpListener,

    /// Open connections keyed by their registration token
    connections: HashMap<Token, Connection>,

    /// Next token to hand out
    next_token: usize,

    /// Shutdown flag plus the waker that interrupts `poll`
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listening socket and register it for accept readiness
    pub fn bind(config: Config, store: Arc<Store>) -> Result<Self> {
        config.validate()?;

        let addr = resolve(&config.listen_addr)?;
        let poll = Poll::new()?;

        let mut listener = TcpListener::bind(addr)?;
        poll.registry()
            .register(&mut listener, LISTENER, Interest::READABLE)?;

        let waker = Waker::new(poll.registry(), WAKER)?;
        let shutdown = ShutdownHandle {
            requested: Arc::new(AtomicBool::new(false)),
            waker: Arc::new(waker),
        };

        Ok(Self {
            config,
            router: Router::new(store),
            poll,
            listener,
            connections: HashMap::new(),
            next_token: FIRST_CONNECTION,
            shutdown,
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping `run` from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Run the event loop (blocking)
    ///
    /// Returns `Ok(())` after a shutdown request, or an error if waiting for
    /// readiness fails. Transport errors on single connections only tear
    /// down that connection.
    pub fn run(&mut self) -> Result<()> {
        let mut events = Events::with_capacity(self.config.max_events);
        tracing::info!("Listening on {}", self.local_addr()?);

        while !self.shutdown.is_requested() {
            if let Err(e) = self.poll.poll(&mut events, None) {
                if e.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                tracing::error!("Readiness wait failed: {}", e);
                return Err(e.into());
            }

            for event in events.iter() {
                match event.token() {
                    LISTENER => self.accept_connections(),
                    WAKER => {}
                    token => {
                        let readable =
                            event.is_readable() || event.is_read_closed() || event.is_error();
                        let writable =
                            event.is_writable() || event.is_write_closed() || event.is_error();
                        self.handle_event(token, readable, writable);
                    }
                }
            }
        }

        tracing::info!("Shutting down, closing {} connections", self.connections.len());
        let tokens: Vec<Token> = self.connections.keys().copied().collect();
        for token in tokens {
            self.close_connection(token);
        }

        Ok(())
    }

    /// Accept until the listener would block
    ///
    /// Each stream comes out of mio already non-blocking and is registered
    /// for (edge-triggered) read readiness only.
    fn accept_connections(&mut self) {
        loop {
            match self.listener.accept() {
                Ok((mut stream, peer_addr)) => {
                    let token = self.allocate_token();
                    let registered = self
                        .poll
                        .registry()
                        .register(&mut stream, token, Interest::READABLE);
                    if let Err(e) = registered {
                        tracing::warn!("Failed to register client {}: {}", peer_addr, e);
                        continue;
                    }

                    tracing::debug!("New client connected: {}", peer_addr);
                    self.connections
                        .insert(token, Connection::new(stream, Some(peer_addr)));
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => match accept_retry(e.kind()) {
                    AcceptRetry::Continue => {
                        tracing::debug!("Accept skipped a connection: {}", e);
                        continue;
                    }
                    AcceptRetry::Stop => {
                        tracing::warn!("Accept failed: {}", e);
                        break;
                    }
                },
            }
        }
    }

    /// Drive one connection and apply the step it asks for
    fn handle_event(&mut self, token: Token, readable: bool, writable: bool) {
        let Some(connection) = self.connections.get_mut(&token) else {
            return;
        };

        let step = connection.advance(
            readable,
            writable,
            &self.router,
            self.config.read_chunk_size,
            self.config.malformed_requests,
        );

        match step {
            Step::Idle => {}
            Step::AwaitWritable => {
                let reregistered = self
                    .poll
                    .registry()
                    .reregister(connection.stream_mut(), token, Interest::WRITABLE);
                if let Err(e) = reregistered {
                    tracing::warn!("Failed to wait for write readiness: {}", e);
                    self.close_connection(token);
                }
            }
            Step::Close => self.close_connection(token),
        }
    }

    /// Deregister and drop a connection; a no-op for unknown tokens
    fn close_connection(&mut self, token: Token) {
        let Some(mut connection) = self.connections.remove(&token) else {
            return;
        };

        if let Err(e) = self.poll.registry().deregister(connection.stream_mut()) {
            tracing::trace!("Deregister of {} failed: {}", connection.peer_addr(), e);
        }
        tracing::debug!("Closed connection to {}", connection.peer_addr());
    }

    fn allocate_token(&mut self) -> Token {
        let token = Token(self.next_token);
        self.next_token += 1;
        token
    }
}

/// Whether the accept loop keeps draining after a failed accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptRetry {
    /// Only the failed connection is lost; the backlog may hold more
    Continue,

    /// Retrying now would spin (would-block or resource exhaustion)
    Stop,
}

/// Classify an accept error
///
/// Listener readiness is edge-triggered, so stopping early leaves queued
/// connections without a wakeup until the next client arrives. Only errors
/// that concern a single queued connection are skipped over.
pub fn accept_retry(kind: io::ErrorKind) -> AcceptRetry {
    match kind {
        io::ErrorKind::Interrupted
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset => AcceptRetry::Continue,
        _ => AcceptRetry::Stop,
    }
}

/// Resolve a `host:port` string to its first socket address
fn resolve(listen_addr: &str) -> Result<SocketAddr> {
    listen_addr
        .to_socket_addrs()
        .map_err(|e| FlatKvError::Config(format!("invalid listen address {}: {}", listen_addr, e)))?
        .next()
        .ok_or_else(|| FlatKvError::Config(format!("{} did not resolve", listen_addr)))
}
