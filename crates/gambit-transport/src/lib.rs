//! Transport abstraction layer for Gambit.
//!
//! Provides the [`Connection`], [`Connector`] and [`Transport`] traits that
//! abstract over a duplex link carrying newline-free UTF-8 text frames.
//!
//! - [`Connector`] is the client side: it dials a target address and
//!   produces a live [`Connection`]. The connection manager owns one.
//! - [`Transport`] is the server side: it accepts incoming connections.
//!   The relay owns one.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`
//!
//! # Why `impl Future + Send` instead of `async fn`?
//!
//! The connection manager drives its connector from a spawned Tokio task,
//! and `tokio::spawn` requires the whole future to be `Send`. A plain
//! `async fn` in a trait makes no promise about that, so the methods spell
//! the bound out. Implementors can still write `async fn` in their impls.

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector, WebSocketTransport};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Dials a remote endpoint and produces live connections.
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;
    /// The error type for dial failures.
    type Error: std::error::Error + Send + Sync;

    /// Opens a new connection to `address`, offering `protocols` as the
    /// sub-protocol list (empty means "none requested").
    fn connect(
        &self,
        address: &str,
        protocols: &[String],
    ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    fn accept(
        &mut self,
    ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;
}

/// A single connection that can send and receive text frames.
///
/// Send and receive may be called concurrently from different branches of
/// a `tokio::select!`: implementations keep the two directions independent.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one text frame to the remote peer.
    fn send(
        &self,
        frame: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next text frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Closes the connection.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
