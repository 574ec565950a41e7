//! Connection lifecycle management for Gambit.
//!
//! This crate keeps one client link to the relay alive:
//!
//! 1. **Dialing**: opening the link through any [`Connector`](gambit_transport::Connector)
//! 2. **Reporting**: every lifecycle change as an ordered [`ConnectionEvent`],
//!    plus a watchable [`ConnectionStatus`]
//! 3. **Reconnection**: bounded retries after unsolicited closes, shaped by a
//!    [`ReconnectPolicy`]
//!
//! # How it fits in the stack
//!
//! ```text
//! Client (above)  ← turns inbound text into session frames, sends moves
//!     ↕
//! Connection Layer (this crate)  ← owns the link, reconnects, reports
//!     ↕
//! Transport Layer (below)  ← provides Connector / Connection
//! ```
//!
//! The manager knows nothing about pairing or games. Everything it
//! receives is passed up as opaque text.

mod error;
mod manager;
mod policy;
mod status;

pub use error::ConnectionError;
pub use manager::ConnectionManager;
pub use policy::{Backoff, ReconnectPolicy};
pub use status::{ConnectionEvent, ConnectionStatus, Reconnect};
