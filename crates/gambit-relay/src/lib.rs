//! # Gambit relay
//!
//! A minimal rendezvous endpoint for Gambit clients. It pairs connections
//! first come, first served, tells both sides with the pairing literal,
//! and then forwards every text frame verbatim to the partner. It knows
//! nothing about chess: turns, roles and outcomes are decided by the
//! clients.
//!
//! When either side of a pair leaves, the partner's connection is closed
//! so its client reconnects and queues up again.

mod error;
mod handler;
mod server;

pub use error::RelayError;
pub use server::{Relay, RelayBuilder};
