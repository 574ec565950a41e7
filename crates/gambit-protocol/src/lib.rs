//! Wire protocol for Gambit.
//!
//! This crate defines the "language" two paired participants speak:
//!
//! - **Types** ([`Frame`], [`Role`], [`Snapshot`]): the messages that
//!   travel through the relay.
//! - **Codec** ([`Codec`] trait, [`LiteralCodec`]): how frames are
//!   spelled as text.
//! - **Errors** ([`ProtocolError`]): what can be wrong with a frame.
//!
//! # Architecture
//!
//! The protocol layer sits between the connection manager (raw text) and
//! the session coordinator (game semantics). It doesn't know about sockets
//! or turns, only how to read and write frames.
//!
//! ```text
//! Connection (text) → Protocol (Frame) → Session (pairing, turns, outcome)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{
    Codec, LiteralCodec, DEFAULT_FIRST_MOVER_CLAIM, DEFAULT_PAIR_LITERAL,
    DEFAULT_SECOND_MOVER_CLAIM,
};
pub use error::ProtocolError;
pub use types::{Frame, Role, Snapshot};
