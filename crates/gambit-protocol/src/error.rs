//! Error types for the protocol layer.
//!
//! Each crate in Gambit defines its own error enum. When you see a
//! `ProtocolError`, the problem is the shape of a frame, not the network
//! and not the game rules.

/// Errors that can occur while decoding a wire frame.
///
/// None of these are fatal: the session coordinator logs them and drops
/// the frame, because the peer on the other end is not trusted to be
/// well-behaved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The frame had no content at all.
    #[error("empty frame")]
    EmptyFrame,

    /// The frame contained a line break. Frames are single-line text.
    #[error("frame contains a line break")]
    MultiLine,

    /// The frame is invalid at the protocol level for another reason.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
