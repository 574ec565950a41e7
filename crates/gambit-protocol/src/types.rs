//! Core protocol types for Gambit's wire format.
//!
//! Everything that crosses the relay is one of three frames: a pairing
//! request, a role claim, or a full position snapshot. This module gives
//! them a typed shape; a [`crate::Codec`] maps them to and from text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// One of the two seats in a paired game.
///
/// The first-mover moves on odd plies (in chess: white), the second-mover
/// on even plies (black). A session's role starts out unassigned, which is
/// modeled as `Option<Role>` by the session layer rather than as a third
/// variant here: an unassigned role never travels on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    FirstMover,
    SecondMover,
}

impl Role {
    /// Returns the other seat.
    pub fn opposite(self) -> Self {
        match self {
            Self::FirstMover => Self::SecondMover,
            Self::SecondMover => Self::FirstMover,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMover => write!(f, "first-mover"),
            Self::SecondMover => write!(f, "second-mover"),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A complete serialized position, in whatever notation the rules engine
/// uses (FEN for chess).
///
/// The protocol never looks inside. The only rule enforced here is the
/// framing rule: a snapshot is non-empty, single-line text. Construct one
/// with [`Snapshot::new`] (checked) and read it back with
/// [`Snapshot::as_str`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Snapshot(String);

impl Snapshot {
    /// Wraps `text` as a snapshot, rejecting empty and multi-line input.
    pub fn new(text: impl Into<String>) -> Result<Self, ProtocolError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ProtocolError::EmptyFrame);
        }
        if text.contains(|c: char| c == '\n' || c == '\r') {
            return Err(ProtocolError::MultiLine);
        }
        Ok(Self(text))
    }

    /// The snapshot text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the snapshot, returning the text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Snapshot {
    type Error = ProtocolError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl From<Snapshot> for String {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A single message on the wire, as a tagged variant instead of a string
/// to sniff.
///
/// ```text
/// "PAIR"        ⇄ Frame::Pair
/// "COLOR_B"     ⇄ Frame::ColorAssign(Role::FirstMover)
/// "COLOR_W"     ⇄ Frame::ColorAssign(Role::SecondMover)
/// anything else ⇄ Frame::Position(snapshot)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Pairing or rematch request. Sent by the relay once two connections
    /// are matched, and by a participant to restart the game.
    Pair,

    /// Role claim. The payload is the role the *sender* took; the receiver
    /// takes the opposite one. `ColorAssign(FirstMover)` is the classic
    /// "COLOR_B" ("you are black").
    ColorAssign(Role),

    /// A full position after the sender's move.
    Position(Snapshot),
}

impl Frame {
    /// Short label for logs, without the snapshot body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pair => "pair",
            Self::ColorAssign(_) => "color_assign",
            Self::Position(_) => "position",
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
