//! Codec trait and the literal text codec.
//!
//! A "codec" (coder/decoder) converts between [`Frame`]s and the text that
//! actually travels on the wire. The session layer doesn't care HOW frames
//! are spelled, it just needs something that implements [`Codec`]. This is
//! the "strategy pattern": one interface, swappable implementations.
//!
//! [`LiteralCodec`] speaks the classic three-shape protocol: two control
//! literals, and everything else is a position snapshot. The literals are
//! configurable so a deployment can pick sentinels that can never collide
//! with its snapshot notation.

use crate::{Frame, ProtocolError, Role, Snapshot};

/// Default pairing/rematch literal.
pub const DEFAULT_PAIR_LITERAL: &str = "PAIR";

/// Default "sender is first-mover, you take second-mover" literal.
pub const DEFAULT_FIRST_MOVER_CLAIM: &str = "COLOR_B";

/// Default "sender is second-mover, you take first-mover" literal.
pub const DEFAULT_SECOND_MOVER_CLAIM: &str = "COLOR_W";

/// Converts frames to wire text and back.
///
/// ## Trait bounds
///
/// `Send + Sync + 'static` because the codec lives inside the client's
/// driver task, which Tokio may move between worker threads.
pub trait Codec: Send + Sync + 'static {
    /// Spells a frame as wire text. Encoding cannot fail: every frame
    /// variant has a representation.
    fn encode(&self, frame: &Frame) -> String;

    /// Parses wire text into a frame.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the text is empty or spans more than
    /// one line.
    fn decode(&self, text: &str) -> Result<Frame, ProtocolError>;
}

// ---------------------------------------------------------------------------
// LiteralCodec
// ---------------------------------------------------------------------------

/// The literal-sentinel codec.
///
/// ## Example
///
/// ```rust
/// use gambit_protocol::{Codec, Frame, LiteralCodec, Role};
///
/// let codec = LiteralCodec::default();
///
/// assert_eq!(codec.encode(&Frame::Pair), "PAIR");
/// assert_eq!(codec.decode("COLOR_B").unwrap(), Frame::ColorAssign(Role::FirstMover));
///
/// // Anything that isn't a sentinel is a position.
/// let frame = codec.decode("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
/// assert!(matches!(frame, Frame::Position(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralCodec {
    pair: String,
    first_mover_claim: String,
    second_mover_claim: String,
}

impl LiteralCodec {
    /// Builds a codec with custom sentinels.
    ///
    /// # Errors
    /// Each sentinel must itself be a valid single-line frame, and the
    /// three must be distinct, otherwise decoding would be ambiguous.
    pub fn new(
        pair: impl Into<String>,
        first_mover_claim: impl Into<String>,
        second_mover_claim: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let pair = Snapshot::new(pair)?.into_string();
        let first_mover_claim = Snapshot::new(first_mover_claim)?.into_string();
        let second_mover_claim = Snapshot::new(second_mover_claim)?.into_string();

        if pair == first_mover_claim
            || pair == second_mover_claim
            || first_mover_claim == second_mover_claim
        {
            return Err(ProtocolError::InvalidMessage(
                "codec sentinels must be distinct".into(),
            ));
        }

        Ok(Self {
            pair,
            first_mover_claim,
            second_mover_claim,
        })
    }

    /// The pairing literal this codec uses.
    pub fn pair_literal(&self) -> &str {
        &self.pair
    }
}

impl Default for LiteralCodec {
    fn default() -> Self {
        Self {
            pair: DEFAULT_PAIR_LITERAL.to_string(),
            first_mover_claim: DEFAULT_FIRST_MOVER_CLAIM.to_string(),
            second_mover_claim: DEFAULT_SECOND_MOVER_CLAIM.to_string(),
        }
    }
}

impl Codec for LiteralCodec {
    fn encode(&self, frame: &Frame) -> String {
        match frame {
            Frame::Pair => self.pair.clone(),
            Frame::ColorAssign(Role::FirstMover) => self.first_mover_claim.clone(),
            Frame::ColorAssign(Role::SecondMover) => {
                self.second_mover_claim.clone()
            }
            Frame::Position(snapshot) => snapshot.as_str().to_owned(),
        }
    }

    fn decode(&self, text: &str) -> Result<Frame, ProtocolError> {
        if text == self.pair {
            Ok(Frame::Pair)
        } else if text == self.first_mover_claim {
            Ok(Frame::ColorAssign(Role::FirstMover))
        } else if text == self.second_mover_claim {
            Ok(Frame::ColorAssign(Role::SecondMover))
        } else {
            Snapshot::new(text).map(Frame::Position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_encode_uses_classic_literals() {
        let codec = LiteralCodec::default();
        assert_eq!(codec.encode(&Frame::Pair), "PAIR");
        assert_eq!(
            codec.encode(&Frame::ColorAssign(Role::FirstMover)),
            "COLOR_B"
        );
        assert_eq!(
            codec.encode(&Frame::ColorAssign(Role::SecondMover)),
            "COLOR_W"
        );
    }

    #[test]
    fn test_encode_position_is_the_snapshot_verbatim() {
        let codec = LiteralCodec::default();
        let frame = Frame::Position(Snapshot::new(START_FEN).unwrap());
        assert_eq!(codec.encode(&frame), START_FEN);
    }

    #[test]
    fn test_decode_sentinels() {
        let codec = LiteralCodec::default();
        assert_eq!(codec.decode("PAIR"), Ok(Frame::Pair));
        assert_eq!(
            codec.decode("COLOR_B"),
            Ok(Frame::ColorAssign(Role::FirstMover))
        );
        assert_eq!(
            codec.decode("COLOR_W"),
            Ok(Frame::ColorAssign(Role::SecondMover))
        );
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        // "pair" is not the sentinel, so it's an (odd) position snapshot.
        let codec = LiteralCodec::default();
        assert!(matches!(codec.decode("pair"), Ok(Frame::Position(_))));
    }

    #[test]
    fn test_decode_empty_returns_error() {
        let codec = LiteralCodec::default();
        assert_eq!(codec.decode(""), Err(ProtocolError::EmptyFrame));
    }

    #[test]
    fn test_decode_multiline_returns_error() {
        let codec = LiteralCodec::default();
        assert_eq!(codec.decode("PAIR\nPAIR"), Err(ProtocolError::MultiLine));
    }

    #[test]
    fn test_custom_sentinels_are_honored() {
        let codec = LiteralCodec::new("MATCHED", "YOU_ARE_BLACK", "YOU_ARE_WHITE")
            .expect("distinct sentinels");
        assert_eq!(codec.encode(&Frame::Pair), "MATCHED");
        assert_eq!(codec.pair_literal(), "MATCHED");
        assert_eq!(
            codec.decode("YOU_ARE_BLACK"),
            Ok(Frame::ColorAssign(Role::FirstMover))
        );
        // The classic literal is just a snapshot to this codec.
        assert!(matches!(codec.decode("PAIR"), Ok(Frame::Position(_))));
    }

    #[test]
    fn test_new_rejects_duplicate_sentinels() {
        let result = LiteralCodec::new("PAIR", "PAIR", "COLOR_W");
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_new_rejects_empty_sentinel() {
        let result = LiteralCodec::new("", "COLOR_B", "COLOR_W");
        assert_eq!(result, Err(ProtocolError::EmptyFrame));
    }
}
