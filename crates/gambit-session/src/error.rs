//! Error types for the session layer.

/// Errors reported by a [`RulesEngine`](crate::RulesEngine).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// A snapshot could not be loaded: not a position this engine knows.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A square name isn't algebraic notation (`a1`..`h8`).
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),
}

/// Why a local move attempt was refused.
///
/// Every variant means *nothing happened*: no state changed and no frame
/// was sent. A rendering surface should leave its board as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejected {
    /// No opponent yet, or the previous pairing ended. Wait for `PAIR`.
    #[error("not paired with an opponent")]
    NotPaired,

    /// The game has an outcome. A new game starts with the next `PAIR`.
    #[error("the game is over")]
    GameOver,

    /// The role is assigned and it's the peer's turn.
    #[error("not your turn")]
    NotYourTurn,

    /// The rules engine refused the move.
    #[error(transparent)]
    Illegal(#[from] RulesError),
}
