//! The `RulesEngine` trait: the one piece of chess knowledge Gambit needs.
//!
//! The coordinator never inspects a position. It asks the engine to load
//! snapshots, apply moves, and say whether the game has ended. Plug in any
//! rules implementation (a full chess library, a variant, a test script)
//! by implementing this trait.

use gambit_protocol::{Role, Snapshot};
use serde::{Deserialize, Serialize};

use crate::{MoveIntent, RulesError};

/// The result of a successfully applied move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// The position after the move.
    pub snapshot: Snapshot,
    /// Whose move it is now.
    pub side_to_move: Role,
}

/// A rule that ends the game without a winner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DrawRule {
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMove,
    /// Any other engine-specific draw condition.
    Other,
}

/// An engine-defined game end.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    /// The side to move is mated.
    Checkmate,
    /// The game is drawn by the given rule.
    Draw(DrawRule),
}

/// The trait a rules implementation provides to the coordinator.
///
/// ## Contract
///
/// - `apply_move` and `load` leave the engine unchanged when they fail.
/// - After any successful call, `snapshot`, `side_to_move` and `terminal`
///   describe the new position.
///
/// `Send + 'static` because the coordinator lives inside the client's
/// driver task.
pub trait RulesEngine: Send + 'static {
    /// The position every game starts from.
    fn initial_position(&self) -> Snapshot;

    /// Replaces the current position with `snapshot`.
    ///
    /// # Errors
    /// [`RulesError::InvalidSnapshot`] if the text isn't a position this
    /// engine understands.
    fn load(&mut self, snapshot: &Snapshot) -> Result<(), RulesError>;

    /// Plays `intent` from the current position.
    ///
    /// # Errors
    /// [`RulesError::IllegalMove`] if the move isn't legal here.
    fn apply_move(&mut self, intent: &MoveIntent) -> Result<Applied, RulesError>;

    /// The current position.
    fn snapshot(&self) -> Snapshot;

    /// Whose move it is in the current position.
    fn side_to_move(&self) -> Role;

    /// Whether the current position ends the game.
    fn terminal(&self) -> Option<Terminal>;

    /// Loads the initial position and returns it. Called whenever a new
    /// pairing starts a fresh game.
    fn reset(&mut self) -> Snapshot {
        let initial = self.initial_position();
        if let Err(e) = self.load(&initial) {
            tracing::error!(error = %e, "engine rejected its own initial position");
        }
        self.snapshot()
    }
}
