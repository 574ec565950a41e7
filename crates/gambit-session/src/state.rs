//! Session state: the phase machine and game outcomes.

use gambit_protocol::{Role, Snapshot};
use serde::{Deserialize, Serialize};

use crate::DrawRule;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a session is, from the local participant's point of view.
///
/// The phase is never stored. It is derived from the session's fields, so
/// it can't drift out of sync with them:
///
/// ```text
/// outcome set?      ── yes → GameOver
///   │ no
/// paired?           ── no  → Unpaired
///   │ yes
/// role assigned?    ── no  → WaitingForOpponent
///   │ yes
/// my turn?          ── yes → AwaitingMyMove
///                   ── no  → AwaitingPeerMove
/// ```
///
/// `WaitingForOpponent` covers the opening: either side may make the first
/// move, and whoever does becomes the first-mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Unpaired,
    WaitingForOpponent,
    AwaitingMyMove,
    AwaitingPeerMove,
    GameOver,
}

impl Phase {
    /// `true` if a local move could be accepted in this phase.
    pub fn accepts_moves(self) -> bool {
        matches!(self, Self::WaitingForOpponent | Self::AwaitingMyMove)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// How the game ended for the local participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Won,
    Lost,
    Drawn,
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    Checkmate,
    Resignation,
    DrawByRule(DrawRule),
    /// Recorded only through an explicit resolution of an abandoned game.
    Disconnect,
}

/// A finished game's result and the reason for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    pub result: GameResult,
    pub reason: OutcomeReason,
}

impl Outcome {
    pub fn new(result: GameResult, reason: OutcomeReason) -> Self {
        Self { result, reason }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One paired game, as seen by one participant.
///
/// Only the [`Coordinator`](crate::Coordinator) mutates a session; callers
/// get read access through the accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) role: Option<Role>,
    pub(crate) paired: bool,
    pub(crate) my_turn: bool,
    pub(crate) position: Snapshot,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) abandoned: bool,
}

impl Session {
    /// A session that isn't paired yet, sitting at `position`.
    pub(crate) fn unpaired(position: Snapshot) -> Self {
        Self {
            role: None,
            paired: false,
            my_turn: false,
            position,
            outcome: None,
            abandoned: false,
        }
    }

    /// A freshly paired session at `position`: no role, no outcome.
    pub(crate) fn paired(position: Snapshot) -> Self {
        Self {
            paired: true,
            ..Self::unpaired(position)
        }
    }

    /// The derived phase.
    pub fn phase(&self) -> Phase {
        if self.outcome.is_some() {
            Phase::GameOver
        } else if !self.paired {
            Phase::Unpaired
        } else if self.role.is_none() {
            Phase::WaitingForOpponent
        } else if self.my_turn {
            Phase::AwaitingMyMove
        } else {
            Phase::AwaitingPeerMove
        }
    }

    /// The local role, once assigned.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// The whose-turn flag. Meaningless until a role is assigned.
    pub fn is_my_turn(&self) -> bool {
        self.my_turn
    }

    /// The last position applied, local or from the peer.
    pub fn position(&self) -> &Snapshot {
        &self.position
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// `true` when the connection dropped mid-game and nobody has resolved
    /// the game since.
    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Snapshot {
        Snapshot::new("start").unwrap()
    }

    #[test]
    fn test_phase_unpaired_by_default() {
        assert_eq!(Session::unpaired(start()).phase(), Phase::Unpaired);
    }

    #[test]
    fn test_phase_paired_without_role_waits_for_opponent() {
        assert_eq!(
            Session::paired(start()).phase(),
            Phase::WaitingForOpponent
        );
    }

    #[test]
    fn test_phase_follows_turn_flag_once_role_assigned() {
        let mut session = Session::paired(start());
        session.role = Some(Role::SecondMover);
        assert_eq!(session.phase(), Phase::AwaitingPeerMove);
        session.my_turn = true;
        assert_eq!(session.phase(), Phase::AwaitingMyMove);
    }

    #[test]
    fn test_phase_outcome_wins_over_everything() {
        let mut session = Session::paired(start());
        session.role = Some(Role::FirstMover);
        session.my_turn = true;
        session.outcome = Some(Outcome::new(GameResult::Won, OutcomeReason::Checkmate));
        assert_eq!(session.phase(), Phase::GameOver);

        session.paired = false;
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_accepts_moves_only_before_or_on_my_turn() {
        assert!(Phase::WaitingForOpponent.accepts_moves());
        assert!(Phase::AwaitingMyMove.accepts_moves());
        assert!(!Phase::AwaitingPeerMove.accepts_moves());
        assert!(!Phase::Unpaired.accepts_moves());
        assert!(!Phase::GameOver.accepts_moves());
    }
}
