//! The consumer-facing view of a client.

use gambit_connection::ConnectionStatus;
use gambit_session::{Outcome, Phase, Session, SessionEvent};

/// What a UI should show.
///
/// Keeps apart the cases a player cares about: the link is down for good
/// (`Disconnected`), nobody to play yet (`WaitingForOpponent`), the game
/// ended (`Finished`), or the link dropped mid-game (`Abandoned`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    /// Dialing or waiting to redial the relay.
    Connecting,
    /// Connected, waiting for the relay to pair us.
    WaitingForOpponent,
    /// Paired. `my_turn` is `true` while a local move would be accepted,
    /// including the opening where either side may move first.
    Playing { my_turn: bool },
    /// The game ended. Stays until the next pairing.
    Finished(Outcome),
    /// The link dropped mid-game and nobody resolved the game.
    Abandoned,
    /// Reconnection gave up, or the client shut down. Terminal.
    Disconnected,
}

impl ClientStatus {
    /// Derives the status from the link and the session.
    pub(crate) fn derive(
        link: ConnectionStatus,
        session: &Session,
        stopped: bool,
    ) -> Self {
        if stopped {
            return Self::Disconnected;
        }
        if let Some(outcome) = session.outcome() {
            return Self::Finished(outcome);
        }
        if session.is_abandoned() {
            return Self::Abandoned;
        }
        if link != ConnectionStatus::Open {
            return Self::Connecting;
        }
        match session.phase() {
            // An outcome was handled above.
            Phase::Unpaired | Phase::GameOver => Self::WaitingForOpponent,
            phase => Self::Playing {
                my_turn: phase.accepts_moves(),
            },
        }
    }
}

/// Everything a client reports, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The status changed.
    Status(ClientStatus),
    /// Something happened in the game.
    Session(SessionEvent),
}
