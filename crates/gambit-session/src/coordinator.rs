//! The session coordinator: pairing, roles, turns and outcomes.
//!
//! The coordinator is a plain synchronous state machine. Every operation
//! takes an input (an inbound [`Frame`], a local move, a connection
//! change) and returns [`Effects`]: frames to send and events to surface.
//! It never touches a socket, so the same code runs under the async client
//! driver and in unit tests without a runtime.
//!
//! ```text
//!            inbound Frame ─┐
//!               MoveIntent ─┼─→ Coordinator ─→ Effects { outbound, events }
//!  connection lost/restored ─┘        │
//!                                     └─→ RulesEngine (load / apply / terminal)
//! ```

use gambit_protocol::{Frame, Role, Snapshot};

use crate::{
    GameResult, MoveIntent, MoveRejected, Outcome, OutcomeReason, Phase,
    RulesEngine, Session, Terminal,
};

/// Something a consumer (UI, logger, bot) may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A fresh game started with a new or returning opponent.
    Paired,
    /// The local role was decided.
    RoleAssigned(Role),
    /// The position changed, by either side.
    PositionUpdated(Snapshot),
    /// The game ended.
    GameOver(Outcome),
    /// The connection dropped mid-game. No winner was declared.
    Abandoned,
}

/// What an operation wants done: frames to send, in order, and events to
/// surface, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "effects carry frames that must be sent"]
pub struct Effects {
    pub outbound: Vec<Frame>,
    pub events: Vec<SessionEvent>,
}

impl Effects {
    /// `true` when the operation changed nothing visible.
    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.events.is_empty()
    }

    fn send(&mut self, frame: Frame) {
        self.outbound.push(frame);
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}

/// Drives one [`Session`] with one rules engine.
///
/// ## Lifecycle
///
/// ```text
///  [Unpaired] ──PAIR──→ [WaitingForOpponent] ──first move / COLOR_ASSIGN──→ [AwaitingMyMove ⇄ AwaitingPeerMove]
///      ↑                        ↑                                                     │
///      │                        └─────────────────PAIR (rematch)──────────────────────┤
///      │                                                                              ▼
///      └──────────────── connection lost ─────────────────────────── terminal / resign → [GameOver]
/// ```
pub struct Coordinator<E: RulesEngine> {
    engine: E,
    session: Session,
}

impl<E: RulesEngine> Coordinator<E> {
    /// Creates an unpaired coordinator at the engine's initial position.
    pub fn new(mut engine: E) -> Self {
        let position = engine.reset();
        Self {
            engine,
            session: Session::unpaired(position),
        }
    }

    /// Read access to the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Shorthand for `self.session().phase()`.
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Read access to the rules engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    // -----------------------------------------------------------------------
    // Inbound frames
    // -----------------------------------------------------------------------

    /// Applies one frame received from the peer (or the relay).
    pub fn handle_frame(&mut self, frame: Frame) -> Effects {
        tracing::debug!(kind = frame.kind(), phase = ?self.phase(), "inbound frame");
        match frame {
            Frame::Pair => self.on_pair(),
            Frame::ColorAssign(claimed) => self.on_color_assign(claimed),
            Frame::Position(snapshot) => self.on_position(snapshot),
        }
    }

    fn on_pair(&mut self) -> Effects {
        let mut effects = Effects::default();
        // A PAIR that interrupts a game in progress is the peer asking for
        // a rematch; it needs one back to get paired itself. A fresh or
        // unpaired session never answers, and the reset below leaves us
        // fresh, so a reply can never draw another reply.
        let acknowledge = self.game_in_progress();

        let position = self.engine.reset();
        self.session = Session::paired(position);
        tracing::info!(rematch = acknowledge, "paired");

        if acknowledge {
            effects.send(Frame::Pair);
        }
        effects.emit(SessionEvent::Paired);
        effects
    }

    fn on_color_assign(&mut self, claimed: Role) -> Effects {
        let mut effects = Effects::default();
        if !self.session.paired {
            tracing::warn!(%claimed, "role claim while unpaired, ignored");
            return effects;
        }

        match self.session.role {
            None => {
                let role = claimed.opposite();
                self.session.role = Some(role);
                self.session.my_turn = false;
                tracing::info!(%role, "role assigned by peer");
                effects.emit(SessionEvent::RoleAssigned(role));
            }
            Some(role) if role == claimed => {
                // Both sides moved first at the same time.
                tracing::warn!(%role, "peer claimed our role, ignored");
            }
            Some(role) => {
                tracing::debug!(%role, "repeated role claim, ignored");
            }
        }
        effects
    }

    fn on_position(&mut self, snapshot: Snapshot) -> Effects {
        let mut effects = Effects::default();
        if !self.session.paired {
            tracing::warn!("position while unpaired, ignored");
            return effects;
        }

        if let Err(e) = self.engine.load(&snapshot) {
            tracing::warn!(error = %e, "malformed position from peer, ignored");
            return effects;
        }

        self.session.position = snapshot.clone();
        self.session.my_turn = true;
        if self.session.role.is_none() {
            // The role claim never arrived; the position says who we are.
            let role = self.engine.side_to_move();
            self.session.role = Some(role);
            tracing::info!(%role, "role inferred from position");
            effects.emit(SessionEvent::RoleAssigned(role));
        }
        effects.emit(SessionEvent::PositionUpdated(snapshot));

        self.detect_terminal(&mut effects);
        effects
    }

    // -----------------------------------------------------------------------
    // Local operations
    // -----------------------------------------------------------------------

    /// Validates and plays a local move.
    ///
    /// # Errors
    /// - [`MoveRejected::GameOver`]: the game has an outcome
    /// - [`MoveRejected::NotPaired`]: no opponent
    /// - [`MoveRejected::NotYourTurn`]: role assigned, peer's turn
    /// - [`MoveRejected::Illegal`]: the engine refused the move
    ///
    /// On error nothing changes and nothing is sent.
    pub fn attempt_move(
        &mut self,
        intent: &MoveIntent,
    ) -> Result<Effects, MoveRejected> {
        if self.session.outcome.is_some() {
            return Err(MoveRejected::GameOver);
        }
        if !self.session.paired {
            return Err(MoveRejected::NotPaired);
        }
        if self.session.role.is_some() && !self.session.my_turn {
            return Err(MoveRejected::NotYourTurn);
        }

        let applied = self.engine.apply_move(intent).inspect_err(|e| {
            tracing::debug!(%intent, error = %e, "move refused by engine");
        })?;

        let mut effects = Effects::default();
        if self.session.role.is_none() {
            self.session.role = Some(Role::FirstMover);
            tracing::info!(role = %Role::FirstMover, "moved first, claiming role");
            effects.send(Frame::ColorAssign(Role::FirstMover));
            effects.emit(SessionEvent::RoleAssigned(Role::FirstMover));
        }

        if self.session.role == Some(applied.side_to_move) {
            tracing::warn!(side = %applied.side_to_move, "engine kept the move on our side");
        }
        self.session.position = applied.snapshot.clone();
        self.session.my_turn = false;
        effects.send(Frame::Position(applied.snapshot.clone()));
        effects.emit(SessionEvent::PositionUpdated(applied.snapshot));
        tracing::debug!(%intent, "move played");

        self.detect_terminal(&mut effects);
        Ok(effects)
    }

    /// Asks the peer for a fresh game.
    ///
    /// Sends `PAIR` and drops the paired flag; the session resets when the
    /// peer's `PAIR` comes back.
    ///
    /// Does nothing unless a game is in progress. A finished game already
    /// sent its `PAIR`, an unpaired session is waiting for one, and a
    /// fresh pairing has nothing to restart.
    pub fn request_rematch(&mut self) -> Effects {
        let mut effects = Effects::default();
        if !self.game_in_progress() {
            tracing::debug!(phase = ?self.phase(), "rematch ignored, no game in progress");
            return effects;
        }

        self.session.paired = false;
        self.session.my_turn = false;
        tracing::info!("rematch requested");
        effects.send(Frame::Pair);
        effects
    }

    /// Concedes the game in progress.
    ///
    /// The wire has no resignation frame, so this records a loss locally
    /// and asks for a rematch. The peer just sees a re-pairing. Does
    /// nothing when there is no game to resign.
    pub fn resign(&mut self) -> Effects {
        let mut effects = Effects::default();
        if !self.session.paired || self.session.outcome.is_some() {
            tracing::debug!(phase = ?self.phase(), "nothing to resign");
            return effects;
        }

        self.finish(
            Outcome::new(GameResult::Lost, OutcomeReason::Resignation),
            &mut effects,
        );
        effects
    }

    /// Records that the link to the relay went away.
    ///
    /// A game in progress becomes *abandoned*: not won, not lost, not drawn.
    /// Either way the session is unpaired until a fresh `PAIR`.
    pub fn connection_lost(&mut self) -> Effects {
        let mut effects = Effects::default();
        if self.game_in_progress() {
            self.session.abandoned = true;
            tracing::warn!("connection lost mid-game, game abandoned");
            effects.emit(SessionEvent::Abandoned);
        }
        self.session.paired = false;
        self.session.my_turn = false;
        effects
    }

    /// Records that the link is back. Nothing resumes: the coordinator
    /// waits for the relay's `PAIR`.
    pub fn connection_restored(&mut self) -> Effects {
        tracing::debug!(phase = ?self.phase(), "connection restored, waiting for pair");
        Effects::default()
    }

    /// Settles an abandoned game with `result`, using the consumer's own
    /// policy (forfeit, draw, ...). Does nothing unless the session is
    /// abandoned.
    pub fn resolve_abandoned(&mut self, result: GameResult) -> Effects {
        let mut effects = Effects::default();
        if !self.session.abandoned {
            tracing::debug!("no abandoned game to resolve");
            return effects;
        }

        let outcome = Outcome::new(result, OutcomeReason::Disconnect);
        self.session.abandoned = false;
        self.session.outcome = Some(outcome);
        tracing::info!(?outcome, "abandoned game resolved");
        effects.emit(SessionEvent::GameOver(outcome));
        effects
    }

    // -----------------------------------------------------------------------
    // Outcome detection
    // -----------------------------------------------------------------------

    /// Paired, roles decided, and no outcome yet.
    fn game_in_progress(&self) -> bool {
        self.session.paired
            && self.session.role.is_some()
            && self.session.outcome.is_none()
    }

    fn detect_terminal(&mut self, effects: &mut Effects) {
        let Some(terminal) = self.engine.terminal() else {
            return;
        };

        let outcome = match terminal {
            Terminal::Checkmate => {
                let mated = self.engine.side_to_move();
                let result = if self.session.role == Some(mated) {
                    GameResult::Lost
                } else {
                    GameResult::Won
                };
                Outcome::new(result, OutcomeReason::Checkmate)
            }
            Terminal::Draw(rule) => {
                Outcome::new(GameResult::Drawn, OutcomeReason::DrawByRule(rule))
            }
        };
        self.finish(outcome, effects);
    }

    fn finish(&mut self, outcome: Outcome, effects: &mut Effects) {
        self.session.outcome = Some(outcome);
        self.session.paired = false;
        self.session.my_turn = false;
        tracing::info!(?outcome, "game over");

        effects.send(Frame::Pair);
        effects.emit(SessionEvent::GameOver(outcome));
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SCHOLARS_MATE, ScriptedEngine};
    use crate::{DrawRule, RulesError};

    fn mv(text: &str) -> MoveIntent {
        text.parse().unwrap()
    }

    fn snap(text: &str) -> Snapshot {
        Snapshot::new(text).unwrap()
    }

    fn paired() -> Coordinator<ScriptedEngine> {
        let mut c = Coordinator::new(ScriptedEngine::new());
        let _ = c.handle_frame(Frame::Pair);
        c
    }

    // =====================================================================
    // PAIR
    // =====================================================================

    #[test]
    fn test_new_starts_unpaired_at_initial_position() {
        let c = Coordinator::new(ScriptedEngine::new());
        assert_eq!(c.phase(), Phase::Unpaired);
        assert_eq!(c.session().position().as_str(), "start");
    }

    #[test]
    fn test_pair_on_fresh_session_pairs_without_reply() {
        let mut c = Coordinator::new(ScriptedEngine::new());
        let effects = c.handle_frame(Frame::Pair);

        assert!(effects.outbound.is_empty());
        assert_eq!(effects.events, vec![SessionEvent::Paired]);
        assert_eq!(c.phase(), Phase::WaitingForOpponent);
        assert_eq!(c.session().role(), None);
    }

    #[test]
    fn test_pair_mid_game_resets_and_acknowledges() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();

        let effects = c.handle_frame(Frame::Pair);

        assert_eq!(effects.outbound, vec![Frame::Pair]);
        assert_eq!(c.phase(), Phase::WaitingForOpponent);
        assert_eq!(c.session().role(), None);
        assert_eq!(c.session().position().as_str(), "start");
    }

    #[test]
    fn test_pair_on_fresh_pairing_resets_without_reply() {
        let mut c = paired();

        let effects = c.handle_frame(Frame::Pair);

        assert!(effects.outbound.is_empty());
        assert_eq!(effects.events, vec![SessionEvent::Paired]);
        assert_eq!(c.phase(), Phase::WaitingForOpponent);
    }

    #[test]
    fn test_pair_after_game_over_clears_outcome_without_reply() {
        let mut c = paired();
        let _ = c.resign();
        assert_eq!(c.phase(), Phase::GameOver);

        let effects = c.handle_frame(Frame::Pair);

        assert!(effects.outbound.is_empty());
        assert_eq!(c.session().outcome(), None);
        assert_eq!(c.phase(), Phase::WaitingForOpponent);
    }

    // =====================================================================
    // COLOR_ASSIGN
    // =====================================================================

    #[test]
    fn test_color_assign_takes_opposite_role() {
        let mut c = paired();
        let effects = c.handle_frame(Frame::ColorAssign(Role::FirstMover));

        assert_eq!(c.session().role(), Some(Role::SecondMover));
        assert!(!c.session().is_my_turn());
        assert_eq!(c.phase(), Phase::AwaitingPeerMove);
        assert_eq!(
            effects.events,
            vec![SessionEvent::RoleAssigned(Role::SecondMover)]
        );
    }

    #[test]
    fn test_color_assign_is_idempotent() {
        let mut c = paired();
        let _ = c.handle_frame(Frame::ColorAssign(Role::FirstMover));
        let before = c.session().clone();

        for claimed in [Role::FirstMover, Role::SecondMover, Role::FirstMover] {
            let effects = c.handle_frame(Frame::ColorAssign(claimed));
            assert!(effects.is_empty());
            assert_eq!(c.session(), &before);
        }
    }

    #[test]
    fn test_color_assign_conflicting_claim_keeps_our_role() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();

        // The peer also moved first and claimed first-mover.
        let effects = c.handle_frame(Frame::ColorAssign(Role::FirstMover));

        assert!(effects.is_empty());
        assert_eq!(c.session().role(), Some(Role::FirstMover));
    }

    #[test]
    fn test_color_assign_while_unpaired_is_ignored() {
        let mut c = Coordinator::new(ScriptedEngine::new());
        let effects = c.handle_frame(Frame::ColorAssign(Role::FirstMover));
        assert!(effects.is_empty());
        assert_eq!(c.session().role(), None);
    }

    // =====================================================================
    // POSITION
    // =====================================================================

    #[test]
    fn test_position_overwrites_and_gives_us_the_turn() {
        let mut c = paired();
        let _ = c.handle_frame(Frame::ColorAssign(Role::FirstMover));

        let effects = c.handle_frame(Frame::Position(snap("start e2e4")));

        assert_eq!(c.session().position().as_str(), "start e2e4");
        assert!(c.session().is_my_turn());
        assert_eq!(c.phase(), Phase::AwaitingMyMove);
        assert_eq!(
            effects.events,
            vec![SessionEvent::PositionUpdated(snap("start e2e4"))]
        );
        assert!(effects.outbound.is_empty());
    }

    #[test]
    fn test_position_without_role_infers_side_to_move() {
        let mut c = paired();
        // COLOR_ASSIGN was lost; the snapshot alone arrives.
        let effects = c.handle_frame(Frame::Position(snap("start e2e4")));

        assert_eq!(c.session().role(), Some(Role::SecondMover));
        assert_eq!(
            effects.events,
            vec![
                SessionEvent::RoleAssigned(Role::SecondMover),
                SessionEvent::PositionUpdated(snap("start e2e4")),
            ]
        );
    }

    #[test]
    fn test_position_malformed_is_ignored() {
        let mut c = paired();
        let _ = c.handle_frame(Frame::ColorAssign(Role::FirstMover));
        let before = c.session().clone();

        let effects = c.handle_frame(Frame::Position(snap("not a position")));

        assert!(effects.is_empty());
        assert_eq!(c.session(), &before);
    }

    #[test]
    fn test_position_while_unpaired_is_ignored() {
        let mut c = Coordinator::new(ScriptedEngine::new());
        let effects = c.handle_frame(Frame::Position(snap("start e2e4")));
        assert!(effects.is_empty());
        assert_eq!(c.session().position().as_str(), "start");
    }

    // =====================================================================
    // attempt_move
    // =====================================================================

    #[test]
    fn test_attempt_move_first_move_claims_first_mover_before_position() {
        let mut c = paired();
        let effects = c.attempt_move(&mv("e2e4")).unwrap();

        assert_eq!(
            effects.outbound,
            vec![
                Frame::ColorAssign(Role::FirstMover),
                Frame::Position(snap("start e2e4")),
            ]
        );
        assert_eq!(c.session().role(), Some(Role::FirstMover));
        assert_eq!(c.phase(), Phase::AwaitingPeerMove);
    }

    #[test]
    fn test_attempt_move_later_move_sends_only_position() {
        let mut c = paired();
        let _ = c.handle_frame(Frame::ColorAssign(Role::FirstMover));
        let _ = c.handle_frame(Frame::Position(snap("start e2e4")));

        let effects = c.attempt_move(&mv("e7e5")).unwrap();

        assert_eq!(
            effects.outbound,
            vec![Frame::Position(snap("start e2e4 e7e5"))]
        );
    }

    #[test]
    fn test_attempt_move_out_of_turn_returns_not_your_turn() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();

        for text in ["d2d4", "e7e5", "a1a1", "h8g6"] {
            assert_eq!(
                c.attempt_move(&mv(text)),
                Err(MoveRejected::NotYourTurn)
            );
        }
        assert_eq!(c.engine().plies(), 1);
    }

    #[test]
    fn test_attempt_move_illegal_changes_nothing() {
        let mut c = paired();
        let before = c.session().clone();

        let result = c.attempt_move(&mv("e2e2"));

        assert!(matches!(
            result,
            Err(MoveRejected::Illegal(RulesError::IllegalMove(_)))
        ));
        assert_eq!(c.session(), &before);
        assert_eq!(c.session().role(), None);
    }

    #[test]
    fn test_attempt_move_unpaired_returns_not_paired() {
        let mut c = Coordinator::new(ScriptedEngine::new());
        assert_eq!(c.attempt_move(&mv("e2e4")), Err(MoveRejected::NotPaired));
    }

    #[test]
    fn test_attempt_move_after_outcome_returns_game_over() {
        let mut c = paired();
        let _ = c.resign();
        assert_eq!(c.attempt_move(&mv("e2e4")), Err(MoveRejected::GameOver));
    }

    // =====================================================================
    // Outcomes
    // =====================================================================

    #[test]
    fn test_checkmate_by_local_move_is_won_and_sends_pair() {
        let mut c = Coordinator::new(ScriptedEngine::scholars_mate());
        let _ = c.handle_frame(Frame::Pair);

        // Even plies are ours, odd plies arrive from the peer.
        let mut line = String::from("start");
        let mut last = Effects::default();
        for (ply, m) in SCHOLARS_MATE.iter().enumerate() {
            line.push(' ');
            line.push_str(m);
            if ply % 2 == 0 {
                last = c.attempt_move(&mv(m)).unwrap();
            } else {
                let _ = c.handle_frame(Frame::Position(snap(&line)));
            }
        }

        let won = Outcome::new(GameResult::Won, OutcomeReason::Checkmate);
        assert_eq!(c.session().outcome(), Some(won));
        assert_eq!(
            last.outbound,
            vec![Frame::Position(snap(&line)), Frame::Pair]
        );
        assert_eq!(last.events.last(), Some(&SessionEvent::GameOver(won)));
        assert_eq!(c.phase(), Phase::GameOver);
        assert!(!c.session().is_paired());
    }

    #[test]
    fn test_checkmate_received_is_lost() {
        let mut c = Coordinator::new(ScriptedEngine::scholars_mate());
        let _ = c.handle_frame(Frame::Pair);
        let _ = c.handle_frame(Frame::ColorAssign(Role::FirstMover));

        let line = format!("start {}", SCHOLARS_MATE.join(" "));
        let effects = c.handle_frame(Frame::Position(snap(&line)));

        let lost = Outcome::new(GameResult::Lost, OutcomeReason::Checkmate);
        assert_eq!(c.session().outcome(), Some(lost));
        assert_eq!(effects.outbound, vec![Frame::Pair]);
        assert_eq!(
            effects.events.last(),
            Some(&SessionEvent::GameOver(lost))
        );
    }

    #[test]
    fn test_draw_rule_is_drawn() {
        let engine = ScriptedEngine::new()
            .with_terminal("e2e4", Terminal::Draw(DrawRule::Stalemate));
        let mut c = Coordinator::new(engine);
        let _ = c.handle_frame(Frame::Pair);

        let effects = c.attempt_move(&mv("e2e4")).unwrap();

        assert_eq!(
            c.session().outcome(),
            Some(Outcome::new(
                GameResult::Drawn,
                OutcomeReason::DrawByRule(DrawRule::Stalemate)
            ))
        );
        assert_eq!(
            effects.outbound,
            vec![
                Frame::ColorAssign(Role::FirstMover),
                Frame::Position(snap("start e2e4")),
                Frame::Pair,
            ]
        );
    }

    #[test]
    fn test_resign_records_loss_and_requests_rematch() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();

        let effects = c.resign();

        let outcome = Outcome::new(GameResult::Lost, OutcomeReason::Resignation);
        assert_eq!(c.session().outcome(), Some(outcome));
        assert_eq!(effects.outbound, vec![Frame::Pair]);
        assert_eq!(effects.events, vec![SessionEvent::GameOver(outcome)]);
    }

    #[test]
    fn test_resign_when_unpaired_does_nothing() {
        let mut c = Coordinator::new(ScriptedEngine::new());
        assert!(c.resign().is_empty());
    }

    #[test]
    fn test_request_rematch_unpairs_and_sends_pair() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();

        let effects = c.request_rematch();

        assert_eq!(effects.outbound, vec![Frame::Pair]);
        assert_eq!(c.phase(), Phase::Unpaired);
        assert_eq!(c.attempt_move(&mv("d2d4")), Err(MoveRejected::NotPaired));
    }

    #[test]
    fn test_request_rematch_after_game_over_does_nothing() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();
        let _ = c.resign();
        let before = c.session().clone();

        assert!(c.request_rematch().is_empty());
        assert_eq!(c.session(), &before);
    }

    #[test]
    fn test_request_rematch_twice_sends_one_pair() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();

        assert_eq!(c.request_rematch().outbound, vec![Frame::Pair]);
        assert!(c.request_rematch().is_empty());
    }

    #[test]
    fn test_request_rematch_on_fresh_pairing_does_nothing() {
        let mut c = paired();
        assert!(c.request_rematch().is_empty());
        assert_eq!(c.phase(), Phase::WaitingForOpponent);
    }

    // =====================================================================
    // Connection changes
    // =====================================================================

    #[test]
    fn test_connection_lost_mid_game_abandons() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();

        let effects = c.connection_lost();

        assert_eq!(effects.events, vec![SessionEvent::Abandoned]);
        assert!(c.session().is_abandoned());
        assert_eq!(c.session().outcome(), None);
        assert_eq!(c.phase(), Phase::Unpaired);
    }

    #[test]
    fn test_connection_lost_before_any_move_is_not_abandoned() {
        let mut c = paired();
        let effects = c.connection_lost();
        assert!(effects.is_empty());
        assert!(!c.session().is_abandoned());
        assert_eq!(c.phase(), Phase::Unpaired);
    }

    #[test]
    fn test_connection_restored_changes_nothing() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();
        let _ = c.connection_lost();
        let before = c.session().clone();

        assert!(c.connection_restored().is_empty());
        assert_eq!(c.session(), &before);
        assert_eq!(c.attempt_move(&mv("d2d4")), Err(MoveRejected::NotPaired));
    }

    #[test]
    fn test_resolve_abandoned_records_disconnect_outcome() {
        let mut c = paired();
        let _ = c.attempt_move(&mv("e2e4")).unwrap();
        let _ = c.connection_lost();

        let effects = c.resolve_abandoned(GameResult::Won);

        let outcome = Outcome::new(GameResult::Won, OutcomeReason::Disconnect);
        assert_eq!(effects.events, vec![SessionEvent::GameOver(outcome)]);
        assert_eq!(c.phase(), Phase::GameOver);
        assert!(!c.session().is_abandoned());
    }

    #[test]
    fn test_resolve_abandoned_without_abandoned_game_does_nothing() {
        let mut c = paired();
        assert!(c.resolve_abandoned(GameResult::Drawn).is_empty());
        assert_eq!(c.session().outcome(), None);
    }
}
