//! A scripted rules engine for tests and demos.
//!
//! [`ScriptedEngine`] knows nothing about chess pieces. A position is the
//! word `start` followed by the moves played so far:
//!
//! ```text
//! start
//! start e2e4
//! start e2e4 e7e5
//! ```
//!
//! The side to move follows ply parity, any move with distinct squares is
//! legal unless scripted otherwise, and terminal positions are scripted by
//! their exact move sequence.

use std::collections::{HashMap, HashSet};

use gambit_protocol::{Role, Snapshot};

use crate::{Applied, MoveIntent, RulesEngine, RulesError, Terminal};

const START: &str = "start";

/// The seven plies of Scholar's mate. After the last one the second-mover
/// is mated.
pub const SCHOLARS_MATE: [&str; 7] =
    ["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"];

/// A rules engine driven by a script instead of chess rules.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    moves: Vec<MoveIntent>,
    terminals: HashMap<String, Terminal>,
    illegal: HashSet<MoveIntent>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine where the [`SCHOLARS_MATE`] line ends in checkmate.
    pub fn scholars_mate() -> Self {
        Self::new().with_terminal(&SCHOLARS_MATE.join(" "), Terminal::Checkmate)
    }

    /// Declares the position reached by `line` (space-separated moves from
    /// the start) terminal.
    pub fn with_terminal(mut self, line: &str, terminal: Terminal) -> Self {
        let key = line.split_whitespace().collect::<Vec<_>>().join(" ");
        self.terminals.insert(key, terminal);
        self
    }

    /// Makes `intent` illegal everywhere.
    pub fn with_illegal(mut self, intent: MoveIntent) -> Self {
        self.illegal.insert(intent);
        self
    }

    /// Moves played so far.
    pub fn plies(&self) -> usize {
        self.moves.len()
    }

    fn line(moves: &[MoveIntent]) -> String {
        moves
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render(moves: &[MoveIntent]) -> Snapshot {
        let line = Self::line(moves);
        let text = if line.is_empty() {
            START.to_owned()
        } else {
            format!("{START} {line}")
        };
        Snapshot::new(text).expect("move notation has no line breaks")
    }

    fn parity(plies: usize) -> Role {
        if plies % 2 == 0 {
            Role::FirstMover
        } else {
            Role::SecondMover
        }
    }
}

impl RulesEngine for ScriptedEngine {
    fn initial_position(&self) -> Snapshot {
        Self::render(&[])
    }

    fn load(&mut self, snapshot: &Snapshot) -> Result<(), RulesError> {
        let invalid = || RulesError::InvalidSnapshot(snapshot.to_string());
        let mut words = snapshot.as_str().split(' ');
        if words.next() != Some(START) {
            return Err(invalid());
        }
        let moves = words
            .map(str::parse)
            .collect::<Result<Vec<MoveIntent>, _>>()
            .map_err(|_| invalid())?;
        self.moves = moves;
        Ok(())
    }

    fn apply_move(&mut self, intent: &MoveIntent) -> Result<Applied, RulesError> {
        if self.terminal().is_some() {
            return Err(RulesError::IllegalMove(format!("{intent}: game is over")));
        }
        if intent.from == intent.to || self.illegal.contains(intent) {
            return Err(RulesError::IllegalMove(intent.to_string()));
        }

        self.moves.push(*intent);
        Ok(Applied {
            snapshot: self.snapshot(),
            side_to_move: self.side_to_move(),
        })
    }

    fn snapshot(&self) -> Snapshot {
        Self::render(&self.moves)
    }

    fn side_to_move(&self) -> Role {
        Self::parity(self.moves.len())
    }

    fn terminal(&self) -> Option<Terminal> {
        self.terminals.get(&Self::line(&self.moves)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(text: &str) -> MoveIntent {
        text.parse().unwrap()
    }

    #[test]
    fn test_apply_move_appends_and_flips_side() {
        let mut engine = ScriptedEngine::new();
        assert_eq!(engine.side_to_move(), Role::FirstMover);

        let applied = engine.apply_move(&mv("e2e4")).unwrap();
        assert_eq!(applied.snapshot.as_str(), "start e2e4");
        assert_eq!(applied.side_to_move, Role::SecondMover);
    }

    #[test]
    fn test_apply_move_same_square_is_illegal_and_changes_nothing() {
        let mut engine = ScriptedEngine::new();
        let result = engine.apply_move(&mv("e2e2"));
        assert!(matches!(result, Err(RulesError::IllegalMove(_))));
        assert_eq!(engine.plies(), 0);
    }

    #[test]
    fn test_with_illegal_rejects_scripted_move() {
        let mut engine = ScriptedEngine::new().with_illegal(mv("e2e5"));
        assert!(engine.apply_move(&mv("e2e5")).is_err());
        assert!(engine.apply_move(&mv("e2e4")).is_ok());
    }

    #[test]
    fn test_load_round_trips_snapshot() {
        let mut engine = ScriptedEngine::new();
        let snapshot = Snapshot::new("start e2e4 e7e5").unwrap();
        engine.load(&snapshot).unwrap();
        assert_eq!(engine.snapshot(), snapshot);
        assert_eq!(engine.side_to_move(), Role::FirstMover);
    }

    #[test]
    fn test_load_foreign_text_returns_invalid_snapshot() {
        let mut engine = ScriptedEngine::new();
        engine.apply_move(&mv("e2e4")).unwrap();
        let bad = Snapshot::new("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
        assert!(matches!(engine.load(&bad), Err(RulesError::InvalidSnapshot(_))));
        // Failed loads leave the position alone.
        assert_eq!(engine.plies(), 1);
    }

    #[test]
    fn test_scholars_mate_is_terminal_only_at_the_end() {
        let mut engine = ScriptedEngine::scholars_mate();
        for (i, m) in SCHOLARS_MATE.iter().enumerate() {
            assert_eq!(engine.terminal(), None, "not terminal before ply {i}");
            engine.apply_move(&mv(m)).unwrap();
        }
        assert_eq!(engine.terminal(), Some(Terminal::Checkmate));
        assert_eq!(engine.side_to_move(), Role::SecondMover);
        assert!(engine.apply_move(&mv("a7a6")).is_err());
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut engine = ScriptedEngine::new();
        engine.apply_move(&mv("e2e4")).unwrap();
        assert_eq!(engine.reset().as_str(), "start");
        assert_eq!(engine.plies(), 0);
    }
}
