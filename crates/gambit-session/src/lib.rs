//! Session coordination for Gambit.
//!
//! A session is one paired game seen from one side. The [`Coordinator`]
//! turns inbound frames, local moves and connection changes into state
//! transitions plus [`Effects`] (frames to send, events to surface).
//!
//! # Key types
//!
//! - [`Coordinator`]: the state machine
//! - [`Session`] / [`Phase`]: the state and its derived phase
//! - [`RulesEngine`]: the trait a chess (or variant) implementation provides
//! - [`MoveIntent`] / [`Square`]: what a rendering surface submits
//! - [`Outcome`]: how a finished game ended
//!
//! # Feature Flags
//!
//! - `testing`: exposes [`testing::ScriptedEngine`], a rules engine driven
//!   by a script, for downstream tests and demos

mod coordinator;
mod engine;
mod error;
mod moves;
mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use coordinator::{Coordinator, Effects, SessionEvent};
pub use engine::{Applied, DrawRule, RulesEngine, Terminal};
pub use error::{MoveRejected, RulesError};
pub use moves::{MoveIntent, Promotion, Square};
pub use state::{GameResult, Outcome, OutcomeReason, Phase, Session};
