//! # Gambit
//!
//! Two-player chess pairing and session sync over a stateless relay.
//!
//! Two clients dial the same relay. The relay pairs them and forwards
//! every frame verbatim; everything else (who moves first, whose turn it
//! is, when the game ends) is agreed between the two clients. The rules
//! of chess come from a [`RulesEngine`](gambit_session::RulesEngine) the
//! consumer provides.
//!
//! ```text
//!   GambitClient ──→ ConnectionManager ──→ relay ←── ConnectionManager ←── GambitClient
//!        │                                                                      │
//!   Coordinator                                                            Coordinator
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gambit::prelude::*;
//!
//! # async fn demo<E: RulesEngine>(engine: E) -> Result<(), GambitError> {
//! // The relay (usually its own process, see the `gambit-relay` binary):
//! let relay = Relay::builder().bind("127.0.0.1:8080").build().await?;
//! tokio::spawn(relay.run());
//!
//! // A client:
//! let (client, mut events) = GambitClient::connect(engine, ClientConfig::default())?;
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `testing`: re-exports the scripted rules engine from `gambit-session`

mod client;
mod config;
mod error;
mod status;

pub use client::GambitClient;
pub use config::ClientConfig;
pub use error::GambitError;
pub use status::{ClientEvent, ClientStatus};

/// Sub-crates, for types the prelude leaves out.
pub use gambit_connection as connection;
pub use gambit_protocol as protocol;
pub use gambit_relay as relay;
pub use gambit_session as session;
pub use gambit_transport as transport;

/// Everything a typical consumer needs, in one import.
pub mod prelude {
    pub use crate::{ClientConfig, ClientEvent, ClientStatus, GambitClient, GambitError};
    pub use gambit_connection::{Backoff, ReconnectPolicy};
    pub use gambit_protocol::{Role, Snapshot};
    pub use gambit_relay::{Relay, RelayBuilder};
    pub use gambit_session::{
        Applied, DrawRule, GameResult, MoveIntent, MoveRejected, Outcome, OutcomeReason,
        Promotion, RulesEngine, RulesError, SessionEvent, Square, Terminal,
    };
    pub use gambit_transport::{Connector, WebSocketConnector};
}
