//! Connection status and the events the manager reports.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the link is in its lifecycle.
///
/// ```text
/// Connecting ──→ Open ──→ Closing ──→ Closed
///     │            │                     ↑
///     └────────────┴──→ Errored ─────────┘
/// ```
///
/// During a backoff wait the status reads `Connecting` again: from the
/// caller's point of view a reconnect is under way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// A dial is in flight, or a reconnect is scheduled.
    Connecting,
    /// Frames can be sent.
    Open,
    /// A teardown is closing the link.
    Closing,
    /// No link, and none is coming unless `connect` is called again.
    #[default]
    Closed,
    /// The link reported a failure. A close always follows.
    Errored,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// A scheduled reconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconnect {
    /// 1-based number of this reconnect in the current run of failures.
    pub attempt: u32,
    /// How long the manager waits before dialing.
    pub delay: Duration,
}

/// Everything the manager tells its owner, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The link is up. The reconnect counter has been reset.
    Opened,

    /// One inbound text frame, verbatim.
    Message(String),

    /// The link or a dial failed. Always followed by [`Self::Closed`].
    Errored(String),

    /// The link is gone. `reconnect` says what happens next: `Some` when a
    /// reconnect is scheduled, `None` when the manager has stopped (either
    /// torn down or out of attempts).
    Closed {
        reason: String,
        reconnect: Option<Reconnect>,
    },

    /// The manager used up its reconnect attempts and has stopped for good.
    GaveUp { attempts: u32 },
}
