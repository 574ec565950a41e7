//! Error types for the connection layer.

use crate::ConnectionStatus;

/// Errors surfaced by the [`ConnectionManager`](crate::ConnectionManager)
/// handle.
///
/// Transport failures are *not* in here: those are events
/// ([`ConnectionEvent::Errored`](crate::ConnectionEvent::Errored)) that
/// drive the reconnection policy, not errors returned to a caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// A frame was offered while the connection wasn't open. The frame
    /// was dropped; it is the caller's job to re-send after reconnecting
    /// if that matters.
    #[error("connection is not open (status: {0})")]
    NotOpen(ConnectionStatus),
}
