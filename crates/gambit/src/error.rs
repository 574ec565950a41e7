//! Unified error type for Gambit.

use gambit_connection::ConnectionError;
use gambit_protocol::ProtocolError;
use gambit_relay::RelayError;
use gambit_session::{MoveRejected, RulesError};
use gambit_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gambit` crate, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impls, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GambitError {
    /// A transport-level error (dial, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (bad frame, bad sentinel configuration).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A frame was offered while the link wasn't open.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The rules engine refused a snapshot or a square.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A local move was refused. Nothing was sent.
    #[error(transparent)]
    Rejected(#[from] MoveRejected),

    /// The relay failed to bind or lost a connection.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The client's driver task has stopped.
    #[error("client has shut down")]
    ClientGone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::InvalidTarget("gone".into());
        let gambit_err: GambitError = err.into();
        assert!(matches!(gambit_err, GambitError::Transport(_)));
        assert!(gambit_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let gambit_err: GambitError = ProtocolError::EmptyFrame.into();
        assert!(matches!(gambit_err, GambitError::Protocol(_)));
    }

    #[test]
    fn test_from_move_rejected_keeps_reason() {
        let gambit_err: GambitError = MoveRejected::NotYourTurn.into();
        assert!(matches!(
            gambit_err,
            GambitError::Rejected(MoveRejected::NotYourTurn)
        ));
        assert_eq!(gambit_err.to_string(), "not your turn");
    }

    #[test]
    fn test_from_rules_error() {
        let gambit_err: GambitError =
            RulesError::InvalidSquare("z9".into()).into();
        assert!(matches!(gambit_err, GambitError::Rules(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let gambit_err: GambitError = parse.into();
        assert!(matches!(gambit_err, GambitError::Config(_)));
    }
}
