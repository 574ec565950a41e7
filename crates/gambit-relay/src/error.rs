//! Error types for the relay.

use gambit_transport::TransportError;

/// Errors that can stop the relay or end one relayed connection.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The listener could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: TransportError,
    },

    /// A send, receive or close on a relayed connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
