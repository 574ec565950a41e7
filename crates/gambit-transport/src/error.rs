/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Dialing the remote endpoint failed (DNS, TCP, or the WebSocket
    /// upgrade was refused).
    #[error("connect to {address} failed: {reason}")]
    ConnectFailed { address: String, reason: String },

    /// The target address or sub-protocol list could not be turned into
    /// a valid request.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting connections failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
