//! `Relay` builder and accept loop.

use std::sync::Arc;

use gambit_protocol::DEFAULT_PAIR_LITERAL;
use gambit_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::RelayError;
use crate::handler::{Lobby, RelayState, handle_connection};

/// Builder for configuring and starting a relay.
///
/// # Example
///
/// ```rust,no_run
/// use gambit_relay::Relay;
///
/// # async fn run() -> Result<(), gambit_relay::RelayError> {
/// let relay = Relay::builder().bind("0.0.0.0:8080").build().await?;
/// relay.run().await
/// # }
/// ```
pub struct RelayBuilder {
    bind_addr: String,
    pair_literal: String,
}

impl RelayBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            pair_literal: DEFAULT_PAIR_LITERAL.to_string(),
        }
    }

    /// Sets the address to bind the relay to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the literal sent to both sides of a new pair.
    pub fn pair_literal(mut self, literal: &str) -> Self {
        self.pair_literal = literal.to_string();
        self
    }

    /// Binds the listener.
    pub async fn build(self) -> Result<Relay, RelayError> {
        let transport = WebSocketTransport::bind(&self.bind_addr)
            .await
            .map_err(|source| RelayError::Bind {
                address: self.bind_addr.clone(),
                source,
            })?;

        let state = Arc::new(RelayState {
            lobby: Mutex::new(Lobby::default()),
            pair_literal: self.pair_literal,
        });

        Ok(Relay { transport, state })
    }
}

impl Default for RelayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound relay.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Relay {
    transport: WebSocketTransport,
    state: Arc<RelayState>,
}

impl Relay {
    /// Creates a new builder.
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    /// Returns the local address the relay is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Every accepted connection gets its own handler task. Runs until the
    /// process is terminated; a failed accept is logged and skipped.
    pub async fn run(mut self) -> Result<(), RelayError> {
        tracing::info!("Gambit relay running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
