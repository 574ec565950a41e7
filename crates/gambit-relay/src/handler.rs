//! Per-connection handler: pairing and verbatim forwarding.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Join the lobby: pair with the waiting connection, or become it
//!   2. Both sides of a new pair receive the pairing literal
//!   3. Loop: forward every inbound frame to the partner, deliver the
//!      partner's frames outbound
//!   4. On exit, tell the partner, whose connection is then closed

use std::sync::Arc;

use gambit_transport::{Connection, ConnectionId};
use tokio::sync::{Mutex, mpsc};

use crate::RelayError;

/// Messages delivered to a connection task from elsewhere in the relay.
#[derive(Debug)]
pub(crate) enum RelayOutbound {
    /// A partner arrived. Frames go to this sender from now on.
    Paired(PeerSender),
    /// A frame from the partner, to be written verbatim.
    Frame(String),
    /// The partner is gone.
    PeerLeft,
}

/// Channel sender for delivering [`RelayOutbound`] to a connection task.
pub(crate) type PeerSender = mpsc::UnboundedSender<RelayOutbound>;

/// The single waiting seat.
///
/// First come, first paired: whoever arrives while the seat is taken is
/// matched with its occupant; otherwise they take the seat.
#[derive(Debug, Default)]
pub(crate) struct Lobby {
    waiting: Option<(ConnectionId, PeerSender)>,
}

impl Lobby {
    /// Seats `id`, or pairs it with the waiting connection and returns the
    /// partner's sender.
    fn join(&mut self, id: ConnectionId, tx: &PeerSender) -> Option<PeerSender> {
        while let Some((waiting_id, waiting_tx)) = self.waiting.take() {
            // A waiter that already went away can't be paired; its task
            // has dropped the receiver.
            if waiting_tx.send(RelayOutbound::Paired(tx.clone())).is_ok() {
                tracing::info!(%id, peer = %waiting_id, "paired");
                return Some(waiting_tx);
            }
            tracing::debug!(peer = %waiting_id, "waiting connection gone, skipped");
        }
        self.waiting = Some((id, tx.clone()));
        tracing::info!(%id, "waiting for a partner");
        None
    }

    /// Frees the seat if `id` holds it.
    fn leave(&mut self, id: ConnectionId) {
        if self.waiting.as_ref().is_some_and(|(waiting, _)| *waiting == id) {
            self.waiting = None;
        }
    }
}

/// Shared relay state passed to each connection handler task.
pub(crate) struct RelayState {
    pub(crate) lobby: Mutex<Lobby>,
    pub(crate) pair_literal: String,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Connection>(
    conn: C,
    state: Arc<RelayState>,
) -> Result<(), RelayError>
where
    RelayError: From<C::Error>,
{
    let id = conn.id();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // --- Step 1: Lobby ---
    let mut peer = state.lobby.lock().await.join(id, &tx);
    let mut result = Ok(());
    if peer.is_some() {
        result = conn.send(&state.pair_literal).await.map_err(RelayError::from);
    }

    // --- Step 2: Forwarding loop ---
    if result.is_ok() {
        result = forward(&conn, &state, &mut peer, &mut rx).await;
    }

    // --- Step 3: Cleanup ---
    state.lobby.lock().await.leave(id);
    if let Some(peer) = peer {
        let _ = peer.send(RelayOutbound::PeerLeft);
    }
    tracing::info!(%id, "connection left");
    result
}

async fn forward<C: Connection>(
    conn: &C,
    state: &RelayState,
    peer: &mut Option<PeerSender>,
    rx: &mut mpsc::UnboundedReceiver<RelayOutbound>,
) -> Result<(), RelayError>
where
    RelayError: From<C::Error>,
{
    let id = conn.id();
    loop {
        tokio::select! {
            outbound = rx.recv() => match outbound {
                Some(RelayOutbound::Paired(partner)) => {
                    *peer = Some(partner);
                    conn.send(&state.pair_literal).await?;
                }
                Some(RelayOutbound::Frame(text)) => conn.send(&text).await?,
                Some(RelayOutbound::PeerLeft) | None => {
                    tracing::info!(%id, "partner left, closing");
                    *peer = None;
                    conn.close().await?;
                    return Ok(());
                }
            },
            received = conn.recv() => match received {
                Ok(Some(text)) => match peer.as_ref() {
                    Some(partner) => {
                        tracing::debug!(%id, len = text.len(), "forwarding frame");
                        let _ = partner.send(RelayOutbound::Frame(text));
                    }
                    None => tracing::debug!(%id, "no partner yet, frame dropped"),
                },
                Ok(None) => {
                    tracing::debug!(%id, "connection closed cleanly");
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(%id, error = %e, "recv error");
                    return Ok(());
                }
            },
        }
    }
}
