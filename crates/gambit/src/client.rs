//! `GambitClient`: one connection plus one session, driven by one task.
//!
//! The client ties the layers together:
//!
//! ```text
//!   GambitClient (handle) ──ClientCommand──→ driver task ──→ Coordinator
//!            ↑                                  │   ↑
//!            └──── ClientEvent / status ────────┘   └── ConnectionManager ←→ relay
//! ```
//!
//! Every mutation of the session goes through the driver's single
//! `tokio::select!` loop, so connection events and local commands can never
//! interleave halfway through an operation.

use std::collections::VecDeque;

use gambit_connection::{ConnectionEvent, ConnectionManager};
use gambit_protocol::{Codec, LiteralCodec};
use gambit_session::{
    Coordinator, Effects, GameResult, MoveIntent, MoveRejected, RulesEngine,
};
use gambit_transport::{Connector, WebSocketConnector};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::{ClientConfig, ClientEvent, ClientStatus, GambitError};

/// Commands sent from the handle to the driver task.
///
/// The `oneshot::Sender` in `SubmitMove` is a reply channel: the caller
/// waits on it for the coordinator's verdict.
enum ClientCommand {
    SubmitMove {
        intent: MoveIntent,
        reply: oneshot::Sender<Result<(), MoveRejected>>,
    },
    Rematch,
    Resign,
    ResolveAbandoned(GameResult),
    Shutdown,
}

/// Handle to a running client.
///
/// ## Example
///
/// ```rust,no_run
/// use gambit::prelude::*;
///
/// # async fn play<E: RulesEngine>(engine: E) -> Result<(), GambitError> {
/// let (client, mut events) = GambitClient::connect(engine, ClientConfig::default())?;
///
/// while let Some(event) = events.recv().await {
///     if let ClientEvent::Status(ClientStatus::Playing { my_turn: true }) = event {
///         client.submit_move("e2e4".parse()?).await?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
///
/// Dropping the handle aborts the driver without a clean close; call
/// [`shutdown`](Self::shutdown) to close the link first.
pub struct GambitClient {
    commands: mpsc::UnboundedSender<ClientCommand>,
    status: watch::Receiver<ClientStatus>,
    task: Option<JoinHandle<()>>,
    shutdown_timeout: std::time::Duration,
}

impl GambitClient {
    /// Starts a client that dials the relay over WebSocket.
    ///
    /// # Errors
    /// [`GambitError::Protocol`] if the configured literals are invalid.
    pub fn connect<E: RulesEngine>(
        engine: E,
        config: ClientConfig,
    ) -> Result<(Self, mpsc::Receiver<ClientEvent>), GambitError> {
        Self::start(WebSocketConnector, engine, config)
    }

    /// Starts a client over any connector. Must be called from within a
    /// Tokio runtime.
    ///
    /// # Errors
    /// [`GambitError::Protocol`] if the configured literals are invalid.
    pub fn start<C: Connector, E: RulesEngine>(
        connector: C,
        engine: E,
        config: ClientConfig,
    ) -> Result<(Self, mpsc::Receiver<ClientEvent>), GambitError> {
        let codec = config.codec()?;
        let capacity = config.event_capacity.max(1);

        let (manager, connection_events) =
            ConnectionManager::new(connector, capacity);
        let manager = manager.with_shutdown_timeout(config.shutdown_timeout());
        let (events_tx, events_rx) = mpsc::channel(capacity);
        let (status_tx, status_rx) = watch::channel(ClientStatus::Connecting);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            manager,
            connection_events,
            coordinator: Coordinator::new(engine),
            codec,
            commands: commands_rx,
            events: events_tx,
            outbox: VecDeque::new(),
            outbox_limit: capacity,
            status: status_tx,
            stopped: false,
        };
        let task = tokio::spawn(driver.run(config.clone()));

        let client = Self {
            commands: commands_tx,
            status: status_rx,
            task: Some(task),
            shutdown_timeout: config.shutdown_timeout(),
        };
        Ok((client, events_rx))
    }

    /// Submits a local move and waits for the verdict.
    ///
    /// # Errors
    /// - [`GambitError::Rejected`]: the move was refused; nothing was sent
    /// - [`GambitError::ClientGone`]: the client has shut down
    pub async fn submit_move(&self, intent: MoveIntent) -> Result<(), GambitError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command(ClientCommand::SubmitMove {
            intent,
            reply: reply_tx,
        })?;
        reply_rx.await.map_err(|_| GambitError::ClientGone)??;
        Ok(())
    }

    /// Asks the peer for a fresh game.
    pub fn request_rematch(&self) -> Result<(), GambitError> {
        self.command(ClientCommand::Rematch)
    }

    /// Concedes the game in progress.
    pub fn resign(&self) -> Result<(), GambitError> {
        self.command(ClientCommand::Resign)
    }

    /// Settles an abandoned game with `result`.
    pub fn resolve_abandoned(&self, result: GameResult) -> Result<(), GambitError> {
        self.command(ClientCommand::ResolveAbandoned(result))
    }

    /// The current status.
    pub fn status(&self) -> ClientStatus {
        *self.status.borrow()
    }

    /// A receiver that observes every status change.
    pub fn subscribe_status(&self) -> watch::Receiver<ClientStatus> {
        self.status.clone()
    }

    /// Closes the link and stops the driver.
    ///
    /// Waits up to the configured shutdown timeout, then aborts.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(ClientCommand::Shutdown);
        if let Some(mut task) = self.task.take() {
            if tokio::time::timeout(self.shutdown_timeout, &mut task)
                .await
                .is_err()
            {
                tracing::warn!("client driver did not stop in time, aborting");
                task.abort();
            }
        }
    }

    fn command(&self, command: ClientCommand) -> Result<(), GambitError> {
        self.commands
            .send(command)
            .map_err(|_| GambitError::ClientGone)
    }
}

impl Drop for GambitClient {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Driver task
// ---------------------------------------------------------------------------

/// State owned by the driver task.
///
/// Events for the consumer wait in `outbox` until the bounded event
/// channel has room. The loop never blocks on that channel, so commands
/// are served even while the consumer isn't draining events. A full
/// outbox pauses intake from the link instead.
struct Driver<C: Connector, E: RulesEngine> {
    manager: ConnectionManager<C>,
    connection_events: mpsc::Receiver<ConnectionEvent>,
    coordinator: Coordinator<E>,
    codec: LiteralCodec,
    commands: mpsc::UnboundedReceiver<ClientCommand>,
    events: mpsc::Sender<ClientEvent>,
    outbox: VecDeque<ClientEvent>,
    outbox_limit: usize,
    status: watch::Sender<ClientStatus>,
    /// Set once the manager gave up or the client shut down.
    stopped: bool,
}

impl<C: Connector, E: RulesEngine> Driver<C, E> {
    async fn run(mut self, config: ClientConfig) {
        self.manager
            .connect(config.address, config.protocols, config.reconnect);

        let events = self.events.clone();
        loop {
            tokio::select! {
                event = self.connection_events.recv(),
                    if self.outbox.len() < self.outbox_limit => match event {
                    Some(event) => self.on_connection_event(event),
                    None => break,
                },
                command = self.commands.recv() => match command {
                    Some(ClientCommand::Shutdown) | None => break,
                    Some(command) => self.on_command(command),
                },
                permit = events.reserve(), if !self.outbox.is_empty() => match permit {
                    Ok(permit) => {
                        if let Some(event) = self.outbox.pop_front() {
                            permit.send(event);
                        }
                    }
                    Err(_) => {
                        tracing::debug!(dropped = self.outbox.len(), "event receiver gone");
                        self.outbox.clear();
                    }
                },
            }
            self.publish_status();
        }

        tracing::info!("client shutting down");
        self.manager.teardown().await;
        self.stopped = true;
        // Nobody may be draining events anymore; only the watch is updated.
        let status = self.derive_status();
        self.status.send_replace(status);
    }

    fn on_connection_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => {
                let effects = self.coordinator.connection_restored();
                self.apply(effects);
            }
            ConnectionEvent::Message(text) => match self.codec.decode(&text) {
                Ok(frame) => {
                    let effects = self.coordinator.handle_frame(frame);
                    self.apply(effects);
                }
                Err(e) => tracing::warn!(error = %e, "undecodable frame, ignored"),
            },
            ConnectionEvent::Errored(reason) => {
                tracing::debug!(%reason, "link error");
            }
            ConnectionEvent::Closed { reason, reconnect } => {
                tracing::info!(%reason, reconnecting = reconnect.is_some(), "link closed");
                let effects = self.coordinator.connection_lost();
                self.apply(effects);
            }
            ConnectionEvent::GaveUp { attempts } => {
                tracing::warn!(attempts, "relay unreachable, giving up");
                self.stopped = true;
            }
        }
    }

    fn on_command(&mut self, command: ClientCommand) {
        match command {
            ClientCommand::SubmitMove { intent, reply } => {
                match self.coordinator.attempt_move(&intent) {
                    Ok(effects) => {
                        self.apply(effects);
                        let _ = reply.send(Ok(()));
                    }
                    Err(rejected) => {
                        tracing::debug!(%intent, %rejected, "move rejected");
                        let _ = reply.send(Err(rejected));
                    }
                }
            }
            ClientCommand::Rematch => {
                let effects = self.coordinator.request_rematch();
                self.apply(effects);
            }
            ClientCommand::Resign => {
                let effects = self.coordinator.resign();
                self.apply(effects);
            }
            ClientCommand::ResolveAbandoned(result) => {
                let effects = self.coordinator.resolve_abandoned(result);
                self.apply(effects);
            }
            // Handled by the loop.
            ClientCommand::Shutdown => {}
        }
    }

    fn apply(&mut self, effects: Effects) {
        for frame in &effects.outbound {
            let text = self.codec.encode(frame);
            if let Err(e) = self.manager.send(&text) {
                tracing::warn!(kind = frame.kind(), error = %e, "frame dropped");
            }
        }
        self.outbox
            .extend(effects.events.into_iter().map(ClientEvent::Session));
    }

    fn derive_status(&self) -> ClientStatus {
        ClientStatus::derive(
            self.manager.status(),
            self.coordinator.session(),
            self.stopped,
        )
    }

    fn publish_status(&mut self) {
        let status = self.derive_status();
        let changed = self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
        if changed {
            tracing::debug!(?status, "status changed");
            self.outbox.push_back(ClientEvent::Status(status));
        }
    }
}
