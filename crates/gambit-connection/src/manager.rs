//! The connection manager: one link to the relay, kept alive within limits.
//!
//! This is the central piece of the connection layer. It's responsible for:
//! - Dialing the relay when asked to connect
//! - Reporting every lifecycle change as an ordered [`ConnectionEvent`]
//! - Forwarding outbound frames while (and only while) the link is open
//! - Reconnecting after an unsolicited close, up to a bounded number of
//!   attempts
//! - Tearing everything down on request, with no reconnect afterward
//!
//! # Concurrency note
//!
//! The handle ([`ConnectionManager`]) and the link are owned by different
//! tasks. The handle talks to a spawned *supervisor* over an unbounded
//! command channel; the supervisor reports back over a bounded event
//! channel and a `watch` channel for the status. The handle never touches
//! the socket, so `send` is synchronous and never blocks.
//!
//! ```text
//!  ConnectionManager ──(Command)──→ supervisor task ──→ Connection
//!         ↑                               │
//!         └────(watch: status)────────────┤
//!  owner ←──────(ConnectionEvent)─────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use gambit_transport::{Connection, Connector};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::{
    ConnectionError, ConnectionEvent, ConnectionStatus, Reconnect,
    ReconnectPolicy,
};

/// How long [`ConnectionManager::teardown`] waits for the supervisor
/// before aborting it.
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Reason reported in the final `Closed` event after a teardown.
const TORN_DOWN: &str = "torn down";

/// Messages from the handle to the supervisor task.
#[derive(Debug)]
enum Command {
    Send(String),
    Teardown,
}

/// The running half of one connection lifecycle.
struct Supervisor {
    commands: mpsc::UnboundedSender<Command>,
    torn_down: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// Owns one logical connection to a relay.
///
/// ## Lifecycle
///
/// ```text
/// connect() ──→ [Connecting] ──→ [Open] ──(close/error)──→ wait ──→ [Connecting] ──→ …
///                    │              │                       │
///                    ▼              ▼                       ▼
///               teardown()     teardown()          attempts exhausted
///                    │              │                       │
///                    ▼              ▼                       ▼
///                [Closed]       [Closed]            [Closed] + GaveUp
/// ```
///
/// A fresh lifecycle may be started with [`connect`](Self::connect) after a
/// teardown or after the manager gave up. While one is running, `connect`
/// is a no-op.
///
/// Dropping the manager aborts the supervisor without emitting anything.
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    events: mpsc::Sender<ConnectionEvent>,
    status: Arc<watch::Sender<ConnectionStatus>>,
    attempts: Arc<AtomicU32>,
    supervisor: Option<Supervisor>,
    shutdown_timeout: Duration,
}

impl<C: Connector> ConnectionManager<C> {
    /// Creates an idle manager and the receiver for its events.
    ///
    /// `capacity` bounds the event channel. A slow owner applies
    /// backpressure to the supervisor (inbound frames wait in the socket)
    /// rather than growing memory without limit.
    pub fn new(
        connector: C,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<ConnectionEvent>) {
        let (events, events_rx) = mpsc::channel(capacity.max(1));
        let (status, _) = watch::channel(ConnectionStatus::Closed);

        let manager = Self {
            connector: Arc::new(connector),
            events,
            status: Arc::new(status),
            attempts: Arc::new(AtomicU32::new(0)),
            supervisor: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        };
        (manager, events_rx)
    }

    /// Overrides how long `teardown` waits before aborting the supervisor.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Starts a connection lifecycle toward `address`.
    ///
    /// Returns `false` (and does nothing) if a lifecycle is already
    /// running. Must be called from within a Tokio runtime.
    pub fn connect(
        &mut self,
        address: impl Into<String>,
        protocols: Vec<String>,
        policy: ReconnectPolicy,
    ) -> bool {
        if self.is_running() {
            tracing::debug!("connect ignored, a connection is already live");
            return false;
        }

        let address = address.into();
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let torn_down = Arc::new(AtomicBool::new(false));

        self.attempts.store(0, Ordering::SeqCst);
        self.status.send_replace(ConnectionStatus::Connecting);
        tracing::info!(%address, "connecting");

        let supervision = Supervision {
            connector: Arc::clone(&self.connector),
            address,
            protocols,
            policy,
            events: self.events.clone(),
            status: Arc::clone(&self.status),
            attempts: Arc::clone(&self.attempts),
            commands: commands_rx,
            torn_down: Arc::clone(&torn_down),
        };
        let task = tokio::spawn(supervision.run());

        self.supervisor = Some(Supervisor {
            commands,
            torn_down,
            task,
        });
        true
    }

    /// Queues one text frame for the open link.
    ///
    /// # Errors
    /// Returns [`ConnectionError::NotOpen`] when the link isn't open. The
    /// frame is dropped, not buffered for a later reconnect.
    pub fn send(&self, frame: &str) -> Result<(), ConnectionError> {
        let status = self.status();
        if status != ConnectionStatus::Open {
            tracing::warn!(%status, "send while not open, frame dropped");
            return Err(ConnectionError::NotOpen(status));
        }

        match &self.supervisor {
            Some(supervisor) => supervisor
                .commands
                .send(Command::Send(frame.to_owned()))
                .map_err(|_| ConnectionError::NotOpen(ConnectionStatus::Closed)),
            None => Err(ConnectionError::NotOpen(ConnectionStatus::Closed)),
        }
    }

    /// Closes the link and cancels any pending reconnect.
    ///
    /// Waits up to the shutdown timeout for the supervisor to finish, then
    /// aborts it. Safe to call when nothing is running.
    pub async fn teardown(&mut self) {
        let Some(mut supervisor) = self.supervisor.take() else {
            return;
        };

        supervisor.torn_down.store(true, Ordering::Release);
        if !supervisor.task.is_finished() {
            self.status.send_replace(ConnectionStatus::Closing);
        }
        // The task may already be gone (e.g. after giving up).
        let _ = supervisor.commands.send(Command::Teardown);

        match tokio::time::timeout(self.shutdown_timeout, &mut supervisor.task)
            .await
        {
            Ok(_) => tracing::debug!("supervisor stopped"),
            Err(_) => {
                tracing::warn!("supervisor did not stop in time, aborting");
                supervisor.task.abort();
            }
        }
        self.status.send_replace(ConnectionStatus::Closed);
    }

    /// The current status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// A receiver that observes every status change.
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Reconnects tried since the link was last open.
    pub fn reconnect_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn is_running(&self) -> bool {
        self.supervisor
            .as_ref()
            .is_some_and(|supervisor| !supervisor.task.is_finished())
    }
}

impl<C: Connector> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        if let Some(supervisor) = self.supervisor.take() {
            supervisor.torn_down.store(true, Ordering::Release);
            supervisor.task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Supervisor task
// ---------------------------------------------------------------------------

/// How a live link ended.
enum Exit {
    TornDown,
    Closed(String),
    Failed(String),
}

/// State owned by the supervisor task for one lifecycle.
struct Supervision<C: Connector> {
    connector: Arc<C>,
    address: String,
    protocols: Vec<String>,
    policy: ReconnectPolicy,
    events: mpsc::Sender<ConnectionEvent>,
    status: Arc<watch::Sender<ConnectionStatus>>,
    attempts: Arc<AtomicU32>,
    commands: mpsc::UnboundedReceiver<Command>,
    torn_down: Arc<AtomicBool>,
}

impl<C: Connector> Supervision<C> {
    /// Dial, pump, back off, repeat, until torn down or out of attempts.
    async fn run(mut self) {
        loop {
            // A teardown can land while the backoff timer fires.
            if self.torn_down.load(Ordering::Acquire) {
                self.finish_teardown();
                return;
            }
            self.set_status(ConnectionStatus::Connecting);

            let dialed = tokio::select! {
                result = self.connector.connect(&self.address, &self.protocols) => Some(result),
                () = until_teardown(&mut self.commands) => None,
            };

            let exit = match dialed {
                None => Exit::TornDown,
                Some(Err(e)) => Exit::Failed(format!("dial failed: {e}")),
                Some(Ok(connection)) => {
                    self.attempts.store(0, Ordering::SeqCst);
                    self.set_status(ConnectionStatus::Open);
                    tracing::info!(
                        address = %self.address,
                        id = %connection.id(),
                        "connection open"
                    );
                    self.emit(ConnectionEvent::Opened).await;

                    let exit = self.pump(&connection).await;
                    self.discard_queued();
                    exit
                }
            };

            let reason = match exit {
                Exit::TornDown => {
                    self.finish_teardown();
                    return;
                }
                Exit::Closed(reason) => {
                    tracing::info!(%reason, "connection closed");
                    self.set_status(ConnectionStatus::Closed);
                    reason
                }
                Exit::Failed(reason) => {
                    tracing::warn!(%reason, "connection error");
                    self.set_status(ConnectionStatus::Errored);
                    self.emit(ConnectionEvent::Errored(reason.clone())).await;
                    reason
                }
            };

            if !self.back_off(reason).await {
                return;
            }
        }
    }

    /// Moves frames both ways until the link ends.
    async fn pump(&mut self, connection: &C::Connection) -> Exit {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Send(frame)) => {
                        if let Err(e) = connection.send(&frame).await {
                            return Exit::Failed(format!("send failed: {e}"));
                        }
                    }
                    Some(Command::Teardown) | None => {
                        self.set_status(ConnectionStatus::Closing);
                        if let Err(e) = connection.close().await {
                            tracing::debug!(error = %e, "close during teardown failed");
                        }
                        return Exit::TornDown;
                    }
                },
                received = connection.recv() => match received {
                    Ok(Some(text)) => self.emit(ConnectionEvent::Message(text)).await,
                    Ok(None) => return Exit::Closed("closed by peer".into()),
                    Err(e) => return Exit::Failed(format!("receive failed: {e}")),
                },
            }
        }
    }

    /// Decides whether to reconnect after an unsolicited close, and waits
    /// out the delay if so. Returns `false` when the lifecycle is over.
    async fn back_off(&mut self, reason: String) -> bool {
        if self.torn_down.load(Ordering::Acquire) {
            self.finish_teardown();
            return false;
        }

        let attempt = self.attempts.load(Ordering::SeqCst) + 1;
        if attempt > self.policy.max_attempts {
            let attempts = attempt - 1;
            self.set_status(ConnectionStatus::Closed);
            self.emit(ConnectionEvent::Closed {
                reason,
                reconnect: None,
            })
            .await;
            tracing::warn!(attempts, "reconnect attempts exhausted, giving up");
            self.emit(ConnectionEvent::GaveUp { attempts }).await;
            return false;
        }

        self.attempts.store(attempt, Ordering::SeqCst);
        let delay = self.policy.delay_for(attempt);
        self.set_status(ConnectionStatus::Connecting);
        self.emit(ConnectionEvent::Closed {
            reason,
            reconnect: Some(Reconnect { attempt, delay }),
        })
        .await;
        tracing::info!(
            attempt,
            max_attempts = self.policy.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "reconnect scheduled"
        );

        tokio::select! {
            () = tokio::time::sleep(delay) => true,
            () = until_teardown(&mut self.commands) => {
                self.finish_teardown();
                false
            }
        }
    }

    /// Reports the final close of a torn-down lifecycle.
    fn finish_teardown(&self) {
        self.set_status(ConnectionStatus::Closed);
        // The owner may be the one awaiting teardown, so this must not
        // wait for channel space.
        let _ = self.events.try_send(ConnectionEvent::Closed {
            reason: TORN_DOWN.into(),
            reconnect: None,
        });
        tracing::info!("connection torn down");
    }

    /// Drops sends that were queued against a link that no longer exists.
    /// A teardown found in the queue is honored on the next check.
    fn discard_queued(&mut self) {
        let mut dropped = 0usize;
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::Send(_) => dropped += 1,
                Command::Teardown => {
                    self.torn_down.store(true, Ordering::Release);
                }
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "discarded frames queued for a closed link");
        }
    }

    async fn emit(&self, event: ConnectionEvent) {
        if self.torn_down.load(Ordering::Acquire) {
            let _ = self.events.try_send(event);
        } else {
            // A dropped receiver just means nobody is listening anymore.
            let _ = self.events.send(event).await;
        }
    }

    fn set_status(&self, status: ConnectionStatus) {
        self.status.send_replace(status);
    }
}

/// Resolves when a teardown arrives or the handle is gone. Sends that
/// show up in the meantime have no link to go to and are dropped.
async fn until_teardown(commands: &mut mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Teardown => return,
            Command::Send(_) => {
                tracing::debug!("dropping frame sent while not open");
            }
        }
    }
}
