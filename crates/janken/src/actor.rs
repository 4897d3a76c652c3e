//! Lobby actor: the single Tokio task that owns the coordinator.
//!
//! Connection handlers never touch lobby state directly. They send a
//! [`LobbyCommand`] through a [`LobbyHandle`], and the actor applies the
//! commands one at a time, so every request sees the state left by the
//! previous one and no locking is needed.

use std::collections::HashMap;

use janken_protocol::{ClientEvent, ConnectionId, Recipient, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::coordinator::{Coordinator, Outbox};
use crate::{JankenError, LobbyConfig, LobbyError};

/// Channel sender for delivering server events to one connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the lobby actor through its channel.
pub(crate) enum LobbyCommand {
    /// Register a new connection and its outbound channel.
    Connect {
        conn_id: ConnectionId,
        sender: EventSender,
        reply: oneshot::Sender<Result<(), LobbyError>>,
    },

    /// Forget a connection. Unknown ids are ignored.
    Disconnect { conn_id: ConnectionId },

    /// A decoded client request.
    Event {
        conn_id: ConnectionId,
        event: ClientEvent,
    },

    /// Request a snapshot of lobby counters.
    GetInfo { reply: oneshot::Sender<LobbyInfo> },
}

/// A snapshot of lobby counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyInfo {
    pub online_count: usize,
    pub room_count: usize,
}

/// Handle to the running lobby actor.
///
/// This is cheap to clone: it's just an `mpsc::Sender` wrapper. Every
/// connection handler holds one.
#[derive(Clone)]
pub struct LobbyHandle {
    sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    /// Registers a connection. Events for it are delivered to `sender`
    /// from this point on.
    ///
    /// # Errors
    /// [`JankenError::Lobby`] if the coordinator refuses the connection,
    /// [`JankenError::LobbyUnavailable`] if the actor has stopped.
    pub async fn connect(
        &self,
        conn_id: ConnectionId,
        sender: EventSender,
    ) -> Result<(), JankenError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(LobbyCommand::Connect {
            conn_id,
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| JankenError::LobbyUnavailable)?
            .map_err(JankenError::Lobby)
    }

    /// Unregisters a connection (fire-and-forget).
    pub async fn disconnect(
        &self,
        conn_id: ConnectionId,
    ) -> Result<(), JankenError> {
        self.send(LobbyCommand::Disconnect { conn_id }).await
    }

    /// Forwards a client request (fire-and-forget). Rejections come back
    /// to the connection as an `admin_msg`.
    pub async fn send_event(
        &self,
        conn_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), JankenError> {
        self.send(LobbyCommand::Event { conn_id, event }).await
    }

    /// Requests the current lobby counters.
    pub async fn info(&self) -> Result<LobbyInfo, JankenError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(LobbyCommand::GetInfo { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| JankenError::LobbyUnavailable)
    }

    async fn send(&self, cmd: LobbyCommand) -> Result<(), JankenError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| JankenError::LobbyUnavailable)
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct LobbyActor {
    coordinator: Coordinator,
    /// Per-connection outbound channels.
    senders: HashMap<ConnectionId, EventSender>,
    receiver: mpsc::Receiver<LobbyCommand>,
}

impl LobbyActor {
    /// Runs the actor loop until every handle is dropped.
    async fn run(mut self) {
        tracing::info!("lobby actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LobbyCommand::Connect {
                    conn_id,
                    sender,
                    reply,
                } => {
                    let result = self.handle_connect(conn_id, sender);
                    let _ = reply.send(result);
                }
                LobbyCommand::Disconnect { conn_id } => {
                    self.handle_disconnect(conn_id);
                }
                LobbyCommand::Event { conn_id, event } => {
                    self.handle_event(conn_id, event);
                }
                LobbyCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!("lobby actor stopped");
    }

    fn handle_connect(
        &mut self,
        conn_id: ConnectionId,
        sender: EventSender,
    ) -> Result<(), LobbyError> {
        let out = self.coordinator.connect(conn_id)?;
        self.senders.insert(conn_id, sender);
        self.dispatch(out);
        Ok(())
    }

    fn handle_disconnect(&mut self, conn_id: ConnectionId) {
        // Drop the channel first so broadcasts skip the departed user.
        self.senders.remove(&conn_id);
        match self.coordinator.disconnect(conn_id) {
            Ok(out) => self.dispatch(out),
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "disconnect ignored");
            }
        }
    }

    fn handle_event(&mut self, conn_id: ConnectionId, event: ClientEvent) {
        match self.coordinator.handle(conn_id, event) {
            Ok(out) => self.dispatch(out),
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "request rejected");
                self.send_to(conn_id, ServerEvent::AdminMsg(e.to_string()));
            }
        }
    }

    /// Dispatches outbound events to the correct recipients, in order.
    fn dispatch(&self, out: Outbox) {
        for (recipient, event) in out {
            match recipient {
                Recipient::Player(conn_id) => self.send_to(conn_id, event),
                Recipient::All | Recipient::AllExcept(_) => {
                    for (conn_id, sender) in &self.senders {
                        if recipient.includes(*conn_id) {
                            let _ = sender.send(event.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends an event to a single connection. Silently drops it if the
    /// receiver is gone.
    fn send_to(&self, conn_id: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&conn_id) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> LobbyInfo {
        LobbyInfo {
            online_count: self.coordinator.online_count(),
            room_count: self.coordinator.room_count(),
        }
    }
}

/// Spawns the lobby actor and returns a handle to it.
///
/// `channel_size` bounds the command queue: when it fills up, handlers
/// wait before their next request is accepted.
pub fn spawn_lobby(config: LobbyConfig, channel_size: usize) -> LobbyHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = LobbyActor {
        coordinator: Coordinator::new(config),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    LobbyHandle { sender: tx }
}
