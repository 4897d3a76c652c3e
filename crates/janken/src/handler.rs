//! Per-connection handler: lobby registration, outbound writer, and the
//! inbound read loop.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register with the lobby, handing it an outbound channel
//!   2. Spawn a writer task that encodes and sends everything on it
//!   3. Loop: receive frames → decode → forward to the lobby
//!   4. On close or error, the guard tells the lobby we're gone

use std::sync::Arc;

use janken_protocol::{ClientEvent, Codec, ConnectionId, ServerEvent};
use janken_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::{JankenError, LobbyHandle};

/// Drop guard that disconnects the user when the handler exits.
///
/// This ensures cleanup happens even if the handler returns early or
/// panics. Since `Drop` is synchronous, we spawn a fire-and-forget task
/// for the async send.
struct LobbyGuard {
    conn_id: ConnectionId,
    lobby: LobbyHandle,
}

impl Drop for LobbyGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let lobby = self.lobby.clone();
        tokio::spawn(async move {
            let _ = lobby.disconnect(conn_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    lobby: LobbyHandle,
    codec: C,
) -> Result<(), JankenError>
where
    C: Codec + Clone,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    // Kept for replies the lobby never sees, such as decode failures.
    let replies = tx.clone();

    lobby.connect(conn_id, tx).await?;
    let _guard = LobbyGuard {
        conn_id,
        lobby: lobby.clone(),
    };

    tokio::spawn(write_loop(Arc::clone(&conn), rx, codec.clone()));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode event");
                let _ = replies.send(ServerEvent::AdminMsg(format!(
                    "Unrecognized message: {e}"
                )));
                continue;
            }
        };

        lobby.send_event(conn_id, event).await?;
    }

    // _guard drops here → lobby disconnect fires. The writer stops once
    // the lobby drops its sender.
    Ok(())
}

/// Encodes and sends every outbound event until the channel closes or the
/// socket fails.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    codec: C,
) {
    let conn_id = conn.id();

    while let Some(event) = rx.recv().await {
        let bytes = match codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}
