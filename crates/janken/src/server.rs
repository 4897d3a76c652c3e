//! `JankenServer` builder and accept loop.
//!
//! This is the entry point for running a lobby. It ties together all the
//! layers: transport → protocol → lobby actor → coordinator.

use janken_protocol::{Codec, JsonCodec};
use janken_transport::{Transport, WebSocketTransport};

use crate::actor::spawn_lobby;
use crate::handler::handle_connection;
use crate::{JankenError, LobbyConfig, LobbyHandle};

/// Capacity of the lobby's command queue.
const LOBBY_CHANNEL_SIZE: usize = 256;

/// Builder for configuring and starting a lobby server.
///
/// # Example
///
/// ```rust,no_run
/// use janken::prelude::*;
///
/// # async fn run() -> Result<(), JankenError> {
/// let server = JankenServer::builder()
///     .bind("0.0.0.0:3000")
///     .lobby_config(LobbyConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct JankenServerBuilder {
    bind_addr: String,
    lobby_config: LobbyConfig,
}

impl JankenServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            lobby_config: LobbyConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the lobby configuration.
    pub fn lobby_config(mut self, config: LobbyConfig) -> Self {
        self.lobby_config = config;
        self
    }

    /// Binds the listener and starts the lobby actor.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`, which is what browsers
    /// speak.
    pub async fn build(self) -> Result<JankenServer<JsonCodec>, JankenError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let lobby = spawn_lobby(self.lobby_config, LOBBY_CHANNEL_SIZE);

        Ok(JankenServer {
            transport,
            lobby,
            codec: JsonCodec,
        })
    }
}

impl Default for JankenServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound lobby server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct JankenServer<C: Codec> {
    transport: WebSocketTransport,
    lobby: LobbyHandle,
    codec: C,
}

impl JankenServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> JankenServerBuilder {
        JankenServerBuilder::new()
    }
}

impl<C> JankenServer<C>
where
    C: Codec + Clone,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the lobby, for inspecting it while the server runs.
    pub fn lobby(&self) -> LobbyHandle {
        self.lobby.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(self) -> Result<(), JankenError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` completes, then shuts the
    /// transport down.
    ///
    /// Connections accepted before the signal keep running in their own
    /// tasks, and the lobby stays up while any [`LobbyHandle`] is alive.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), JankenError> {
        tracing::info!(addr = ?self.local_addr().ok(), "janken server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested, no longer accepting");
                    break;
                }
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let lobby = self.lobby.clone();
                        let codec = self.codec.clone();
                        tokio::spawn(async move {
                            if let Err(e) =
                                handle_connection(conn, lobby, codec).await
                            {
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
                },
            }
        }

        self.transport.shutdown().await?;
        Ok(())
    }
}
