//! # Janken
//!
//! Real-time multiplayer rock-paper-scissors lobby.
//!
//! Clients connect over WebSocket, get a random display name, and can
//! create, join, leave, or delete rooms. Two users sharing a room are
//! paired as opponents; once both have chosen a hand the round is
//! resolved and each player is told whether they won, lost, or tied.
//!
//! All lobby state lives in one [`Coordinator`], owned by a single actor
//! task. Connection handlers talk to it through a [`LobbyHandle`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use janken::prelude::*;
//!
//! # async fn run() -> Result<(), JankenError> {
//! let server = JankenServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod actor;
mod config;
mod coordinator;
mod error;
mod handler;
mod server;

pub use actor::{EventSender, LobbyHandle, LobbyInfo, spawn_lobby};
pub use config::LobbyConfig;
pub use coordinator::{Coordinator, Outbox};
pub use error::{JankenError, LobbyError};
pub use server::{JankenServer, JankenServerBuilder};

/// Everything needed to run or embed a lobby.
pub mod prelude {
    pub use crate::{
        Coordinator, EventSender, JankenError, JankenServer,
        JankenServerBuilder, LobbyConfig, LobbyError, LobbyHandle, LobbyInfo,
        Outbox, spawn_lobby,
    };
    pub use janken_protocol::{
        Choice, ClientEvent, Codec, ConnectionId, GameResult, JsonCodec,
        PlayerView, PublicPlayer, Recipient, RoomView, RoundStatus,
        ServerEvent,
    };
    pub use janken_room::{Room, RoomType};
    pub use janken_session::User;
}
