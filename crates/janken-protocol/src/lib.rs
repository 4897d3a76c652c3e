//! Wire protocol for the Janken lobby.
//!
//! This crate defines the "language" that browsers and the lobby speak:
//!
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — every message that
//!   crosses the transport boundary.
//! - **Views** ([`PlayerView`], [`PublicPlayer`], [`RoomView`]) — the only
//!   shapes in which users and rooms leave the server.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to/from bytes.
//!
//! ```text
//! Transport (bytes) → Protocol (events) → Lobby (registries)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Choice, ClientEvent, GameResult, PlayerView, PublicPlayer, Recipient,
    RoomView, RoundStatus, ServerEvent,
};

/// Re-exported so higher layers don't need a direct transport dependency
/// just to name a user.
pub use janken_transport::ConnectionId;
