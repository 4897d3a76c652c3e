//! Error types for the lobby.

use janken_protocol::ProtocolError;
use janken_room::RoomError;
use janken_session::UserError;
use janken_transport::TransportError;

/// Why the coordinator refused a request.
///
/// The `Display` text is what the requester sees: the lobby sends it back
/// verbatim as an `admin_msg`. A refused request never changes any state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// The connection has no registered user.
    #[error("You are not connected.")]
    NotConnected,

    /// The connection is already registered.
    #[error("You are already connected.")]
    AlreadyConnected,

    /// Empty, whitespace-only, or over-long room name.
    #[error("The room name {0:?} is not allowed.")]
    InvalidRoomName(String),

    /// The user is in another room and must leave it first.
    #[error("You can only join one room, leave {current} to enter {requested}.")]
    AlreadyInRoom { current: String, requested: String },

    #[error("Sorry the room {0} already exists, try a different name.")]
    RoomExists(String),

    #[error("Sorry the room {0} doesn't exist, try a different name.")]
    NoSuchRoom(String),

    #[error("The room {0} is already full.")]
    RoomFull(String),

    #[error("You have already joined {0}.")]
    AlreadyMember(String),

    #[error("You can't leave {0} because you are not in the room.")]
    NotMember(String),

    /// A hand was submitted without a paired opponent.
    #[error("You don't have an opponent yet.")]
    NoOpponent,

    /// User and room registries disagree. Not reachable through the
    /// coordinator's own guards.
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Top-level error for the server and the lobby handle.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically. Registry
/// errors only surface from the coordinator, so they arrive here wrapped
/// in [`LobbyError`].
#[derive(Debug, thiserror::Error)]
pub enum JankenError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The coordinator refused the request.
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// The lobby task has stopped and no longer accepts commands.
    #[error("lobby unavailable")]
    LobbyUnavailable,
}
