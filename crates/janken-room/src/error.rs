//! Error types for the room layer.

use janken_protocol::ConnectionId;

/// Errors that can occur during room registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// A room with this name already exists.
    #[error("room {0} already exists")]
    AlreadyExists(String),

    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(String),

    /// The user is not a member of this room.
    #[error("user {0} not in room {1}")]
    NotInRoom(ConnectionId, String),
}
