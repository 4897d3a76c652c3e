//! Error types for the user registry.

use janken_protocol::ConnectionId;

/// Errors that can occur while registering or updating users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    /// A user is already registered for this connection.
    /// Under correct transport use this never happens: every connection
    /// gets a fresh id.
    #[error("user {0} is already registered")]
    AlreadyExists(ConnectionId),

    /// No user is registered for this connection.
    #[error("user {0} not found")]
    NotFound(ConnectionId),
}
