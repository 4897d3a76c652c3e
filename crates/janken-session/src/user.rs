//! The user record: one per open connection.

use janken_protocol::{
    Choice, ConnectionId, PlayerView, PublicPlayer, RoundStatus,
};

/// A connected participant.
///
/// Fields are private: reads go through the accessors, writes go through
/// [`UserRegistry`](crate::UserRegistry), which is the sole owner.
///
/// `room` names the room the user is in and `opponent` points at the
/// paired user, both by key rather than by reference. Keeping them
/// consistent with the room registry is the coordinator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub(crate) id: ConnectionId,
    pub(crate) name: String,
    pub(crate) room: Option<String>,
    pub(crate) opponent: Option<ConnectionId>,
    pub(crate) status: RoundStatus,
    pub(crate) choice: Option<Choice>,
}

impl User {
    pub(crate) fn new(id: ConnectionId, name: String) -> Self {
        Self {
            id,
            name,
            room: None,
            opponent: None,
            status: RoundStatus::Thinking,
            choice: None,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The room this user is in, if any.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// The paired opponent, if any.
    pub fn opponent(&self) -> Option<ConnectionId> {
        self.opponent
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// The submitted hand for the current round, if any.
    pub fn choice(&self) -> Option<Choice> {
        self.choice
    }

    /// The view a user gets of their own record.
    pub fn view(&self) -> PlayerView {
        PlayerView {
            name: self.name.clone(),
            room: self.room.clone(),
            status: self.status,
            choice: self.choice,
        }
    }

    /// The view everyone else gets: name and status only.
    pub fn public_view(&self) -> PublicPlayer {
        PublicPlayer {
            name: self.name.clone(),
            status: self.status,
        }
    }
}
