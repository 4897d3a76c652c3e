//! A single room.

use std::collections::BTreeSet;

use janken_protocol::ConnectionId;

use crate::RoomType;

/// A named, capacity-bounded group of users.
///
/// Members are stored by connection id only. The name is the registry key
/// and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    name: String,
    room_type: RoomType,
    creator: ConnectionId,
    members: BTreeSet<ConnectionId>,
}

impl Room {
    pub(crate) fn new(
        name: String,
        room_type: RoomType,
        creator: ConnectionId,
    ) -> Self {
        Self {
            name,
            room_type,
            creator,
            members: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn room_type(&self) -> &RoomType {
        &self.room_type
    }

    /// The connection that created the room. Informational only; any
    /// connected user may delete a room.
    pub fn creator(&self) -> ConnectionId {
        self.creator
    }

    pub fn max_capacity(&self) -> usize {
        self.room_type.max_capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains(&id)
    }

    /// Free slots left: `max_capacity - member count`, never negative.
    pub fn open_slots(&self) -> usize {
        self.max_capacity().saturating_sub(self.members.len())
    }

    /// Member ids in ascending connection order.
    pub fn members(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.members.iter().copied()
    }

    pub(crate) fn insert(&mut self, id: ConnectionId) -> bool {
        self.members.insert(id)
    }

    pub(crate) fn remove(&mut self, id: ConnectionId) -> bool {
        self.members.remove(&id)
    }
}
