//! Room registry: creates, tracks, and deletes rooms and their membership.

use std::collections::BTreeMap;

use janken_protocol::ConnectionId;

use crate::{Room, RoomError, RoomType};

/// Tracks every room by name.
///
/// The registry mutates membership only. It does not check capacity or the
/// one-room-per-user rule on [`join`](Self::join): the coordinator validates
/// those first and then calls in, so validation and mutation stay separate.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: BTreeMap<String, Room>,
}

impl RoomRegistry {
    /// Creates a new, empty room registry.
    pub fn new() -> Self {
        Self {
            rooms: BTreeMap::new(),
        }
    }

    /// Creates an empty room.
    ///
    /// # Errors
    /// Returns [`RoomError::AlreadyExists`] if the name is taken.
    pub fn create(
        &mut self,
        name: &str,
        room_type: RoomType,
        creator: ConnectionId,
    ) -> Result<&Room, RoomError> {
        if self.rooms.contains_key(name) {
            return Err(RoomError::AlreadyExists(name.to_string()));
        }

        tracing::info!(room = %name, %creator, kind = %room_type.name, "room created");
        Ok(self
            .rooms
            .entry(name.to_string())
            .or_insert(Room::new(name.to_string(), room_type, creator)))
    }

    /// Removes a room and returns it.
    ///
    /// Callers evict members first; the returned room is only used for
    /// notifications.
    pub fn delete(&mut self, name: &str) -> Result<Room, RoomError> {
        let room = self
            .rooms
            .remove(name)
            .ok_or_else(|| RoomError::NotFound(name.to_string()))?;
        tracing::info!(room = %name, "room deleted");
        Ok(room)
    }

    pub fn get(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Adds a member. Does not re-check capacity or membership elsewhere.
    pub fn join(
        &mut self,
        id: ConnectionId,
        name: &str,
    ) -> Result<&Room, RoomError> {
        let room = self.get_mut(name)?;
        room.insert(id);
        tracing::info!(room = %name, %id, members = room.len(), "user joined room");
        Ok(room)
    }

    /// Removes a member.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — no such room
    /// - [`RoomError::NotInRoom`] — `id` is not a member
    pub fn leave(
        &mut self,
        id: ConnectionId,
        name: &str,
    ) -> Result<&Room, RoomError> {
        let room = self.get_mut(name)?;
        if !room.remove(id) {
            return Err(RoomError::NotInRoom(id, name.to_string()));
        }
        tracing::info!(room = %name, %id, members = room.len(), "user left room");
        Ok(room)
    }

    /// Removes `id` from every room that contains it.
    ///
    /// Returns the names of the rooms it was removed from. Rooms left empty
    /// are kept.
    pub fn leave_all(&mut self, id: ConnectionId) -> Vec<String> {
        let mut left = Vec::new();
        for room in self.rooms.values_mut() {
            if room.remove(id) {
                left.push(room.name().to_string());
            }
        }
        left
    }

    /// Free slots in a room, or `None` if it doesn't exist.
    pub fn open_slots(&self, name: &str) -> Option<usize> {
        self.rooms.get(name).map(Room::open_slots)
    }

    /// Member ids of a room in ascending connection order. Empty if the
    /// room doesn't exist.
    pub fn members_of(&self, name: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(name)
            .map(|room| room.members().collect())
            .unwrap_or_default()
    }

    /// Iterates over all rooms in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Returns the number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Room, RoomError> {
        self.rooms
            .get_mut(name)
            .ok_or_else(|| RoomError::NotFound(name.to_string()))
    }
}
