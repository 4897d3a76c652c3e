//! The user registry: every connected user, keyed by connection id.
//!
//! # Concurrency note
//!
//! `UserRegistry` is a plain `HashMap` with no locking. It is owned by the
//! lobby actor and only ever touched from that one task, so every
//! operation runs to completion before the next one starts.

use std::collections::HashMap;

use janken_protocol::{Choice, ConnectionId, RoundStatus};

use crate::{User, UserError, random_name};

/// Tracks connected users and their transient round state.
///
/// ## Lifecycle
///
/// ```text
/// add() ──→ set_room() / set_opponent() / submit_choice() ... ──→ remove()
/// ```
///
/// Room and opponent fields are only ever changed here, and only on the
/// coordinator's instruction. The registry does not look at rooms itself.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: HashMap<ConnectionId, User>,
}

impl UserRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
        }
    }

    /// Registers a user with a randomly chosen display name.
    ///
    /// # Errors
    /// Returns [`UserError::AlreadyExists`] if the id is already registered.
    pub fn add(&mut self, id: ConnectionId) -> Result<&User, UserError> {
        self.add_named(id, random_name())
    }

    /// Registers a user with a caller-chosen display name.
    ///
    /// # Errors
    /// Returns [`UserError::AlreadyExists`] if the id is already registered.
    pub fn add_named(
        &mut self,
        id: ConnectionId,
        name: String,
    ) -> Result<&User, UserError> {
        if self.users.contains_key(&id) {
            return Err(UserError::AlreadyExists(id));
        }

        tracing::info!(%id, %name, "user registered");
        Ok(self.users.entry(id).or_insert(User::new(id, name)))
    }

    /// Removes a user and returns the record.
    ///
    /// # Errors
    /// Returns [`UserError::NotFound`] if no user is registered for `id`.
    pub fn remove(&mut self, id: ConnectionId) -> Result<User, UserError> {
        let user = self.users.remove(&id).ok_or(UserError::NotFound(id))?;
        tracing::info!(%id, name = %user.name, "user removed");
        Ok(user)
    }

    /// Looks up a user by connection id.
    pub fn get(&self, id: ConnectionId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Records which room the user is in. Does not touch any room.
    pub fn set_room(
        &mut self,
        id: ConnectionId,
        room: &str,
    ) -> Result<&User, UserError> {
        let user = self.get_mut(id)?;
        user.room = Some(room.to_string());
        Ok(user)
    }

    /// Clears the user's room. Does not touch any room.
    pub fn unset_room(&mut self, id: ConnectionId) -> Result<&User, UserError> {
        let user = self.get_mut(id)?;
        user.room = None;
        Ok(user)
    }

    /// Sets or clears the user's opponent.
    ///
    /// Changing opponents always starts a fresh round: status goes back to
    /// THINKING and any pending choice is dropped. Only one side is
    /// updated; the caller pairs both users.
    pub fn set_opponent(
        &mut self,
        id: ConnectionId,
        opponent: Option<ConnectionId>,
    ) -> Result<&User, UserError> {
        let user = self.get_mut(id)?;
        user.opponent = opponent;
        user.status = RoundStatus::Thinking;
        user.choice = None;
        Ok(user)
    }

    /// Records a submitted hand and moves the user to WAITING.
    ///
    /// Submitting again while WAITING replaces the earlier hand.
    pub fn submit_choice(
        &mut self,
        id: ConnectionId,
        choice: Choice,
    ) -> Result<&User, UserError> {
        let user = self.get_mut(id)?;
        user.status = RoundStatus::Waiting;
        user.choice = Some(choice);
        Ok(user)
    }

    /// Puts the user back to THINKING with no pending choice.
    pub fn reset_round(&mut self, id: ConnectionId) -> Result<&User, UserError> {
        let user = self.get_mut(id)?;
        user.status = RoundStatus::Thinking;
        user.choice = None;
        Ok(user)
    }

    /// Number of registered users.
    pub fn count(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no user is registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterates over all users in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    fn get_mut(&mut self, id: ConnectionId) -> Result<&mut User, UserError> {
        self.users.get_mut(&id).ok_or(UserError::NotFound(id))
    }
}

// =========================================================================
// Tests
// =========================================================================
