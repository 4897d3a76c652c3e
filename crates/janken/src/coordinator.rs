//! The session coordinator: the lobby's state machine.
//!
//! Every client request lands here as one method call. Each call runs its
//! guards first, in a fixed order, and returns [`LobbyError`] from the first
//! one that fails without touching any state. Only once every guard has
//! passed does it mutate the user and room registries, keeping the two in
//! step: a user's `room` field names exactly the room whose member set
//! holds them, and `opponent` links are always mutual.
//!
//! Nothing is sent from here. A successful call returns an [`Outbox`] of
//! `(Recipient, ServerEvent)` pairs in the order they should be delivered,
//! and the lobby actor fans them out.

use std::collections::BTreeMap;

use janken_protocol::{
    Choice, ClientEvent, ConnectionId, Recipient, RoomView, ServerEvent,
};
use janken_room::{Room, RoomRegistry, RoomType, resolve};
use janken_session::{User, UserRegistry};

use crate::{LobbyConfig, LobbyError};

/// Events produced by one coordinator call, in delivery order.
pub type Outbox = Vec<(Recipient, ServerEvent)>;

/// Owns all lobby state and applies client requests to it.
///
/// Not thread-safe on purpose: a single lobby task owns the coordinator
/// and feeds it one request at a time.
#[derive(Debug, Default)]
pub struct Coordinator {
    users: UserRegistry,
    rooms: RoomRegistry,
    config: LobbyConfig,
}

impl Coordinator {
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            users: UserRegistry::new(),
            rooms: RoomRegistry::new(),
            config,
        }
    }

    // ---------------------------------------------------------------------
    // Connection lifecycle
    // ---------------------------------------------------------------------

    /// Registers a new connection under a random display name.
    ///
    /// # Errors
    /// [`LobbyError::AlreadyConnected`] if `id` is already registered.
    pub fn connect(&mut self, id: ConnectionId) -> Result<Outbox, LobbyError> {
        if self.users.get(id).is_some() {
            return Err(LobbyError::AlreadyConnected);
        }
        self.users.add(id)?;
        self.welcome(id)
    }

    /// Registers a new connection under a chosen display name.
    ///
    /// # Errors
    /// [`LobbyError::AlreadyConnected`] if `id` is already registered.
    pub fn connect_as(
        &mut self,
        id: ConnectionId,
        name: impl Into<String>,
    ) -> Result<Outbox, LobbyError> {
        if self.users.get(id).is_some() {
            return Err(LobbyError::AlreadyConnected);
        }
        self.users.add_named(id, name.into())?;
        self.welcome(id)
    }

    fn welcome(&self, id: ConnectionId) -> Result<Outbox, LobbyError> {
        let user = self.registered(id)?;
        let name = user.name();
        tracing::info!(conn_id = %id, %name, "user connected");

        Ok(vec![
            (Recipient::Player(id), ServerEvent::SetPlayer(user.view())),
            (
                Recipient::Player(id),
                ServerEvent::AdminMsg(format!(
                    "Hello, your random name is {name}"
                )),
            ),
            (
                Recipient::AllExcept(id),
                ServerEvent::AdminMsg(format!("{name} has connected.")),
            ),
            (Recipient::Player(id), self.room_list_event()),
            (Recipient::All, self.online_count_event()),
        ])
    }

    /// Removes a connection and everything it was part of.
    ///
    /// The user's pairing is dissolved, they leave every room, and the
    /// rooms they left are re-settled for whoever remains.
    ///
    /// # Errors
    /// [`LobbyError::NotConnected`] if `id` is not registered.
    pub fn disconnect(
        &mut self,
        id: ConnectionId,
    ) -> Result<Outbox, LobbyError> {
        let name = self.registered(id)?.name().to_string();

        self.clear_pairing(id)?;
        let left = self.rooms.leave_all(id);
        self.users.remove(id)?;

        let mut out = Outbox::new();
        for room in &left {
            self.settle_room(room, &mut out)?;
        }
        tracing::info!(conn_id = %id, %name, rooms_left = left.len(), "user disconnected");

        out.push((
            Recipient::AllExcept(id),
            ServerEvent::AdminMsg(format!("{name} has disconnected.")),
        ));
        out.push((Recipient::All, self.online_count_event()));
        out.push((Recipient::All, self.room_list_event()));
        Ok(out)
    }

    // ---------------------------------------------------------------------
    // Client requests
    // ---------------------------------------------------------------------

    /// Applies a decoded client event.
    ///
    /// Rooms created this way always use the configured default room type.
    pub fn handle(
        &mut self,
        id: ConnectionId,
        event: ClientEvent,
    ) -> Result<Outbox, LobbyError> {
        match event {
            ClientEvent::CreateRoom(name) => self.create_room(id, &name, None),
            ClientEvent::JoinRoom(name) => self.join_room(id, &name),
            ClientEvent::LeaveRoom(name) => self.leave_room(id, &name),
            ClientEvent::DeleteRoom(name) => self.delete_room(id, &name),
            ClientEvent::Choice(choice) => self.submit_choice(id, choice),
        }
    }

    /// Creates a room and puts its creator in it.
    ///
    /// `room_type` falls back to [`LobbyConfig::default_room_type`].
    ///
    /// # Errors
    /// Checked in this order:
    /// - [`LobbyError::NotConnected`]
    /// - [`LobbyError::InvalidRoomName`]: empty, blank, or too long
    /// - [`LobbyError::AlreadyInRoom`]: the creator must leave first
    /// - [`LobbyError::RoomExists`]
    /// - [`LobbyError::RoomFull`]: the room type holds nobody
    pub fn create_room(
        &mut self,
        id: ConnectionId,
        name: &str,
        room_type: Option<RoomType>,
    ) -> Result<Outbox, LobbyError> {
        let user = self.registered(id)?;
        self.check_room_name(name)?;
        if let Some(current) = user.room() {
            return Err(LobbyError::AlreadyInRoom {
                current: current.to_string(),
                requested: name.to_string(),
            });
        }
        if self.rooms.get(name).is_some() {
            return Err(LobbyError::RoomExists(name.to_string()));
        }
        let room_type =
            room_type.unwrap_or_else(|| self.config.default_room_type.clone());
        if room_type.max_capacity == 0 {
            return Err(LobbyError::RoomFull(name.to_string()));
        }

        self.rooms.create(name, room_type, id)?;
        let mut out = Outbox::new();
        self.enter_room(id, name, &mut out)?;
        Ok(out)
    }

    /// Joins an existing room.
    ///
    /// # Errors
    /// Checked in this order:
    /// - [`LobbyError::NotConnected`]
    /// - [`LobbyError::NoSuchRoom`]
    /// - [`LobbyError::RoomFull`]
    /// - [`LobbyError::AlreadyMember`]
    /// - [`LobbyError::AlreadyInRoom`]: member of a different room
    pub fn join_room(
        &mut self,
        id: ConnectionId,
        name: &str,
    ) -> Result<Outbox, LobbyError> {
        let user = self.registered(id)?;
        let room = self
            .rooms
            .get(name)
            .ok_or_else(|| LobbyError::NoSuchRoom(name.to_string()))?;
        if room.open_slots() == 0 {
            return Err(LobbyError::RoomFull(name.to_string()));
        }
        if room.contains(id) {
            return Err(LobbyError::AlreadyMember(name.to_string()));
        }
        if let Some(current) = user.room() {
            return Err(LobbyError::AlreadyInRoom {
                current: current.to_string(),
                requested: name.to_string(),
            });
        }

        let mut out = Outbox::new();
        self.enter_room(id, name, &mut out)?;
        Ok(out)
    }

    /// Leaves a room. Any pairing is dissolved first.
    ///
    /// # Errors
    /// Checked in this order:
    /// - [`LobbyError::NotConnected`]
    /// - [`LobbyError::NoSuchRoom`]
    /// - [`LobbyError::NotMember`]
    pub fn leave_room(
        &mut self,
        id: ConnectionId,
        name: &str,
    ) -> Result<Outbox, LobbyError> {
        let user_name = self.registered(id)?.name().to_string();
        let room = self
            .rooms
            .get(name)
            .ok_or_else(|| LobbyError::NoSuchRoom(name.to_string()))?;
        if !room.contains(id) {
            return Err(LobbyError::NotMember(name.to_string()));
        }

        self.clear_pairing(id)?;
        self.users.unset_room(id)?;
        self.rooms.leave(id, name)?;

        let mut out = vec![
            (
                Recipient::Player(id),
                ServerEvent::AdminMsg(format!("You left {name}.")),
            ),
            (Recipient::Player(id), ServerEvent::ChangeClientRoom(None)),
        ];
        out.extend(self.players_event(id).map(|e| (Recipient::Player(id), e)));
        for member in self.rooms.members_of(name) {
            out.push((
                Recipient::Player(member),
                ServerEvent::AdminMsg(format!("{user_name} left {name}")),
            ));
        }
        out.push((Recipient::All, self.room_list_event()));
        self.settle_room(name, &mut out)?;
        Ok(out)
    }

    /// Deletes a room, evicting everyone in it. Any connected user may
    /// delete any room.
    ///
    /// # Errors
    /// - [`LobbyError::NotConnected`]
    /// - [`LobbyError::NoSuchRoom`]
    pub fn delete_room(
        &mut self,
        id: ConnectionId,
        name: &str,
    ) -> Result<Outbox, LobbyError> {
        self.registered(id)?;
        if self.rooms.get(name).is_none() {
            return Err(LobbyError::NoSuchRoom(name.to_string()));
        }

        let mut out = Outbox::new();
        for member in self.rooms.members_of(name) {
            self.clear_pairing(member)?;
            self.users.unset_room(member)?;
            self.rooms.leave(member, name)?;

            out.push((
                Recipient::Player(member),
                ServerEvent::ChangeClientRoom(None),
            ));
            out.push((
                Recipient::Player(member),
                ServerEvent::AdminMsg(format!("The room {name} was deleted.")),
            ));
            out.extend(
                self.players_event(member)
                    .map(|e| (Recipient::Player(member), e)),
            );
        }
        self.rooms.delete(name)?;

        out.push((
            Recipient::Player(id),
            ServerEvent::AdminMsg(format!("Deleted room {name}.")),
        ));
        out.push((Recipient::All, self.room_list_event()));
        Ok(out)
    }

    /// Records a hand for the current round and resolves the round once
    /// both players have chosen.
    ///
    /// Choosing again before the opponent does replaces the earlier hand.
    ///
    /// # Errors
    /// - [`LobbyError::NotConnected`]
    /// - [`LobbyError::NoOpponent`]
    pub fn submit_choice(
        &mut self,
        id: ConnectionId,
        choice: Choice,
    ) -> Result<Outbox, LobbyError> {
        let opponent = self
            .registered(id)?
            .opponent()
            .ok_or(LobbyError::NoOpponent)?;

        self.users.submit_choice(id, choice)?;
        let mut out = vec![(
            Recipient::Player(id),
            ServerEvent::AdminMsg(format!("You chose {choice}.")),
        )];
        self.push_pair_state(id, opponent, &mut out);
        self.resolve_round(id, opponent, &mut out)?;
        Ok(out)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Number of connected users.
    pub fn online_count(&self) -> usize {
        self.users.count()
    }

    /// Every room as the clients see it, keyed by name.
    pub fn room_list(&self) -> BTreeMap<String, RoomView> {
        self.rooms
            .iter()
            .map(|room| (room.name().to_string(), self.room_view(room)))
            .collect()
    }

    pub fn user(&self, id: ConnectionId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.room_count()
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn registered(&self, id: ConnectionId) -> Result<&User, LobbyError> {
        self.users.get(id).ok_or(LobbyError::NotConnected)
    }

    fn check_room_name(&self, name: &str) -> Result<(), LobbyError> {
        if name.trim().is_empty()
            || name.chars().count() > self.config.max_room_name_len
        {
            return Err(LobbyError::InvalidRoomName(name.to_string()));
        }
        Ok(())
    }

    /// Puts a validated user into an existing room.
    fn enter_room(
        &mut self,
        id: ConnectionId,
        name: &str,
        out: &mut Outbox,
    ) -> Result<(), LobbyError> {
        self.rooms.join(id, name)?;
        let user_name = self.users.set_room(id, name)?.name().to_string();

        out.push((
            Recipient::Player(id),
            ServerEvent::AdminMsg(format!("Joined room {name}.")),
        ));
        out.push((
            Recipient::Player(id),
            ServerEvent::ChangeClientRoom(Some(name.to_string())),
        ));
        for member in self.rooms.members_of(name) {
            if member != id {
                out.push((
                    Recipient::Player(member),
                    ServerEvent::AdminMsg(format!("{user_name} joined {name}")),
                ));
            }
        }
        out.push((Recipient::All, self.room_list_event()));
        self.settle_room(name, out)
    }

    /// Dissolves `id`'s pairing on both sides. Both users go back to
    /// THINKING with no pending hand.
    fn clear_pairing(&mut self, id: ConnectionId) -> Result<(), LobbyError> {
        let Some(opponent) = self.registered(id)?.opponent() else {
            return Ok(());
        };
        self.users.set_opponent(id, None)?;
        if self.users.get(opponent).is_some() {
            self.users.set_opponent(opponent, None)?;
        }
        tracing::debug!(conn_id = %id, %opponent, "pairing cleared");
        Ok(())
    }

    /// Pairs the room if it can be paired, then sends every member their
    /// current player state.
    fn settle_room(
        &mut self,
        name: &str,
        out: &mut Outbox,
    ) -> Result<(), LobbyError> {
        self.pair_if_ready(name, out)?;
        for member in self.rooms.members_of(name) {
            out.extend(
                self.players_event(member)
                    .map(|e| (Recipient::Player(member), e)),
            );
        }
        Ok(())
    }

    /// Pairs the two members of a room when it holds exactly two users and
    /// neither is paired yet. Each side gets `set_enemy` with the other's
    /// safe view.
    fn pair_if_ready(
        &mut self,
        name: &str,
        out: &mut Outbox,
    ) -> Result<(), LobbyError> {
        let members = self.rooms.members_of(name);
        let &[a, b] = members.as_slice() else {
            return Ok(());
        };
        let unpaired = |id| {
            self.users
                .get(id)
                .is_some_and(|user: &User| user.opponent().is_none())
        };
        if !(unpaired(a) && unpaired(b)) {
            return Ok(());
        }

        let a_view = self.users.set_opponent(a, Some(b))?.public_view();
        let b_view = self.users.set_opponent(b, Some(a))?.public_view();
        tracing::info!(room = %name, first = %a, second = %b, "players paired");

        for (player, opponent) in [(a, b_view), (b, a_view)] {
            out.push((
                Recipient::Player(player),
                ServerEvent::AdminMsg(format!(
                    "You are playing against {}.",
                    opponent.name
                )),
            ));
            out.push((Recipient::Player(player), ServerEvent::SetEnemy(opponent)));
        }
        Ok(())
    }

    /// Resolves the round once both players hold a hand. Each player gets
    /// their own result followed by their fresh state.
    fn resolve_round(
        &mut self,
        id: ConnectionId,
        opponent: ConnectionId,
        out: &mut Outbox,
    ) -> Result<(), LobbyError> {
        let hands = self
            .users
            .get(id)
            .and_then(User::choice)
            .zip(self.users.get(opponent).and_then(User::choice));
        let Some((hand, opponent_hand)) = hands else {
            return Ok(());
        };

        let outcome = resolve((id, hand), (opponent, opponent_hand));
        self.users.reset_round(id)?;
        self.users.reset_round(opponent)?;
        tracing::info!(conn_id = %id, %opponent, ?outcome, "round resolved");

        for player in [id, opponent] {
            if let Some(result) = outcome.result_for(&player) {
                out.push((
                    Recipient::Player(player),
                    ServerEvent::GameResult(result),
                ));
            }
        }
        self.push_pair_state(id, opponent, out);
        Ok(())
    }

    fn push_pair_state(
        &self,
        a: ConnectionId,
        b: ConnectionId,
        out: &mut Outbox,
    ) {
        for player in [a, b] {
            out.extend(
                self.players_event(player)
                    .map(|e| (Recipient::Player(player), e)),
            );
        }
    }

    /// `update_players` for one user: their own record plus the safe view
    /// of their opponent.
    fn players_event(&self, id: ConnectionId) -> Option<ServerEvent> {
        let user = self.users.get(id)?;
        let opponent = user
            .opponent()
            .and_then(|opponent| self.users.get(opponent))
            .map(User::public_view);
        Some(ServerEvent::UpdatePlayers {
            player: user.view(),
            opponent,
        })
    }

    fn room_view(&self, room: &Room) -> RoomView {
        RoomView {
            name: room.name().to_string(),
            room_type: room.room_type().name.clone(),
            max_user_count: room.max_capacity(),
            players: room
                .members()
                .filter_map(|id| self.users.get(id))
                .map(User::public_view)
                .collect(),
        }
    }

    fn room_list_event(&self) -> ServerEvent {
        ServerEvent::RoomList(self.room_list())
    }

    fn online_count_event(&self) -> ServerEvent {
        ServerEvent::OnlineCount(self.online_count())
    }
}
