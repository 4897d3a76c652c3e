//! Core protocol types for the lobby's wire format.
//!
//! Every type in this module either travels on the wire or decides where
//! something on the wire goes. Server-internal records (users, rooms) never
//! serialize directly; they are projected into the view types below first,
//! so connection ids and pending choices can't leak to other clients.

use std::collections::BTreeMap;
use std::fmt;

use janken_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Game vocabulary
// ---------------------------------------------------------------------------

/// One hand in a round of rock-paper-scissors.
///
/// Serialized in lowercase (`"rock"`, `"paper"`, `"scissors"`), which is
/// exactly what the browser client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    /// All three hands, in a fixed order.
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Returns `true` if `self` defeats `other`.
    ///
    /// Rock beats scissors, scissors beats paper, paper beats rock.
    pub fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Scissors, Choice::Paper)
                | (Choice::Paper, Choice::Rock)
        )
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rock => write!(f, "rock"),
            Self::Paper => write!(f, "paper"),
            Self::Scissors => write!(f, "scissors"),
        }
    }
}

/// Where a user is within the current round.
///
/// ```text
///   THINKING ──(choice)──→ WAITING ──(both waiting: resolve)──→ THINKING
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    /// No choice submitted yet.
    #[default]
    Thinking,
    /// Choice submitted, waiting for the opponent.
    Waiting,
}

/// Outcome of a round from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Lose,
    Tie,
}

// ---------------------------------------------------------------------------
// Recipient — who should receive an event?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// The lobby returns `(Recipient, ServerEvent)` pairs; the delivery layer
/// expands them against whoever is connected at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connected user.
    All,

    /// One specific connection.
    Player(ConnectionId),

    /// Everyone except the given connection. Used for "X has connected."
    AllExcept(ConnectionId),
}

impl Recipient {
    /// Returns `true` if `id` is covered by this recipient.
    pub fn includes(&self, id: ConnectionId) -> bool {
        match self {
            Self::All => true,
            Self::Player(target) => *target == id,
            Self::AllExcept(excluded) => *excluded != id,
        }
    }
}

// ---------------------------------------------------------------------------
// Public views
// ---------------------------------------------------------------------------

/// The safe view of another user: display name and round status only.
///
/// This is what opponents and room listings see. It deliberately omits the
/// pending choice, so nobody can peek before submitting their own hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub name: String,
    pub status: RoundStatus,
}

/// A user's view of their own record.
///
/// Includes the user's own pending choice, but not the connection id or
/// the opponent's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub room: Option<String>,
    pub status: RoundStatus,
    pub choice: Option<Choice>,
}

/// One entry of the room directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub name: String,
    /// Name of the room type (e.g. `"janken"`).
    pub room_type: String,
    pub max_user_count: usize,
    /// Members in connection order.
    pub players: Vec<PublicPlayer>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events a client sends to the lobby.
///
/// `connect` and `disconnect` are not listed here: they are implied by the
/// transport opening and closing the connection.
///
/// Adjacently tagged, so `ClientEvent::JoinRoom("lobby".into())` is
/// `{ "event": "join_room", "data": "lobby" }` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Create a room with the given name and join it.
    CreateRoom(String),
    /// Join an existing room.
    JoinRoom(String),
    /// Leave a room the user is in.
    LeaveRoom(String),
    /// Delete a room, evicting everyone inside.
    DeleteRoom(String),
    /// Submit a hand for the current round.
    Choice(Choice),
}

/// Events the lobby sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Initial identity push, sent once right after connecting.
    SetPlayer(PlayerView),

    /// Human-readable notification or rejection message.
    AdminMsg(String),

    /// Number of users currently connected.
    OnlineCount(usize),

    /// Full room directory, keyed by room name.
    RoomList(BTreeMap<String, RoomView>),

    /// The recipient's own record and their opponent, if paired.
    UpdatePlayers {
        player: PlayerView,
        opponent: Option<PublicPlayer>,
    },

    /// The opponent the recipient was just paired with.
    SetEnemy(PublicPlayer),

    /// Result of a finished round, sent individually to each player.
    GameResult(GameResult),

    /// The room the client should now display, or `null` for none.
    ChangeClientRoom(Option<String>),
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! These tests pin the JSON shapes. The browser client matches on
    //! event names and payload fields, so a serde attribute change here is
    //! a breaking protocol change.

    use super::*;

    fn view(name: &str) -> PlayerView {
        PlayerView {
            name: name.into(),
            room: Some("lobby".into()),
            status: RoundStatus::Waiting,
            choice: Some(Choice::Paper),
        }
    }

    // =====================================================================
    // Game vocabulary
    // =====================================================================

    #[test]
    fn test_choice_serializes_lowercase() {
        let json = serde_json::to_string(&Choice::Scissors).unwrap();
        assert_eq!(json, "\"scissors\"");
    }

    #[test]
    fn test_choice_rejects_unknown_hand() {
        let result: Result<Choice, _> = serde_json::from_str("\"lizard\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_choice_beats_is_a_cycle() {
        assert!(Choice::Rock.beats(Choice::Scissors));
        assert!(Choice::Scissors.beats(Choice::Paper));
        assert!(Choice::Paper.beats(Choice::Rock));
        for c in Choice::ALL {
            assert!(!c.beats(c), "{c} must not beat itself");
        }
    }

    #[test]
    fn test_round_status_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_string(&RoundStatus::Thinking).unwrap(),
            "\"THINKING\""
        );
        assert_eq!(
            serde_json::to_string(&RoundStatus::Waiting).unwrap(),
            "\"WAITING\""
        );
        assert_eq!(RoundStatus::default(), RoundStatus::Thinking);
    }

    #[test]
    fn test_game_result_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&GameResult::Win).unwrap(), "\"win\"");
        assert_eq!(serde_json::to_string(&GameResult::Lose).unwrap(), "\"lose\"");
        assert_eq!(serde_json::to_string(&GameResult::Tie).unwrap(), "\"tie\"");
    }

    // =====================================================================
    // Recipient
    // =====================================================================

    #[test]
    fn test_recipient_includes() {
        let a = ConnectionId::new(1);
        let b = ConnectionId::new(2);

        assert!(Recipient::All.includes(a));
        assert!(Recipient::Player(a).includes(a));
        assert!(!Recipient::Player(a).includes(b));
        assert!(!Recipient::AllExcept(a).includes(a));
        assert!(Recipient::AllExcept(a).includes(b));
    }

    // =====================================================================
    // ClientEvent — one test per event name
    // =====================================================================

    #[test]
    fn test_client_event_room_requests_carry_plain_name() {
        let cases = [
            (r#"{"event":"create_room","data":"lobby"}"#, ClientEvent::CreateRoom("lobby".into())),
            (r#"{"event":"join_room","data":"lobby"}"#, ClientEvent::JoinRoom("lobby".into())),
            (r#"{"event":"leave_room","data":"lobby"}"#, ClientEvent::LeaveRoom("lobby".into())),
            (r#"{"event":"delete_room","data":"lobby"}"#, ClientEvent::DeleteRoom("lobby".into())),
        ];
        for (json, expected) in cases {
            let decoded: ClientEvent = serde_json::from_str(json).unwrap();
            assert_eq!(decoded, expected, "decoding {json}");
        }
    }

    #[test]
    fn test_client_event_choice_json_format() {
        let decoded: ClientEvent =
            serde_json::from_str(r#"{"event":"choice","data":"paper"}"#).unwrap();
        assert_eq!(decoded, ClientEvent::Choice(Choice::Paper));
    }

    #[test]
    fn test_client_event_room_name_must_be_string() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event":"join_room","data":42}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerEvent
    // =====================================================================

    #[test]
    fn test_server_event_admin_msg_json_format() {
        let json = serde_json::to_value(ServerEvent::AdminMsg("hi".into())).unwrap();
        assert_eq!(json["event"], "admin_msg");
        assert_eq!(json["data"], "hi");
    }

    #[test]
    fn test_server_event_online_count_json_format() {
        let json = serde_json::to_value(ServerEvent::OnlineCount(3)).unwrap();
        assert_eq!(json["event"], "online_count");
        assert_eq!(json["data"], 3);
    }

    #[test]
    fn test_server_event_set_player_exposes_only_view_fields() {
        let json = serde_json::to_value(ServerEvent::SetPlayer(view("Ann"))).unwrap();
        assert_eq!(json["event"], "set_player");

        let data = json["data"].as_object().unwrap();
        let mut keys: Vec<&str> = data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["choice", "name", "room", "status"]);
        assert_eq!(data["status"], "WAITING");
        assert_eq!(data["choice"], "paper");
    }

    #[test]
    fn test_server_event_update_players_opponent_hides_choice() {
        let event = ServerEvent::UpdatePlayers {
            player: view("Ann"),
            opponent: Some(PublicPlayer {
                name: "Bob".into(),
                status: RoundStatus::Waiting,
            }),
        };
        let json = serde_json::to_value(event).unwrap();

        assert_eq!(json["event"], "update_players");
        assert_eq!(json["data"]["player"]["name"], "Ann");
        assert_eq!(json["data"]["opponent"]["name"], "Bob");
        assert!(json["data"]["opponent"].get("choice").is_none());
    }

    #[test]
    fn test_server_event_update_players_without_opponent_is_null() {
        let event = ServerEvent::UpdatePlayers {
            player: view("Ann"),
            opponent: None,
        };
        let json = serde_json::to_value(event).unwrap();
        assert!(json["data"]["opponent"].is_null());
    }

    #[test]
    fn test_server_event_set_enemy_json_format() {
        let event = ServerEvent::SetEnemy(PublicPlayer {
            name: "Bob".into(),
            status: RoundStatus::Thinking,
        });
        let json = serde_json::to_value(event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "event": "set_enemy",
                "data": { "name": "Bob", "status": "THINKING" }
            })
        );
    }

    #[test]
    fn test_server_event_room_list_is_keyed_by_name() {
        let mut rooms = BTreeMap::new();
        rooms.insert(
            "lobby".to_string(),
            RoomView {
                name: "lobby".into(),
                room_type: "janken".into(),
                max_user_count: 2,
                players: vec![PublicPlayer {
                    name: "Ann".into(),
                    status: RoundStatus::Thinking,
                }],
            },
        );
        let json = serde_json::to_value(ServerEvent::RoomList(rooms)).unwrap();

        assert_eq!(json["event"], "room_list");
        assert_eq!(json["data"]["lobby"]["max_user_count"], 2);
        assert_eq!(json["data"]["lobby"]["players"][0]["status"], "THINKING");
    }

    #[test]
    fn test_server_event_change_client_room_null() {
        let json = serde_json::to_value(ServerEvent::ChangeClientRoom(None)).unwrap();
        assert_eq!(json["event"], "change_client_room");
        assert!(json["data"].is_null());

        let json =
            serde_json::to_value(ServerEvent::ChangeClientRoom(Some("lobby".into())))
                .unwrap();
        assert_eq!(json["data"], "lobby");
    }

    #[test]
    fn test_server_event_game_result_json_format() {
        let json = serde_json::to_value(ServerEvent::GameResult(GameResult::Win)).unwrap();
        assert_eq!(json["event"], "game_result");
        assert_eq!(json["data"], "win");
    }
}
