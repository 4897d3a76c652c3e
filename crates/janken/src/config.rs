//! Lobby configuration.

use janken_room::RoomType;

/// Tunables for the lobby coordinator.
///
/// Passed in once at construction; the coordinator never reads global
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyConfig {
    /// Room type used for rooms created over the wire.
    pub default_room_type: RoomType,

    /// Longest accepted room name, in characters.
    pub max_room_name_len: usize,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            default_room_type: RoomType::janken(),
            max_room_name_len: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_two_player_rooms() {
        let config = LobbyConfig::default();
        assert_eq!(config.default_room_type.max_capacity, 2);
        assert_eq!(config.max_room_name_len, 32);
    }
}
