//! Room types.

use serde::{Deserialize, Serialize};

/// What kind of room this is and how many users fit in it.
///
/// The only game played today is janken (rock-paper-scissors) between two
/// players, so [`RoomType::janken`] is also the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    /// Type name shown in the room list.
    pub name: String,

    /// Maximum members allowed in the room.
    pub max_capacity: usize,
}

impl RoomType {
    pub fn new(name: impl Into<String>, max_capacity: usize) -> Self {
        Self {
            name: name.into(),
            max_capacity,
        }
    }

    /// A two-player rock-paper-scissors room.
    pub fn janken() -> Self {
        Self::new("janken", 2)
    }
}

impl Default for RoomType {
    fn default() -> Self {
        Self::janken()
    }
}
