//! Room management and round resolution for the Janken lobby.
//!
//! Rooms are plain records owned by the [`RoomRegistry`]. They hold
//! connection ids, never user records, so nothing in this crate can change
//! a user's state.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates/deletes rooms, tracks membership
//! - [`Room`] — one named, capacity-bounded room
//! - [`RoomType`] — room kind and its capacity
//! - [`resolve`] — decides a round from two hands

mod config;
mod error;
mod registry;
mod resolver;
mod room;

pub use config::RoomType;
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use resolver::{Outcome, resolve};
pub use room::Room;
