//! Connected-user tracking for the Janken lobby.
//!
//! This crate owns every [`User`] record. Nothing else in the workspace
//! mutates user fields: the room layer only stores connection ids, and the
//! coordinator goes through [`UserRegistry`] for every change.
//!
//! # How it fits in the stack
//!
//! ```text
//! Coordinator (above)  ← keeps users and rooms consistent
//!     ↕
//! User registry (this crate)  ← who is online, in which room, playing whom
//!     ↕
//! Protocol (below)  ← provides ConnectionId, Choice, RoundStatus, views
//! ```

mod error;
mod names;
mod registry;
mod user;

pub use error::UserError;
pub use names::random_name;
pub use registry::UserRegistry;
pub use user::User;
