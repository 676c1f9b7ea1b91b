//! Room hosting for parlor.
//!
//! Each room runs as its own Tokio task owning a
//! [`parlor_game::GameRoom`] and the outbound senders of every
//! connection in the room. Commands arrive over a bounded mpsc
//! channel, so everything that can touch a room's state is processed
//! one at a time in arrival order.
//!
//! The [`RoomRegistry`] sits in front of the actors: it creates rooms,
//! tracks which room each connection is in, routes actions, and tears
//! a room down once its last connection leaves.

mod actor;
mod error;
mod registry;

pub use actor::{EventSender, RoomHandle, RoomInfo};
pub use error::RegistryError;
pub use registry::RoomRegistry;
