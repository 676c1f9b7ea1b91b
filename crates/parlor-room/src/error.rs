//! Error types for the room layer.

use parlor_game::GameError;
use parlor_protocol::{ConnectionId, RoomId};

/// Errors that can occur during room registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// `createRoom` targeted a taken room id.
    #[error("room {0} already exists")]
    AlreadyExists(RoomId),

    /// `joinRoom` targeted an unknown room id.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The connection is already a member of a room.
    #[error("{0} is already in a room")]
    AlreadyInRoom(ConnectionId),

    /// A room-scoped action from a connection that is in no room.
    #[error("{0} is not in any room")]
    NotInRoom(ConnectionId),

    /// The room's command channel is closed or full.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// A rejection from the game core (wrong password on join).
    #[error(transparent)]
    Game(#[from] GameError),
}
