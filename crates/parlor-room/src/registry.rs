//! Room registry: process-wide map from room id to room actor.
//!
//! The registry also owns the explicit connection → room index. A
//! connection is in at most one room; the index is written on join and
//! cleared on disconnect, replacing any notion of per-socket session
//! state.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use parlor_game::GameConfig;
use parlor_protocol::{ClientEvent, ConnectionId, RoomId};

use crate::actor::spawn_room;
use crate::{EventSender, RegistryError, RoomHandle, RoomInfo};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// The maps the registry guards: active rooms and which room each
/// connection is in.
struct Index {
    rooms: HashMap<RoomId, RoomHandle>,
    conn_rooms: HashMap<ConnectionId, RoomId>,
}

/// Creates, looks up, and destroys rooms, and routes connections to
/// them.
///
/// The maps live behind a plain `std::sync::Mutex` that is locked only
/// for lookups and index updates and is never held across an await.
/// Every wait on a room actor (joins, actions, shutdowns) happens with
/// a cloned `RoomHandle` after the guard is dropped, so a busy room
/// cannot stall traffic to any other room.
pub struct RoomRegistry {
    index: Mutex<Index>,

    /// Game settings applied to every new room.
    config: GameConfig,
}

impl RoomRegistry {
    pub fn new(config: GameConfig) -> Self {
        Self {
            index: Mutex::new(Index {
                rooms: HashMap::new(),
                conn_rooms: HashMap::new(),
            }),
            config,
        }
    }

    /// Locks the index. A poisoned lock is taken anyway: the maps hold
    /// only handles and ids, which cannot be left half-updated.
    fn index(&self) -> MutexGuard<'_, Index> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a room and joins the creator to it.
    ///
    /// Fails with [`RegistryError::AlreadyExists`] when the id is
    /// taken; the creator's password trivially matches.
    pub async fn create_room(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
        password: String,
        sender: EventSender,
    ) -> Result<(), RegistryError> {
        let handle = {
            let mut index = self.index();
            if index.conn_rooms.contains_key(&conn) {
                return Err(RegistryError::AlreadyInRoom(conn));
            }
            if index.rooms.contains_key(&room_id) {
                return Err(RegistryError::AlreadyExists(room_id));
            }

            let handle = spawn_room(
                room_id.clone(),
                password.clone(),
                self.config.clone(),
                DEFAULT_CHANNEL_SIZE,
            );
            index.rooms.insert(room_id.clone(), handle.clone());
            index.conn_rooms.insert(conn, room_id.clone());
            handle
        };

        // The actor was just spawned with an empty channel; nothing in
        // front of this join.
        if let Err(e) = handle.join(conn, password, sender).await {
            let mut index = self.index();
            index.conn_rooms.remove(&conn);
            index.rooms.remove(&room_id);
            return Err(e);
        }

        tracing::info!(%room_id, %conn, "room created");
        Ok(())
    }

    /// Joins a connection to an existing room.
    ///
    /// Fails with [`RegistryError::NotFound`] for unknown ids and
    /// surfaces the game core's `Unauthorized` on a password mismatch.
    pub async fn join_room(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
        password: String,
        sender: EventSender,
    ) -> Result<(), RegistryError> {
        let handle = {
            let index = self.index();
            if index.conn_rooms.contains_key(&conn) {
                return Err(RegistryError::AlreadyInRoom(conn));
            }
            index
                .rooms
                .get(&room_id)
                .cloned()
                .ok_or_else(|| RegistryError::NotFound(room_id.clone()))?
        };

        handle.join(conn, password, sender).await?;

        // Commit the index only if the room survived the await; one
        // destroyed in between undoes the join.
        let committed = {
            let mut index = self.index();
            if index.rooms.contains_key(&room_id) {
                index.conn_rooms.insert(conn, room_id.clone());
                true
            } else {
                false
            }
        };
        if !committed {
            let _ = handle.leave(conn).await;
            return Err(RegistryError::NotFound(room_id));
        }
        Ok(())
    }

    /// Routes a room-scoped action to the sender's room.
    pub async fn route(
        &self,
        conn: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RegistryError> {
        let handle = self.handle_for(conn)?;
        handle.send_action(conn, event).await
    }

    /// The handle of the room a connection is in. Lock-scope: lookup
    /// only.
    fn handle_for(&self, conn: ConnectionId) -> Result<RoomHandle, RegistryError> {
        let index = self.index();
        let room_id = index
            .conn_rooms
            .get(&conn)
            .ok_or(RegistryError::NotInRoom(conn))?;
        index
            .rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(room_id.clone()))
    }

    /// Handles a dropped connection: leaves its room (triggering the
    /// in-game disconnect path) and destroys the room if it emptied.
    ///
    /// A connection that was in no room is a no-op.
    pub async fn disconnect(&self, conn: ConnectionId) {
        let handle = {
            let mut index = self.index();
            let Some(room_id) = index.conn_rooms.remove(&conn) else {
                return;
            };
            let Some(handle) = index.rooms.get(&room_id).cloned() else {
                return;
            };
            handle
        };

        // An unavailable actor counts as empty: the room is dead
        // either way.
        let remaining = handle.leave(conn).await.unwrap_or(0);
        if remaining == 0 {
            let doomed = {
                let mut index = self.index();
                // A join that committed during the leave keeps the
                // room alive.
                if index
                    .conn_rooms
                    .values()
                    .any(|room_id| room_id == handle.room_id())
                {
                    None
                } else {
                    index.rooms.remove(handle.room_id())
                }
            };
            if let Some(doomed) = doomed {
                let _ = doomed.shutdown().await;
                tracing::info!(room_id = %doomed.room_id(), "room destroyed");
            }
        }
    }

    /// Returns metadata for a room.
    pub async fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RegistryError> {
        let handle = self
            .index()
            .rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(room_id.clone()))?;
        handle.info().await
    }

    /// The room a connection is currently in, if any.
    pub fn connection_room(&self, conn: ConnectionId) -> Option<RoomId> {
        self.index().conn_rooms.get(&conn).cloned()
    }

    /// Number of active rooms.
    pub fn room_count(&self) -> usize {
        self.index().rooms.len()
    }
}
