//! Room actor: an isolated Tokio task that owns one room's state.
//!
//! Each room runs in its own task and is mutated only through its
//! command channel, which serializes actions: a precondition check and
//! the mutation it guards can never interleave with another action on
//! the same room. Different rooms share nothing and proceed
//! independently. This is the actor model standing in for a per-room
//! lock.

use std::collections::HashMap;

use parlor_game::{GameConfig, GameError, GameRoom, Phase};
use parlor_protocol::{ClientEvent, ConnectionId, Recipient, RoomId, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::RegistryError;

/// Channel sender that delivers server events to one connection.
///
/// Unbounded and fire-and-forget: the publish side never waits on a
/// slow client, and a closed receiver just drops the event.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Add a connection to the room's membership (password-checked).
    Join {
        conn: ConnectionId,
        password: String,
        sender: EventSender,
        reply: oneshot::Sender<Result<(), RegistryError>>,
    },

    /// Remove a connection. Replies with the remaining membership
    /// count so the registry can destroy emptied rooms.
    Leave {
        conn: ConnectionId,
        reply: oneshot::Sender<usize>,
    },

    /// A room-scoped action from a member connection.
    Action { conn: ConnectionId, event: ClientEvent },

    /// Request room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },

    /// Shut down the room.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: Phase,
    /// Connections in the room, players or not.
    pub connections: usize,
    /// Players (connections that selected a character).
    pub players: usize,
    /// Cards left in the draw pile.
    pub deck_remaining: usize,
}

/// Handle to a running room actor. Cheap to clone; the registry holds
/// one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Asks the room to admit a connection.
    pub async fn join(
        &self,
        conn: ConnectionId,
        password: String,
        sender: EventSender,
    ) -> Result<(), RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                conn,
                password,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))?
    }

    /// Removes a connection; returns how many remain.
    pub async fn leave(&self, conn: ConnectionId) -> Result<usize, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                conn,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))
    }

    /// Delivers a room-scoped action (fire-and-forget).
    pub async fn send_action(
        &self,
        conn: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RegistryError> {
        self.sender
            .send(RoomCommand::Action { conn, event })
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))
    }

    /// Requests current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    game: GameRoom,
    /// Per-connection outbound channels: the room's membership.
    senders: HashMap<ConnectionId, EventSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    conn,
                    password,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(conn, &password, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { conn, reply } => {
                    self.handle_leave(conn);
                    let _ = reply.send(self.senders.len());
                }
                RoomCommand::Action { conn, event } => {
                    self.handle_action(conn, event);
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        conn: ConnectionId,
        password: &str,
        sender: EventSender,
    ) -> Result<(), RegistryError> {
        if self.senders.contains_key(&conn) {
            return Err(RegistryError::AlreadyInRoom(conn));
        }
        self.game.check_password(password)?;

        // Full state snapshot for the newcomer; nobody else is told
        // until the connection becomes a player.
        let snapshot = self.game.snapshot(&self.room_id);
        let _ = sender.send(snapshot);
        self.senders.insert(conn, sender);

        tracing::info!(
            room_id = %self.room_id,
            %conn,
            connections = self.senders.len(),
            "connection joined"
        );
        Ok(())
    }

    fn handle_leave(&mut self, conn: ConnectionId) {
        if self.senders.remove(&conn).is_none() {
            return;
        }
        tracing::info!(
            room_id = %self.room_id,
            %conn,
            connections = self.senders.len(),
            "connection left"
        );

        let events = self.game.remove_connection(conn);
        self.dispatch(events);
    }

    fn handle_action(&mut self, conn: ConnectionId, event: ClientEvent) {
        if !self.senders.contains_key(&conn) {
            tracing::warn!(
                room_id = %self.room_id,
                %conn,
                "action from non-member, ignoring"
            );
            return;
        }

        let result = match event {
            ClientEvent::SelectCharacter { char_id } => {
                self.game.select_character(conn, char_id)
            }
            ClientEvent::StartGame => self.game.start_game(),
            ClientEvent::RollDice { dice_count } => self.game.roll_dice(conn, dice_count),
            ClientEvent::DrawCard => self.game.draw_card(conn),
            ClientEvent::EndTurn => self.game.end_turn(conn),
            ClientEvent::MovePlayer { x, y } => self.game.move_player(conn, x, y),
            ClientEvent::ChangeScore { amount } => match amount.as_i64() {
                Some(delta) => self.game.change_score(conn, delta),
                None => Err(GameError::InvalidScoreDelta),
            },
            ClientEvent::CreateRoom { .. } | ClientEvent::JoinRoom { .. } => {
                // Routed by the registry; they never reach an actor.
                tracing::debug!(room_id = %self.room_id, %conn, "room management event inside a room, ignoring");
                return;
            }
        };

        match result {
            Ok(events) => self.dispatch(events),
            Err(err) => {
                tracing::debug!(
                    room_id = %self.room_id,
                    %conn,
                    %err,
                    "action rejected"
                );
                self.send_to(
                    conn,
                    ServerEvent::Error {
                        message: err.to_string(),
                    },
                );
            }
        }
    }

    /// Resolves recipients and fans events out to member connections.
    fn dispatch(&self, events: Vec<(Recipient, ServerEvent)>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::To(conn) => {
                    self.send_to(conn, event);
                }
                Recipient::AllExcept(excluded) => {
                    for (conn, sender) in &self.senders {
                        if *conn != excluded {
                            let _ = sender.send(event.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends an event to a single connection. Silently drops if the
    /// receiver is gone.
    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&conn) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id.clone(),
            phase: self.game.phase(),
            connections: self.senders.len(),
            players: self.game.roster().len(),
            deck_remaining: self.game.deck().remaining(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    room_id: RoomId,
    password: String,
    config: GameConfig,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room_id: room_id.clone(),
        game: GameRoom::new(password, config),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
