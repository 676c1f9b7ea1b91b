//! Wire types for the Parlor protocol.
//!
//! Every message on the wire is a single JSON object tagged by an
//! `"event"` field, mirroring the event-name/payload shape that
//! real-time board-game clients expect. Inbound events that fail to
//! deserialize never reach the game core — the handler answers with
//! an `err` event instead.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connection.
///
/// Player identity is connection-derived: a connection and the player
/// it may control share this id. Allocated from a process-wide counter
/// when the socket is accepted.
///
/// `#[serde(transparent)]` makes `ConnectionId(42)` serialize as the
/// plain number `42`, which also lets it act as a JSON map key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A room's unique key, chosen by the creating client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An avatar identifier. At most one player per room may hold a given
/// character at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "char-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// An immutable card. Produced only by deck initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Display name.
    pub name: String,
    /// Effect description, resolved by the players at the table.
    pub desc: String,
    /// Display color (hex string) for client rendering.
    pub color: String,
}

/// A player in a room: created on character selection, removed on
/// disconnect. Position and score are client-reported and trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: ConnectionId,
    pub char_id: CharacterId,
    pub x: f64,
    pub y: f64,
    pub score: i64,
}

/// A roster snapshot, keyed by connection id.
///
/// `BTreeMap` keeps snapshot serialization deterministic.
pub type RosterSnapshot = BTreeMap<ConnectionId, Player>;

// ---------------------------------------------------------------------------
// Recipient — who should receive an outbound event?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// The game core returns `(Recipient, ServerEvent)` pairs and never
/// touches the transport; the room actor resolves recipients against
/// its connection senders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connection in the room.
    All,
    /// One specific connection.
    To(ConnectionId),
    /// Everyone except the given connection (e.g. the mover in a
    /// position update, who already knows where they are).
    AllExcept(ConnectionId),
}

// ---------------------------------------------------------------------------
// Client → server events
// ---------------------------------------------------------------------------

/// Events clients send to the server.
///
/// `#[serde(tag = "event")]` produces internally tagged JSON:
/// `{ "event": "createRoom", "roomId": "R1", "password": "p" }`.
/// An unknown event name or a malformed payload fails deserialization,
/// which the handler reports as an invalid payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Create a room and join it. Fails if the id is taken.
    CreateRoom { room_id: RoomId, password: String },

    /// Join an existing room. The password must match.
    JoinRoom { room_id: RoomId, password: String },

    /// Claim a character while the room is in the lobby.
    SelectCharacter { char_id: CharacterId },

    /// Start the game. Requires at least two players.
    StartGame,

    /// Roll `dice_count` six-sided dice. Turn-gated, not turn-consuming.
    RollDice { dice_count: u32 },

    /// Draw the top card of the deck. Turn-gated.
    DrawCard,

    /// Report a new board position. Membership-gated, not validated.
    MovePlayer { x: f64, y: f64 },

    /// Add a signed delta to the sender's score.
    ///
    /// The payload is raw JSON so that a non-integer amount surfaces
    /// as an `InvalidScoreDelta` game error rather than a decode
    /// failure.
    ChangeScore { amount: serde_json::Value },

    /// Pass the turn to the next player in order.
    EndTurn,
}

// ---------------------------------------------------------------------------
// Server → client events
// ---------------------------------------------------------------------------

/// Events the server sends to clients. Same tagging as [`ClientEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Full room snapshot, sent to a connection when it joins.
    RoomJoined {
        room_id: RoomId,
        players: RosterSnapshot,
        game_started: bool,
        /// Current turn holder, present only once the game has started.
        current_turn: Option<ConnectionId>,
        taken_chars: Vec<CharacterId>,
        /// Turn order, present only once the game has started.
        player_order: Option<Vec<ConnectionId>>,
        /// Cards remaining in the draw pile.
        deck_count: usize,
    },

    /// The full roster, broadcast after any roster change.
    UpdatePlayers { players: RosterSnapshot },

    /// The set of claimed character ids.
    TakenChars { chars: Vec<CharacterId> },

    /// The game has started: fixed turn order and the first holder.
    GameStarted {
        player_order: Vec<ConnectionId>,
        current_turn: ConnectionId,
    },

    /// A human-readable log line for the room's event feed.
    Log { text: String },

    /// A dice roll result: the total and each individual die.
    DiceRolled {
        player: ConnectionId,
        roll: u32,
        details: Vec<u32>,
    },

    /// A drawn card and the deck size after the draw.
    CardResult {
        player: ConnectionId,
        card: Card,
        remaining: usize,
    },

    /// The turn has passed to a new holder.
    TurnChanged { current_turn: ConnectionId },

    /// A player moved. Sent to everyone except the mover.
    PlayerMoved { id: ConnectionId, x: f64, y: f64 },

    /// The game dropped back to the lobby (players fell below two).
    GameReset { reason: String },

    /// An action was rejected. Sent only to the acting connection.
    #[serde(rename = "err")]
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
