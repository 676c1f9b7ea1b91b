//! The room session: roster, turn scheduler, and deck behind one
//! lifecycle.
//!
//! Every mutating operation validates its preconditions, mutates
//! exactly one subsystem, and returns the events to publish. The
//! caller (the room actor) owns fan-out; this module never touches the
//! transport.

use parlor_protocol::{
    CharacterId, ConnectionId, Recipient, RoomId, ServerEvent,
};
use rand::Rng;

use crate::{Deck, GameConfig, GameError, Roster, TurnOrder};

/// Events to publish after a successful operation.
pub type Events = Vec<(Recipient, ServerEvent)>;

/// The lifecycle phase of a room.
///
/// ```text
/// Lobby --startGame (≥ min players)--> InProgress
/// Lobby <--(roster drops below min)--- InProgress
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pre-game: character selection, waiting for the start.
    Lobby,
    /// Turns are active.
    InProgress,
}

impl Phase {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::InProgress => write!(f, "InProgress"),
        }
    }
}

/// One room's complete game state.
pub struct GameRoom {
    password: String,
    config: GameConfig,
    phase: Phase,
    roster: Roster,
    turn: TurnOrder,
    deck: Deck,
}

impl GameRoom {
    /// Creates a room in the lobby with a freshly shuffled deck.
    pub fn new(password: String, config: GameConfig) -> Self {
        let deck = Deck::new(&mut rand::rng());
        Self {
            password,
            config,
            phase: Phase::Lobby,
            roster: Roster::new(),
            turn: TurnOrder::default(),
            deck,
        }
    }

    /// Validates a join attempt's password.
    pub fn check_password(&self, supplied: &str) -> Result<(), GameError> {
        if self.password == supplied {
            Ok(())
        } else {
            Err(GameError::Unauthorized)
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn turn(&self) -> &TurnOrder {
        &self.turn
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The full state snapshot a connection receives when it joins.
    pub fn snapshot(&self, room_id: &RoomId) -> ServerEvent {
        let started = self.phase.is_started();
        ServerEvent::RoomJoined {
            room_id: room_id.clone(),
            players: self.roster.snapshot(),
            game_started: started,
            current_turn: if started { self.turn.current() } else { None },
            taken_chars: self.roster.taken_chars(),
            player_order: started.then(|| self.turn.order().to_vec()),
            deck_count: self.deck.remaining(),
        }
    }

    /// Claims a character for `conn`, creating (or restarting) its
    /// player at the spawn position.
    pub fn select_character(
        &mut self,
        conn: ConnectionId,
        char_id: CharacterId,
    ) -> Result<Events, GameError> {
        if self.phase.is_started() {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.roster.is_taken_by_other(conn, char_id) {
            return Err(GameError::CharacterTaken(char_id));
        }

        self.roster
            .insert(conn, char_id, (self.config.spawn_x, self.config.spawn_y));
        tracing::debug!(%conn, %char_id, "character selected");

        Ok(vec![
            (
                Recipient::All,
                ServerEvent::UpdatePlayers {
                    players: self.roster.snapshot(),
                },
            ),
            (
                Recipient::All,
                ServerEvent::TakenChars {
                    chars: self.roster.taken_chars(),
                },
            ),
        ])
    }

    /// Starts the game: fixes a shuffled turn order and deals a fresh
    /// deck. Any room member may start; only the roster counts.
    pub fn start_game(&mut self) -> Result<Events, GameError> {
        if self.phase.is_started() {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.roster.len() < self.config.min_players {
            return Err(GameError::InsufficientPlayers(self.config.min_players));
        }

        let mut rng = rand::rng();
        self.turn = TurnOrder::start(self.roster.ids(), &mut rng);
        self.deck = Deck::new(&mut rng);
        self.phase = Phase::InProgress;

        // start() on a non-empty roster always yields a holder.
        let current = self.turn.current().ok_or(GameError::GameNotStarted)?;
        tracing::info!(players = self.turn.len(), "game started");

        Ok(vec![
            (
                Recipient::All,
                ServerEvent::GameStarted {
                    player_order: self.turn.order().to_vec(),
                    current_turn: current,
                },
            ),
            (
                Recipient::All,
                ServerEvent::Log {
                    text: "The game has started and the deck is shuffled.".into(),
                },
            ),
        ])
    }

    /// Rolls `dice_count` dice. Turn-gated; mutates nothing.
    pub fn roll_dice(
        &mut self,
        conn: ConnectionId,
        dice_count: u32,
    ) -> Result<Events, GameError> {
        self.require_turn(conn)?;

        let mut rng = rand::rng();
        let details: Vec<u32> = (0..dice_count)
            .map(|_| rng.random_range(1..=self.config.die_sides))
            .collect();
        let roll = details.iter().sum();

        Ok(vec![(
            Recipient::All,
            ServerEvent::DiceRolled {
                player: conn,
                roll,
                details,
            },
        )])
    }

    /// Draws the top card of the deck. Turn-gated; the card moves
    /// directly to the discard pile as its resolution record.
    pub fn draw_card(&mut self, conn: ConnectionId) -> Result<Events, GameError> {
        self.require_turn(conn)?;

        let card = self
            .deck
            .draw(&mut rand::rng())
            .ok_or(GameError::EmptyDeck)?;
        tracing::debug!(%conn, card = %card.name, remaining = self.deck.remaining(), "card drawn");

        Ok(vec![(
            Recipient::All,
            ServerEvent::CardResult {
                player: conn,
                card,
                remaining: self.deck.remaining(),
            },
        )])
    }

    /// Passes the turn to the next player in order.
    pub fn end_turn(&mut self, conn: ConnectionId) -> Result<Events, GameError> {
        self.require_turn(conn)?;

        // Advancing a non-empty order always yields a holder.
        let next = self.turn.advance().ok_or(GameError::GameNotStarted)?;

        Ok(vec![(
            Recipient::All,
            ServerEvent::TurnChanged { current_turn: next },
        )])
    }

    /// Stores a client-reported position verbatim and tells everyone
    /// else. The mover is not echoed back.
    pub fn move_player(
        &mut self,
        conn: ConnectionId,
        x: f64,
        y: f64,
    ) -> Result<Events, GameError> {
        if !self.roster.set_position(conn, x, y) {
            return Err(GameError::NotAPlayer);
        }

        Ok(vec![(
            Recipient::AllExcept(conn),
            ServerEvent::PlayerMoved { id: conn, x, y },
        )])
    }

    /// Adds a signed delta to the sender's score.
    pub fn change_score(
        &mut self,
        conn: ConnectionId,
        delta: i64,
    ) -> Result<Events, GameError> {
        if !self.roster.add_score(conn, delta) {
            return Err(GameError::NotAPlayer);
        }

        Ok(vec![(
            Recipient::All,
            ServerEvent::UpdatePlayers {
                players: self.roster.snapshot(),
            },
        )])
    }

    /// Handles a departed connection: drops its player (if any), prunes
    /// the turn order, and resets the game to the lobby when too few
    /// players remain.
    ///
    /// Infallible: a vanishing connection can't be rejected.
    pub fn remove_connection(&mut self, conn: ConnectionId) -> Events {
        if self.roster.remove(conn).is_none() {
            // An observer left; the roster is untouched.
            return Vec::new();
        }

        let mut events = Vec::new();

        if self.phase.is_started() {
            self.turn.remove(conn);
            if self.roster.len() < self.config.min_players {
                self.phase = Phase::Lobby;
                self.turn.clear();
                tracing::info!(%conn, "player left mid-game, resetting to lobby");
                events.push((
                    Recipient::All,
                    ServerEvent::GameReset {
                        reason: "a player disconnected, the game was reset".into(),
                    },
                ));
            }
        }

        events.push((
            Recipient::All,
            ServerEvent::UpdatePlayers {
                players: self.roster.snapshot(),
            },
        ));
        events.push((
            Recipient::All,
            ServerEvent::TakenChars {
                chars: self.roster.taken_chars(),
            },
        ));
        events
    }

    fn require_turn(&self, conn: ConnectionId) -> Result<(), GameError> {
        if !self.phase.is_started() {
            return Err(GameError::GameNotStarted);
        }
        if !self.turn.holds_turn(conn) {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
