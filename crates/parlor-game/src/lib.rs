//! Game core for Parlor.
//!
//! Pure, synchronous state for one game room: the card deck, the
//! player roster, the turn scheduler, and the [`GameRoom`] session that
//! aggregates them. No I/O and no async — operations validate their
//! preconditions, mutate state, and return the events to publish. The
//! room actor in `parlor-room` drives this from its command loop.
//!
//! # Key types
//!
//! - [`GameRoom`] — one room's state machine (lobby → in progress → reset)
//! - [`Deck`] — shuffled draw pile plus discard pile
//! - [`Roster`] — players and their characters, positions, scores
//! - [`TurnOrder`] — the fixed cyclic order once a game starts
//! - [`GameError`] — the non-fatal rejection taxonomy

mod card;
mod config;
mod deck;
mod error;
mod room;
mod roster;
mod turn;

pub use card::{CATALOG, CardSpec, catalog_size};
pub use config::GameConfig;
pub use deck::Deck;
pub use error::GameError;
pub use room::{Events, GameRoom, Phase};
pub use roster::Roster;
pub use turn::TurnOrder;
