//! Error types for the game core.

use parlor_protocol::CharacterId;

/// Reasons a room action is rejected.
///
/// All of these are non-fatal: the action is a no-op and the message is
/// surfaced only to the acting connection. Other members of the room
/// never see rejected actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Password mismatch on join.
    #[error("wrong password")]
    Unauthorized,

    /// The character is already claimed by another player.
    #[error("character {0} is already taken")]
    CharacterTaken(CharacterId),

    /// A lobby-only action arrived while the game was running.
    #[error("the game has already started")]
    GameAlreadyStarted,

    /// A turn-scoped action arrived before the game started.
    #[error("the game has not started")]
    GameNotStarted,

    /// A turn-scoped action from a connection that doesn't hold the turn.
    #[error("not your turn")]
    NotYourTurn,

    /// `startGame` with fewer than the minimum number of players.
    #[error("need at least {0} players to start")]
    InsufficientPlayers(usize),

    /// `changeScore` with a non-integer amount.
    #[error("score delta must be an integer")]
    InvalidScoreDelta,

    /// A player-scoped action from a connection with no player.
    #[error("select a character first")]
    NotAPlayer,

    /// `drawCard` against a deck with no cards at all.
    #[error("the deck has no cards")]
    EmptyDeck,
}
