//! Game configuration.

use serde::{Deserialize, Serialize};

/// Settings shared by every room on a server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Default spawn position for newly created players.
    pub spawn_x: f64,
    pub spawn_y: f64,

    /// Minimum players required to start a game. A game in progress
    /// resets to the lobby when the roster drops below this.
    pub min_players: usize,

    /// Number of faces per die.
    pub die_sides: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_x: 850.0,
            spawn_y: 850.0,
            min_players: 2,
            die_sides: 6,
        }
    }
}
