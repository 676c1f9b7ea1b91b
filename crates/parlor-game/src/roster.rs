//! The set of players in a room.

use parlor_protocol::{CharacterId, ConnectionId, Player, RosterSnapshot};

/// Players keyed by connection id.
///
/// A connection becomes a player by selecting a character and stops
/// being one when it disconnects. Uniqueness of characters across the
/// roster is the invariant enforced here.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: RosterSnapshot,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `char_id` is held by a connection other than `conn`.
    pub fn is_taken_by_other(&self, conn: ConnectionId, char_id: CharacterId) -> bool {
        self.players
            .values()
            .any(|p| p.char_id == char_id && p.id != conn)
    }

    /// Creates or overwrites the player entry for `conn` at the spawn
    /// position with a zeroed score. The caller checks uniqueness first.
    pub fn insert(&mut self, conn: ConnectionId, char_id: CharacterId, spawn: (f64, f64)) {
        self.players.insert(
            conn,
            Player {
                id: conn,
                char_id,
                x: spawn.0,
                y: spawn.1,
                score: 0,
            },
        );
    }

    /// Removes the player for `conn`, if there is one.
    pub fn remove(&mut self, conn: ConnectionId) -> Option<Player> {
        self.players.remove(&conn)
    }

    pub fn contains(&self, conn: ConnectionId) -> bool {
        self.players.contains_key(&conn)
    }

    pub fn get(&self, conn: ConnectionId) -> Option<&Player> {
        self.players.get(&conn)
    }

    /// Updates a player's position. Returns `false` for non-players.
    pub fn set_position(&mut self, conn: ConnectionId, x: f64, y: f64) -> bool {
        match self.players.get_mut(&conn) {
            Some(player) => {
                player.x = x;
                player.y = y;
                true
            }
            None => false,
        }
    }

    /// Adds a signed delta to a player's score. Returns `false` for
    /// non-players.
    pub fn add_score(&mut self, conn: ConnectionId, delta: i64) -> bool {
        match self.players.get_mut(&conn) {
            Some(player) => {
                player.score += delta;
                true
            }
            None => false,
        }
    }

    /// All claimed character ids.
    pub fn taken_chars(&self) -> Vec<CharacterId> {
        self.players.values().map(|p| p.char_id).collect()
    }

    /// All player connection ids.
    pub fn ids(&self) -> Vec<ConnectionId> {
        self.players.keys().copied().collect()
    }

    /// A full copy of the roster for broadcasting.
    pub fn snapshot(&self) -> RosterSnapshot {
        self.players.clone()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(id: u64) -> ConnectionId {
        ConnectionId(id)
    }

    fn ch(id: u32) -> CharacterId {
        CharacterId(id)
    }

    #[test]
    fn test_insert_creates_player_at_spawn_with_zero_score() {
        let mut roster = Roster::new();
        roster.insert(cid(1), ch(4), (850.0, 850.0));

        let player = roster.get(cid(1)).unwrap();
        assert_eq!(player.char_id, ch(4));
        assert_eq!((player.x, player.y), (850.0, 850.0));
        assert_eq!(player.score, 0);
    }

    #[test]
    fn test_insert_overwrites_resets_position_and_score() {
        let mut roster = Roster::new();
        roster.insert(cid(1), ch(4), (850.0, 850.0));
        roster.set_position(cid(1), 10.0, 20.0);
        roster.add_score(cid(1), 7);

        // Re-selecting a character starts the player over.
        roster.insert(cid(1), ch(5), (850.0, 850.0));

        let player = roster.get(cid(1)).unwrap();
        assert_eq!(player.char_id, ch(5));
        assert_eq!((player.x, player.y), (850.0, 850.0));
        assert_eq!(player.score, 0);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_is_taken_by_other_ignores_own_claim() {
        let mut roster = Roster::new();
        roster.insert(cid(1), ch(4), (0.0, 0.0));

        assert!(roster.is_taken_by_other(cid(2), ch(4)));
        assert!(!roster.is_taken_by_other(cid(1), ch(4)));
        assert!(!roster.is_taken_by_other(cid(2), ch(5)));
    }

    #[test]
    fn test_set_position_rejects_non_players() {
        let mut roster = Roster::new();
        assert!(!roster.set_position(cid(1), 5.0, 5.0));

        roster.insert(cid(1), ch(1), (0.0, 0.0));
        assert!(roster.set_position(cid(1), 5.0, 5.0));
        let p = roster.get(cid(1)).unwrap();
        assert_eq!((p.x, p.y), (5.0, 5.0));
    }

    #[test]
    fn test_add_score_may_go_negative() {
        let mut roster = Roster::new();
        roster.insert(cid(1), ch(1), (0.0, 0.0));

        assert!(roster.add_score(cid(1), -3));
        assert_eq!(roster.get(cid(1)).unwrap().score, -3);

        assert!(roster.add_score(cid(1), 10));
        assert_eq!(roster.get(cid(1)).unwrap().score, 7);
    }

    #[test]
    fn test_taken_chars_lists_every_claim() {
        let mut roster = Roster::new();
        roster.insert(cid(1), ch(4), (0.0, 0.0));
        roster.insert(cid(2), ch(9), (0.0, 0.0));

        let mut taken = roster.taken_chars();
        taken.sort();
        assert_eq!(taken, vec![ch(4), ch(9)]);
    }

    #[test]
    fn test_remove_returns_the_player() {
        let mut roster = Roster::new();
        roster.insert(cid(1), ch(4), (0.0, 0.0));

        let removed = roster.remove(cid(1)).unwrap();
        assert_eq!(removed.char_id, ch(4));
        assert!(roster.is_empty());
        assert!(roster.remove(cid(1)).is_none());
    }
}
