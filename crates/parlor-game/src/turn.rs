//! Cyclic turn scheduling over a room's players.

use parlor_protocol::ConnectionId;
use rand::Rng;
use rand::seq::SliceRandom;

/// The fixed turn order for a game in progress.
///
/// Set once at game start as a shuffled permutation of the roster; only
/// ever shortened afterwards (disconnects). While non-empty, `current`
/// always indexes a present entry.
#[derive(Debug, Clone, Default)]
pub struct TurnOrder {
    order: Vec<ConnectionId>,
    current: usize,
}

impl TurnOrder {
    /// Shuffles `ids` into a fresh order with the first entry to act.
    pub fn start<R: Rng + ?Sized>(mut ids: Vec<ConnectionId>, rng: &mut R) -> Self {
        ids.shuffle(rng);
        Self {
            order: ids,
            current: 0,
        }
    }

    /// The connection whose turn it is, if any order is set.
    pub fn current(&self) -> Option<ConnectionId> {
        self.order.get(self.current).copied()
    }

    /// Whether `id` holds the turn right now.
    pub fn holds_turn(&self, id: ConnectionId) -> bool {
        self.current() == Some(id)
    }

    /// Advances to the next entry, wrapping past the end. Returns the
    /// new holder.
    pub fn advance(&mut self) -> Option<ConnectionId> {
        if self.order.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.order.len();
        self.current()
    }

    /// Removes `id` from the order, then clamps the current index back
    /// into range via modulo.
    ///
    /// When the current holder is removed, the turn falls to whoever
    /// now occupies that index (their successor); removing the last
    /// entry while it held the turn wraps to the front.
    pub fn remove(&mut self, id: ConnectionId) {
        let Some(pos) = self.order.iter().position(|entry| *entry == id) else {
            return;
        };
        self.order.remove(pos);
        if self.order.is_empty() {
            self.current = 0;
        } else {
            self.current %= self.order.len();
        }
    }

    /// The full order, first-to-act onward.
    pub fn order(&self) -> &[ConnectionId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drops the order entirely (reset to lobby).
    pub fn clear(&mut self) {
        self.order.clear();
        self.current = 0;
    }
}
