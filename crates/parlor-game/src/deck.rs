//! The draw pile and discard pile.

use parlor_protocol::Card;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::CATALOG;

/// An ordered, shuffled deck of cards plus its discard pile.
///
/// Draws come off the end of the draw pile (LIFO). A drawn card goes
/// straight onto the discard pile — the discard doubles as the record
/// of resolved cards, and is the source for reshuffling once the draw
/// pile runs dry.
///
/// Conservation invariant: `remaining() + discarded()` always equals
/// [`catalog_size`](crate::card::catalog_size) between calls.
#[derive(Debug, Clone)]
pub struct Deck {
    draw: Vec<Card>,
    discard: Vec<Card>,
}

impl Deck {
    /// Builds a freshly shuffled deck from the catalog, with an empty
    /// discard pile.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut draw = expand_catalog();
        draw.shuffle(rng);
        Self {
            draw,
            discard: Vec::new(),
        }
    }

    /// Draws the top card and records it on the discard pile.
    ///
    /// If the draw pile is empty, the discard pile is reshuffled into
    /// a new draw pile first. If both piles are somehow empty, the
    /// deck is rebuilt from the catalog. `None` only if the catalog
    /// itself holds no cards.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.draw.is_empty() {
            if self.discard.is_empty() {
                tracing::warn!("deck and discard both empty, rebuilding from catalog");
                self.draw = expand_catalog();
            } else {
                tracing::debug!(
                    discarded = self.discard.len(),
                    "draw pile empty, reshuffling discard"
                );
                self.draw = std::mem::take(&mut self.discard);
            }
            self.draw.shuffle(rng);
        }

        let card = self.draw.pop()?;
        self.discard.push(card.clone());
        Some(card)
    }

    /// Cards left in the draw pile.
    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    /// Cards in the discard pile.
    pub fn discarded(&self) -> usize {
        self.discard.len()
    }
}

fn expand_catalog() -> Vec<Card> {
    CATALOG
        .iter()
        .flat_map(|spec| std::iter::repeat_with(|| spec.to_card()).take(spec.count))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::card::catalog_size;

    /// Multiset of card names, for permutation comparisons.
    fn name_counts(cards: &[Card]) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for card in cards {
            *counts.entry(card.name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_new_deck_is_a_permutation_of_the_catalog() {
        let deck = Deck::new(&mut rand::rng());
        assert_eq!(deck.remaining(), catalog_size());
        assert_eq!(deck.discarded(), 0);

        let expected: BTreeMap<&str, usize> = CATALOG
            .iter()
            .map(|spec| (spec.name, spec.count))
            .collect();
        assert_eq!(name_counts(&deck.draw), expected);
    }

    #[test]
    fn test_draw_moves_card_to_discard() {
        let mut rng = rand::rng();
        let mut deck = Deck::new(&mut rng);

        let card = deck.draw(&mut rng).unwrap();

        assert_eq!(deck.remaining(), catalog_size() - 1);
        assert_eq!(deck.discarded(), 1);
        assert_eq!(deck.discard.last().map(|c| c.name.as_str()), Some(card.name.as_str()));
    }

    #[test]
    fn test_conservation_holds_through_every_draw() {
        let mut rng = rand::rng();
        let mut deck = Deck::new(&mut rng);

        // Draw well past one full catalog to cross the reshuffle.
        for _ in 0..(catalog_size() * 3) {
            deck.draw(&mut rng).unwrap();
            assert_eq!(deck.remaining() + deck.discarded(), catalog_size());
        }
    }

    #[test]
    fn test_draw_when_empty_reshuffles_discard() {
        let mut rng = rand::rng();
        let mut deck = Deck::new(&mut rng);

        for _ in 0..catalog_size() {
            deck.draw(&mut rng).unwrap();
        }
        assert_eq!(deck.remaining(), 0);
        assert_eq!(deck.discarded(), catalog_size());

        // The next draw flips the discard back into the draw pile.
        deck.draw(&mut rng).unwrap();
        assert_eq!(deck.remaining(), catalog_size() - 1);
        assert_eq!(deck.discarded(), 1);
    }

    #[test]
    fn test_draw_recovers_when_both_piles_are_empty() {
        let mut rng = rand::rng();
        let mut deck = Deck {
            draw: Vec::new(),
            discard: Vec::new(),
        };

        let card = deck.draw(&mut rng).unwrap();

        assert!(!card.name.is_empty());
        assert_eq!(deck.remaining() + deck.discarded(), catalog_size());
    }

    #[test]
    fn test_reshuffle_preserves_the_multiset() {
        let mut rng = rand::rng();
        let mut deck = Deck::new(&mut rng);

        let mut seen = Vec::new();
        // Two full passes: every card must appear exactly twice.
        for _ in 0..(catalog_size() * 2) {
            seen.push(deck.draw(&mut rng).unwrap());
        }

        let expected: BTreeMap<&str, usize> = CATALOG
            .iter()
            .map(|spec| (spec.name, spec.count * 2))
            .collect();
        assert_eq!(name_counts(&seen), expected);
    }
}
