// The 40-card deck. Reshuffled at the start of every hand; cards are drawn
// front to back without replacement.

use crate::error::GameError;
use crate::types::{Card, CARD_SUITS, CARD_VALUES};

use rand::seq::SliceRandom;
use rand::Rng;

pub const DECK_SIZE: usize = 40;

pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in CARD_SUITS {
            for value in CARD_VALUES {
                cards.push(Card::new(value, suit));
            }
        }

        Deck { cards, cursor: 0 }
    }

    // Produces a fresh uniformly random permutation and resets the draw
    // cursor.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    // Seedable variant for deterministic tests.
    pub fn shuffle_with<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.cursor = 0;
    }

    // Transfers ownership of the next undrawn card to the caller.
    pub fn take_card(&mut self) -> Result<Card, GameError> {
        let card = self.cards.get(self.cursor).ok_or(GameError::DeckExhausted)?;
        self.cursor += 1;
        Ok(*card)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_draw_is_unique_until_exhaustion() {
        let mut deck = Deck::new();
        deck.shuffle();

        let mut seen = HashSet::new();
        for _ in 0..DECK_SIZE {
            let card = deck.take_card().unwrap();
            assert!(seen.insert((card.value, card.suit)), "duplicate card drawn");
        }

        assert!(matches!(deck.take_card(), Err(GameError::DeckExhausted)));
    }

    #[test]
    fn shuffling_resets_the_cursor() {
        let mut deck = Deck::new();
        deck.shuffle();
        for _ in 0..13 {
            deck.take_card().unwrap();
        }

        deck.shuffle();
        for _ in 0..DECK_SIZE {
            deck.take_card().unwrap();
        }
    }

    #[test]
    fn freshly_drawn_cards_are_face_up() {
        let mut deck = Deck::new();
        deck.shuffle();
        assert!(!deck.take_card().unwrap().hidden);
    }
}
