use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::{Rank, full_shoe};

/// Single 52-card shoe that refills itself with a freshly shuffled set once it
/// runs dry. Cards are drawn from the back of the internal sequence.
#[derive(Clone, Debug)]
pub struct Shoe<R: Rng> {
    cards: Vec<Rank>,
    rng: R,
}

impl<R: Rng> Shoe<R> {
    /// Fresh shuffled shoe.
    pub fn new(mut rng: R) -> Self {
        let mut cards = full_shoe();
        cards.shuffle(&mut rng);
        Self { cards, rng }
    }

    /// Shoe with a fixed draw order; the last element is drawn first. Refills
    /// after exhaustion are shuffled with `rng`.
    pub fn from_cards(cards: Vec<Rank>, rng: R) -> Self {
        Self { cards, rng }
    }

    pub fn draw(&mut self) -> Rank {
        if let Some(card) = self.cards.pop() {
            return card;
        }
        self.refill();
        self.cards.pop().expect("a refilled shoe is never empty")
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn refill(&mut self) {
        self.cards = full_shoe();
        self.cards.shuffle(&mut self.rng);
    }
}
