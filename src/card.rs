use std::fmt;

use serde::{Deserialize, Serialize};

/// Rank of a blackjack card. Suits are not tracked; face cards count as ten and
/// an ace is stored as eleven.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Rank(u8);

pub const MIN_RANK: u8 = 2;
pub const TEN: u8 = 10;
pub const ACE: u8 = 11;
pub const SUITS: usize = 4;
pub const SHOE_SIZE: usize = 52;
pub const BLACKJACK: u8 = 21;
pub const DEALER_STANDS_ON: u8 = 17;

impl Rank {
    pub const ACE: Rank = Rank(ACE);
    pub const TEN: Rank = Rank(TEN);

    /// Returns `None` when the value lies outside `2..=11`.
    pub fn new(value: u8) -> Option<Self> {
        (MIN_RANK..=ACE).contains(&value).then_some(Self(value))
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_ace(self) -> bool {
        self.0 == ACE
    }

    /// Every distinct rank, low to high.
    pub fn all() -> impl Iterator<Item = Rank> {
        (MIN_RANK..=ACE).map(Rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ace() {
            f.write_str("A")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Builds the 52-card set in deterministic order (unshuffled).
pub fn full_shoe() -> Vec<Rank> {
    let mut cards = Vec::with_capacity(SHOE_SIZE);
    for _ in 0..SUITS {
        for value in MIN_RANK..=TEN {
            cards.push(Rank(value));
        }
        // jack, queen, king
        cards.extend(std::iter::repeat(Rank::TEN).take(3));
        cards.push(Rank::ACE);
    }
    cards
}

pub(crate) fn format_cards(cards: &[Rank]) -> String {
    let parts: Vec<String> = cards.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}
