//! Hand totals with soft-ace adjustment.

use crate::card::{BLACKJACK, Rank};

/// Sum of the hand after demoting aces (11 → 1) one at a time while the total
/// exceeds 21.
pub fn hand_total(hand: &[Rank]) -> u8 {
    evaluate(hand).0
}

/// True when at least one ace is still counted as 11 in the adjusted total.
pub fn has_usable_ace(hand: &[Rank]) -> bool {
    evaluate(hand).1 > 0
}

pub fn is_bust(hand: &[Rank]) -> bool {
    hand_total(hand) > BLACKJACK
}

/// Returns the adjusted total and the number of aces still valued at 11.
fn evaluate(hand: &[Rank]) -> (u8, usize) {
    let mut total: u32 = hand.iter().map(|card| u32::from(card.value())).sum();
    let mut soft_aces = hand.iter().filter(|card| card.is_ace()).count();
    while total > u32::from(BLACKJACK) && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    (total.min(u32::from(u8::MAX)) as u8, soft_aces)
}
