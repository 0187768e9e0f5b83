use crate::card::Rank;
use crate::hand::{hand_total, has_usable_ace};
use crate::state::{BetFraction, Participant, RiskCategory, StateKey};

pub struct StateEncoder;

impl StateEncoder {
    pub fn encode(participant: &Participant, dealer_visible: Rank) -> StateKey {
        Self::encode_parts(
            participant.hand(),
            dealer_visible,
            participant.balance(),
            participant.bet(),
            participant.starting_balance(),
        )
    }

    pub fn encode_parts(
        hand: &[Rank],
        dealer_visible: Rank,
        balance: u32,
        bet: u32,
        starting_balance: u32,
    ) -> StateKey {
        StateKey {
            total: hand_total(hand),
            dealer_visible,
            usable_ace: has_usable_ace(hand),
            risk: RiskCategory::from_balance(balance),
            bet_fraction: BetFraction::of(bet, starting_balance),
        }
    }
}
