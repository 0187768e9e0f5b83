use crate::action::Action;
use crate::state::TurnView;

/// Interface for anything that can play a blackjack hand.
pub trait Bot {
    fn select_action(&mut self, view: &TurnView) -> Action;
}
