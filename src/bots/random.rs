use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Action;
use crate::bot::Bot;
use crate::state::TurnView;

/// Baseline bot that hits or sticks with equal probability.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_action(&mut self, _view: &TurnView) -> Action {
        *Action::ALL
            .choose(&mut self.rng)
            .expect("action set is never empty")
    }
}
