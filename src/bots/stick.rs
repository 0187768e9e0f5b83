use crate::action::Action;
use crate::bot::Bot;
use crate::state::TurnView;

/// Stands on whatever it is dealt. Seats the AI player when no trained table
/// is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct StickBot;

impl Bot for StickBot {
    fn select_action(&mut self, _view: &TurnView) -> Action {
        Action::Stick
    }
}
