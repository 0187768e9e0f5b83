use std::io::{BufRead, Write};

use crate::action::Action;
use crate::bot::Bot;
use crate::state::TurnView;
use crate::visualize::render_turn;

/// Interactive bot that asks a human for each decision. An optional advisor is
/// consulted first and its choice shown as a suggestion.
pub struct HumanBot<'a, I: BufRead, O: Write> {
    input: I,
    output: O,
    advisor: Option<&'a mut dyn Bot>,
}

impl<'a, I: BufRead, O: Write> HumanBot<'a, I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self {
            input,
            output,
            advisor: None,
        }
    }

    pub fn with_advisor<'b>(self, advisor: &'b mut dyn Bot) -> HumanBot<'b, I, O> {
        HumanBot {
            input: self.input,
            output: self.output,
            advisor: Some(advisor),
        }
    }

    pub fn into_output(self) -> O {
        self.output
    }
}

impl<I: BufRead, O: Write> Bot for HumanBot<'_, I, O> {
    fn select_action(&mut self, view: &TurnView) -> Action {
        let suggestion = self
            .advisor
            .as_mut()
            .map(|advisor| advisor.select_action(view));
        loop {
            let _ = writeln!(self.output, "\n{}", render_turn(view));
            if let Some(suggestion) = suggestion {
                let _ = writeln!(self.output, "AI suggestion: {suggestion}");
            }
            let _ = write!(self.output, "{}, hit or stick? ", view.name);
            if self.output.flush().is_err() {
                log::warn!("failed to flush prompt");
            }
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    log::warn!("input closed during {}'s turn; sticking", view.name);
                    return Action::Stick;
                }
                Ok(_) => {}
                Err(err) => {
                    log::warn!("failed to read input ({err}); sticking");
                    return Action::Stick;
                }
            }
            match line.parse::<Action>() {
                Ok(action) => return action,
                Err(err) => {
                    let _ = writeln!(
                        self.output,
                        "Invalid action ({err}). Please choose 'hit' or 'stick'."
                    );
                }
            }
        }
    }
}
