use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidAction;

/// Zero-based seat of a participant at the table.
pub type Seat = usize;

/// Decision available to a participant during their turn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Draw one more card.
    Hit,
    /// End the turn with the current hand.
    Stick,
}

impl Action {
    pub const COUNT: usize = 2;
    pub const ALL: [Action; Action::COUNT] = [Action::Hit, Action::Stick];

    /// Position of the action in value-table rows.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Action::Hit => 0,
            Action::Stick => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Hit => "hit",
            Action::Stick => "stick",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("hit") || trimmed.eq_ignore_ascii_case("h") {
            Ok(Action::Hit)
        } else if trimmed.eq_ignore_ascii_case("stick") || trimmed.eq_ignore_ascii_case("s") {
            Ok(Action::Stick)
        } else {
            Err(InvalidAction(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_names_and_initials() {
        assert_eq!("hit".parse::<Action>(), Ok(Action::Hit));
        assert_eq!("  STICK\n".parse::<Action>(), Ok(Action::Stick));
        assert_eq!("h".parse::<Action>(), Ok(Action::Hit));
        assert_eq!("s".parse::<Action>(), Ok(Action::Stick));
        assert!("double".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn indices_match_all_order() {
        for (position, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), position);
        }
    }
}
