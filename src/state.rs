use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::card::Rank;
use crate::hand::hand_total;

pub const LOW_RISK_BELOW: u32 = 50;
pub const MEDIUM_RISK_BELOW: u32 = 150;

/// Who decides a participant's actions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Human,
    Policy,
}

/// Coarse bankroll bucket used as part of the learning state.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 3] = [RiskCategory::Low, RiskCategory::Medium, RiskCategory::High];

    pub fn from_balance(balance: u32) -> Self {
        if balance < LOW_RISK_BELOW {
            RiskCategory::Low
        } else if balance < MEDIUM_RISK_BELOW {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wager as a fraction of the starting balance. Compared and hashed by exact
/// bit pattern so it can key the value table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetFraction(f64);

impl BetFraction {
    pub const ZERO: BetFraction = BetFraction(0.0);

    pub fn new(value: f64) -> Self {
        // fold -0.0 into 0.0 so equal wagers share a key
        if value == 0.0 || !value.is_finite() {
            Self::ZERO
        } else {
            Self(value)
        }
    }

    pub fn of(bet: u32, starting_balance: u32) -> Self {
        if starting_balance == 0 {
            Self::ZERO
        } else {
            Self::new(f64::from(bet) / f64::from(starting_balance))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for BetFraction {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for BetFraction {}

impl Hash for BetFraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Discrete situation a participant is in when deciding; the value-table key.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub total: u8,
    pub dealer_visible: Rank,
    pub usable_ace: bool,
    pub risk: RiskCategory,
    pub bet_fraction: BetFraction,
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {:.3})",
            self.total,
            self.dealer_visible,
            self.usable_ace,
            self.risk,
            self.bet_fraction.value()
        )
    }
}

/// A seated player: bankroll, current wager and hand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    name: String,
    role: Role,
    balance: u32,
    starting_balance: u32,
    hand: Vec<Rank>,
    bet: u32,
}

impl Participant {
    pub fn new(name: impl Into<String>, role: Role, balance: u32) -> Self {
        Self {
            name: name.into(),
            role,
            balance,
            starting_balance: balance,
            hand: Vec::new(),
            bet: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn starting_balance(&self) -> u32 {
        self.starting_balance
    }

    pub fn hand(&self) -> &[Rank] {
        &self.hand
    }

    pub fn bet(&self) -> u32 {
        self.bet
    }

    pub fn total(&self) -> u8 {
        hand_total(&self.hand)
    }

    pub fn risk_category(&self) -> RiskCategory {
        RiskCategory::from_balance(self.balance)
    }

    /// Moves `min(amount, balance)` from the balance into the bet.
    pub(crate) fn wager(&mut self, amount: u32) {
        let stake = amount.min(self.balance);
        self.bet = stake;
        self.balance -= stake;
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }

    pub(crate) fn set_balance(&mut self, balance: u32) {
        self.balance = balance;
    }

    pub(crate) fn clear_hand(&mut self) {
        self.hand.clear();
    }

    pub(crate) fn receive(&mut self, card: Rank) {
        self.hand.push(card);
    }
}

/// Everything a bot may look at when choosing an action.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnView {
    pub seat: usize,
    pub name: String,
    pub hand: Vec<Rank>,
    pub total: u8,
    pub dealer_visible: Rank,
    pub balance: u32,
    pub starting_balance: u32,
    pub bet: u32,
    pub state: StateKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_thresholds_are_exact() {
        assert_eq!(RiskCategory::from_balance(0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_balance(49), RiskCategory::Low);
        assert_eq!(RiskCategory::from_balance(50), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_balance(149), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_balance(150), RiskCategory::High);
        assert_eq!(RiskCategory::High.to_string(), "high");
    }

    #[test]
    fn bet_fraction_handles_zero_starting_balance() {
        assert_eq!(BetFraction::of(10, 0), BetFraction::ZERO);
        assert_eq!(BetFraction::of(10, 100).value(), 0.1);
        assert_eq!(BetFraction::new(-0.0), BetFraction::ZERO);
    }

    #[test]
    fn wager_goes_all_in_when_short() {
        let mut participant = Participant::new("p", Role::Policy, 7);
        participant.wager(10);
        assert_eq!(participant.bet(), 7);
        assert_eq!(participant.balance(), 0);

        let mut rich = Participant::new("q", Role::Policy, 100);
        rich.wager(10);
        assert_eq!(rich.bet(), 10);
        assert_eq!(rich.balance(), 90);
        assert_eq!(rich.starting_balance(), 100);
    }
}
