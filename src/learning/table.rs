use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::state::StateKey;

/// Action values for one state, indexed by [`Action::index`].
pub type ActionValues = [f64; Action::COUNT];

/// Tabular action-value estimates. Rows are created on first write; reading an
/// unseen state yields zeros without touching the map.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ValueTable {
    values: HashMap<StateKey, ActionValues>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &StateKey, action: Action) -> f64 {
        self.row(state)[action.index()]
    }

    pub fn row(&self, state: &StateKey) -> ActionValues {
        self.values
            .get(state)
            .copied()
            .unwrap_or([0.0; Action::COUNT])
    }

    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        let row = self.values.entry(state).or_insert([0.0; Action::COUNT]);
        row[action.index()] = value;
    }

    pub fn max_value(&self, state: &StateKey) -> f64 {
        self.row(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// All actions whose value equals the state's maximum.
    pub fn best_actions(&self, state: &StateKey) -> Vec<Action> {
        let row = self.row(state);
        let max = row.into_iter().fold(f64::NEG_INFINITY, f64::max);
        Action::ALL
            .into_iter()
            .filter(|action| row[action.index()] == max)
            .collect()
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.values.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.values.iter()
    }
}
