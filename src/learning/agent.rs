//! Epsilon-greedy tabular Q-learning.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::table::ValueTable;
use crate::action::Action;
use crate::bot::Bot;
use crate::error::GameError;
use crate::state::{StateKey, TurnView};

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_DISCOUNT: f64 = 0.9;
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Hyperparameters, validated on construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentConfig {
    learning_rate: f64,
    discount: f64,
    epsilon: f64,
}

impl AgentConfig {
    /// * `learning_rate` - α in (0, 1]
    /// * `discount` - γ in [0, 1]
    /// * `epsilon` - exploration probability in [0, 1]
    pub fn new(learning_rate: f64, discount: f64, epsilon: f64) -> Result<Self, GameError> {
        if !(learning_rate > 0.0 && learning_rate <= 1.0) {
            return Err(GameError::InvalidConfiguration(
                "learning rate must be in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&discount) {
            return Err(GameError::InvalidConfiguration(
                "discount must be between 0 and 1",
            ));
        }
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(GameError::InvalidConfiguration(
                "exploration rate must be between 0 and 1",
            ));
        }
        Ok(Self {
            learning_rate,
            discount,
            epsilon,
        })
    }

    /// Same α and γ with exploration switched off, for advice and evaluation.
    pub fn greedy(self) -> Self {
        Self {
            epsilon: 0.0,
            ..self
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount: DEFAULT_DISCOUNT,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Q-learning agent that owns its value table.
#[derive(Clone, Debug)]
pub struct QLearningAgent<R: Rng = StdRng> {
    table: ValueTable,
    config: AgentConfig,
    rng: R,
}

impl QLearningAgent<StdRng> {
    pub fn seeded(config: AgentConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: AgentConfig) -> Self {
        Self::new(config, StdRng::from_entropy())
    }
}

impl<R: Rng> QLearningAgent<R> {
    pub fn new(config: AgentConfig, rng: R) -> Self {
        Self {
            table: ValueTable::new(),
            config,
            rng,
        }
    }

    pub fn with_table(mut self, table: ValueTable) -> Self {
        self.table = table;
        self
    }

    pub fn config(&self) -> AgentConfig {
        self.config
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    /// ε-greedy choice; ties among maximal actions are broken uniformly.
    pub fn select_action(&mut self, state: &StateKey) -> Action {
        if self.rng.gen_bool(self.config.epsilon) {
            return Action::ALL[self.rng.gen_range(0..Action::COUNT)];
        }
        let best = self.table.best_actions(state);
        best[self.rng.gen_range(0..best.len())]
    }

    /// One-step TD update:
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Terminal transitions drop the bootstrap term.
    pub fn update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
        terminal: bool,
    ) {
        let current = self.table.get(&state, action);
        let target = if terminal {
            reward
        } else {
            reward + self.config.discount * self.table.max_value(next_state)
        };
        let updated = current + self.config.learning_rate * (target - current);
        self.table.set(state, action, updated);
    }
}

impl<R: Rng> Bot for QLearningAgent<R> {
    fn select_action(&mut self, view: &TurnView) -> Action {
        QLearningAgent::select_action(self, &view.state)
    }
}
