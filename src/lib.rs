//! Blackjack round engine paired with a tabular Q-learning agent.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod chart;
pub mod encoding;
pub mod error;
pub mod game;
pub mod hand;
pub mod learning;
pub mod persistence;
pub mod shoe;
pub mod state;
pub mod visualize;

pub use crate::action::{Action, Seat};
pub use crate::bot::Bot;
pub use crate::bots::{HumanBot, RandomBot, StickBot};
pub use crate::card::{Rank, full_shoe};
pub use crate::encoding::StateEncoder;
pub use crate::error::{GameError, InvalidAction, PersistenceError};
pub use crate::game::{
    Game, GameBuilder, GameConfig, Outcome, RoundReport, RoundResults, TurnSummary, settle,
};
pub use crate::hand::{hand_total, has_usable_ace, is_bust};
pub use crate::learning::{
    AgentConfig, EpisodeRecord, QLearningAgent, TrainingConfig, TrainingReport, ValueTable, train,
    train_with_observer,
};
pub use crate::persistence::{Checkpoint, load_checkpoint, load_or_default, save_checkpoint};
pub use crate::shoe::Shoe;
pub use crate::state::{BetFraction, Participant, RiskCategory, Role, StateKey, TurnView};
pub use crate::visualize::{PolicyGrid, moving_average, policy_grid, policy_grids, render_turn};
