//! Bulk self-play training against a simulated random opponent.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::agent::QLearningAgent;
use crate::action::Action;
use crate::bots::RandomBot;
use crate::error::GameError;
use crate::game::{DEFAULT_BET, DEFAULT_STARTING_BALANCE, Game, Outcome, settle};
use crate::state::{Role, StateKey};

pub const DEFAULT_EPISODES: usize = 100_000;
pub const SIMULATED_HUMAN: &str = "Sim_Human";
pub const AI_PLAYER: &str = "AI_Player";

const SIM_SEAT: usize = 0;
const AI_SEAT: usize = 1;
const OPPONENT_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Parameters for a training run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingConfig {
    pub episodes: usize,
    /// Both seats are reset to this balance at the start of every episode.
    pub starting_balance: u32,
    pub bet: u32,
    /// Seeds the shoe and the simulated opponent; entropy when absent.
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub fn new(episodes: usize) -> Result<Self, GameError> {
        if episodes == 0 {
            return Err(GameError::InvalidConfiguration(
                "episode count must be positive",
            ));
        }
        Ok(Self {
            episodes,
            ..Self::default()
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Episodes between progress log lines.
    pub fn progress_interval(&self) -> usize {
        (self.episodes / 10).max(1)
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: DEFAULT_EPISODES,
            starting_balance: DEFAULT_STARTING_BALANCE,
            bet: DEFAULT_BET,
            seed: None,
        }
    }
}

/// What the agent learned from in a single episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub state: StateKey,
    pub action: Action,
    pub outcome: Outcome,
    pub reward: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingReport {
    pub episodes: usize,
    pub rewards: Vec<f64>,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl TrainingReport {
    pub fn mean_reward(&self) -> f64 {
        if self.rewards.is_empty() {
            0.0
        } else {
            self.rewards.iter().sum::<f64>() / self.rewards.len() as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }

    fn record(&mut self, record: &EpisodeRecord) {
        self.episodes += 1;
        self.rewards.push(record.reward);
        match record.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Lose => self.losses += 1,
        }
    }
}

/// Runs `config.episodes` rounds and logs progress.
pub fn train<R: Rng>(
    agent: &mut QLearningAgent<R>,
    config: &TrainingConfig,
) -> Result<TrainingReport, GameError> {
    let interval = config.progress_interval();
    train_with_observer(agent, config, |record| {
        if record.episode % interval == 0 {
            log::info!("Episode {}: reward = {}", record.episode, record.reward);
        }
    })
}

/// Each episode resets both seats, plays one full round (random opponent
/// first, then the agent) and applies exactly one terminal update. The final
/// pre-settlement state of the agent's seat is used as both state and next
/// state, paired with the agent's last chosen action.
pub fn train_with_observer<R: Rng>(
    agent: &mut QLearningAgent<R>,
    config: &TrainingConfig,
    mut on_episode: impl FnMut(&EpisodeRecord),
) -> Result<TrainingReport, GameError> {
    let mut builder = Game::builder()
        .with_participant(SIMULATED_HUMAN, Role::Policy, config.starting_balance)
        .with_participant(AI_PLAYER, Role::Policy, config.starting_balance);
    let opponent_rng = match config.seed {
        Some(seed) => {
            builder = builder.with_seed(seed);
            StdRng::seed_from_u64(seed ^ OPPONENT_SEED_MIX)
        }
        None => StdRng::from_entropy(),
    };
    let mut game = builder.build()?;
    let mut opponent = RandomBot::new(opponent_rng);
    let mut report = TrainingReport {
        rewards: Vec::with_capacity(config.episodes),
        ..TrainingReport::default()
    };

    for episode in 0..config.episodes {
        game.reset_balance(SIM_SEAT, config.starting_balance)?;
        game.reset_balance(AI_SEAT, config.starting_balance)?;
        game.place_bets(config.bet);
        game.deal_initial();
        game.player_turn(SIM_SEAT, &mut opponent)?;
        let turn = game.player_turn(AI_SEAT, agent)?;
        game.dealer_turn();

        let state = game.state_key(AI_SEAT)?;
        let outcome = settle(game.participant(AI_SEAT)?.total(), game.dealer_total());
        let action = turn
            .last_action()
            .expect("a turn always records at least one decision");
        let reward = outcome.reward();
        agent.update(state, action, reward, &state, true);
        game.settle_bets();

        let record = EpisodeRecord {
            episode,
            state,
            action,
            outcome,
            reward,
        };
        report.record(&record);
        on_episode(&record);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation_and_interval() {
        assert!(TrainingConfig::new(0).is_err());
        assert_eq!(TrainingConfig::new(5).unwrap().progress_interval(), 1);
        assert_eq!(TrainingConfig::new(1000).unwrap().progress_interval(), 100);
        assert_eq!(TrainingConfig::default().episodes, DEFAULT_EPISODES);
    }

    #[test]
    fn report_accumulates_outcomes() {
        let mut report = TrainingReport::default();
        assert_eq!(report.mean_reward(), 0.0);
        assert_eq!(report.win_rate(), 0.0);
        let state = crate::encoding::StateEncoder::encode_parts(
            &[crate::card::Rank::TEN],
            crate::card::Rank::ACE,
            90,
            10,
            100,
        );
        for outcome in [Outcome::Win, Outcome::Lose, Outcome::Win, Outcome::Draw] {
            report.record(&EpisodeRecord {
                episode: report.episodes,
                state,
                action: Action::Stick,
                outcome,
                reward: outcome.reward(),
            });
        }
        assert_eq!((report.wins, report.draws, report.losses), (2, 1, 1));
        assert_eq!(report.mean_reward(), 0.25);
        assert_eq!(report.win_rate(), 0.5);
    }
}
