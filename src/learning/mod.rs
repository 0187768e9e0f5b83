pub mod agent;
pub mod table;
pub mod training;

pub use agent::{AgentConfig, QLearningAgent};
pub use table::{ActionValues, ValueTable};
pub use training::{EpisodeRecord, TrainingConfig, TrainingReport, train, train_with_observer};
