pub mod human;
pub mod random;
pub mod stick;

pub use human::HumanBot;
pub use random::RandomBot;
pub use stick::StickBot;
