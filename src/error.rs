use thiserror::Error;

use crate::action::Seat;

/// Errors that can occur when configuring or driving a table.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("seat {0} is out of range")]
    InvalidSeat(Seat),
    #[error("a participant named '{0}' is already seated")]
    DuplicateName(String),
    #[error("cards have not been dealt yet")]
    NotDealt,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Text that does not name a known action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown action '{0}', expected 'hit' or 'stick'")]
pub struct InvalidAction(pub String);

/// Failures while reading or writing a value-table checkpoint.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("checkpoint i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode checkpoint: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode checkpoint: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}
