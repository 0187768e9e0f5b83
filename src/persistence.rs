//! Value-table checkpoints on disk.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::learning::ValueTable;

pub const DEFAULT_CHECKPOINT: &str = "q_table.bin";

/// Learned table plus the number of episodes that produced it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Checkpoint {
    pub table: ValueTable,
    pub episodes: u64,
}

impl Checkpoint {
    pub fn new(table: ValueTable, episodes: u64) -> Self {
        Self { table, episodes }
    }
}

pub fn encode_checkpoint(checkpoint: &Checkpoint) -> Result<Vec<u8>, PersistenceError> {
    Ok(bincode::serde::encode_to_vec(
        checkpoint,
        bincode::config::standard(),
    )?)
}

pub fn decode_checkpoint(bytes: &[u8]) -> Result<Checkpoint, PersistenceError> {
    let (checkpoint, _): (Checkpoint, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(checkpoint)
}

pub fn save_checkpoint(path: &Path, checkpoint: &Checkpoint) -> Result<(), PersistenceError> {
    let bytes = encode_checkpoint(checkpoint)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

pub fn load_checkpoint(path: &Path) -> Result<Checkpoint, PersistenceError> {
    let bytes = fs::read(path)?;
    decode_checkpoint(&bytes)
}

/// Loads a checkpoint, falling back to an empty table and zero episodes when
/// the file is missing or unreadable.
pub fn load_or_default(path: &Path) -> Checkpoint {
    match load_checkpoint(path) {
        Ok(checkpoint) => {
            log::info!(
                "loaded {} states trained over {} episodes from {}",
                checkpoint.table.len(),
                checkpoint.episodes,
                path.display()
            );
            checkpoint
        }
        Err(err) => {
            log::warn!(
                "could not load checkpoint {} ({err}); starting untrained",
                path.display()
            );
            Checkpoint::default()
        }
    }
}
