//! Versioned persistence of a trained agent: hyperparameters plus every
//! Q-table entry, keyed by the 14-character state string.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::Action;
use crate::error::CheckpointError;
use crate::ml::agent::SnakeAgent;
use crate::ml::encoding::EncodedState;
use crate::ml::q_function::{Hyperparameters, QEntry, QFunction};

/// One stored (state, action) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Wire form of the state, e.g. `"10000100101000"`.
    pub state: String,
    pub action: Action,
    pub value: f64,
    pub visits: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentCheckpoint {
    pub version: u32,
    pub hyperparameters: Hyperparameters,
    pub games_played: u64,
    pub entries: Vec<StoredEntry>,
}

impl AgentCheckpoint {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &SnakeAgent) -> Self {
        let q_function = agent.q_function();
        let entries = q_function
            .entries()
            .into_iter()
            .map(|(state, action, entry)| StoredEntry {
                state: state.bitstring(),
                action,
                value: entry.value,
                visits: entry.visits,
            })
            .collect();
        Self {
            version: Self::VERSION,
            hyperparameters: *q_function.hyperparameters(),
            games_played: agent.games_played(),
            entries,
        }
    }

    pub fn to_agent(&self) -> Result<SnakeAgent, CheckpointError> {
        if self.version != Self::VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        self.hyperparameters
            .validate()
            .map_err(CheckpointError::InvalidHyperparameters)?;

        let mut entries = Vec::with_capacity(self.entries.len());
        let mut seen = HashSet::with_capacity(self.entries.len());
        for stored in &self.entries {
            let state: EncodedState = stored
                .state
                .parse()
                .map_err(|err| CheckpointError::MalformedEntry(format!("{err}")))?;
            if !stored.value.is_finite() {
                return Err(CheckpointError::MalformedEntry(format!(
                    "non-finite value for ({}, {})",
                    stored.state, stored.action
                )));
            }
            if !seen.insert((state, stored.action)) {
                return Err(CheckpointError::MalformedEntry(format!(
                    "duplicate entry for ({}, {})",
                    stored.state, stored.action
                )));
            }
            entries.push((
                state,
                stored.action,
                QEntry {
                    value: stored.value,
                    visits: stored.visits,
                },
            ));
        }
        let q_function = QFunction::from_entries(self.hyperparameters, entries);
        Ok(SnakeAgent::from_parts(q_function, self.games_played))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        Ok(bincode::serde::encode_to_vec(
            self,
            bincode::config::standard(),
        )?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let (checkpoint, _) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(checkpoint)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let bytes = self.to_bytes()?;
        fs::write(path.as_ref(), bytes)?;
        debug!(
            path = %path.as_ref().display(),
            entries = self.entries.len(),
            "checkpoint saved"
        );
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let bytes = fs::read(path.as_ref())?;
        let checkpoint = Self::from_bytes(&bytes)?;
        debug!(
            path = %path.as_ref().display(),
            entries = checkpoint.entries.len(),
            "checkpoint loaded"
        );
        Ok(checkpoint)
    }
}

/// Writes `agent` to `path`.
pub fn save_agent<P: AsRef<Path>>(agent: &SnakeAgent, path: P) -> Result<(), CheckpointError> {
    AgentCheckpoint::from_agent(agent).save_to_file(path)
}

/// Reads an agent previously written by [`save_agent`].
pub fn load_agent<P: AsRef<Path>>(path: P) -> Result<SnakeAgent, CheckpointError> {
    AgentCheckpoint::load_from_file(path)?.to_agent()
}

/// File name used for the checkpoint taken after `games` training games.
pub fn checkpoint_file_name(games: u64) -> String {
    format!("agent_{games}_games.bin")
}

/// Inverse of [`checkpoint_file_name`]: the game count encoded in `name`.
pub fn parse_checkpoint_file_name(name: &str) -> Option<u64> {
    name.strip_prefix("agent_")?
        .strip_suffix("_games.bin")?
        .parse()
        .ok()
}
