use thiserror::Error;

/// Errors that can occur when building or driving the simulator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("no free cell left to place food")]
    WorldFull,
    #[error("unknown action token '{0}' (expected right, left, up or down)")]
    UnknownAction(String),
}

/// Failures while saving or restoring a trained agent.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode checkpoint: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode checkpoint: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("unsupported checkpoint version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("invalid hyperparameters: {0}")]
    InvalidHyperparameters(&'static str),
    #[error("malformed table entry: {0}")]
    MalformedEntry(String),
}
