pub mod agent;
pub mod checkpoint;
pub mod encoding;
pub mod q_function;
pub mod reward;
pub mod trial;

pub use agent::{Episode, STALL_LIMIT, SnakeAgent};
pub use checkpoint::{
    AgentCheckpoint, StoredEntry, checkpoint_file_name, load_agent, parse_checkpoint_file_name,
    save_agent,
};
pub use encoding::{
    EncodedState, Feature, HUNGER_THRESHOLD, Observation, ParseStateError, STATE_FEATURES,
    StateEncoder,
};
pub use q_function::{Hyperparameters, QEntry, QFunction};
pub use reward::reward;
pub use trial::{Trial, TrialRecorder, TrialStep};
