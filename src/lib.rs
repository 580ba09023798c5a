//! Grid snake simulator with a tabular Q-learning agent, bots and training tools.

pub mod action;
pub mod bot;
pub mod bots;
pub mod error;
pub mod game;
pub mod logging;
pub mod ml;
pub mod observer;
pub mod score;
pub mod state;
pub mod visualize;

pub use crate::action::{Action, Direction};
pub use crate::bot::Bot;
pub use crate::bots::{HumanBot, PolicyBot, RandomBot, create_bot_from_spec, label_for_spec};
pub use crate::error::{CheckpointError, GameError};
pub use crate::game::{Game, GameBuilder, GameConfig, StepOutcome, derive_seed};
pub use crate::ml::{
    AgentCheckpoint, EncodedState, Hyperparameters, QFunction, STALL_LIMIT, SnakeAgent,
    StateEncoder,
};
pub use crate::observer::{NoopObserver, StepObserver};
pub use crate::score::ScoreSummary;
pub use crate::state::{GameSettings, GameStateView, GameStatus, Position};
pub use crate::visualize::{
    DescribeOptions, VisualOptions, describe_action, describe_state, render_state,
};
