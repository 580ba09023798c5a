use crate::action::Action;
use crate::bot::Bot;
use crate::ml::{SnakeAgent, StateEncoder};
use crate::state::GameStateView;

/// Bot that follows a trained agent's policy without learning from its moves.
pub struct PolicyBot {
    agent: SnakeAgent,
}

impl PolicyBot {
    /// Wraps `agent`. Exploration stays as configured; call
    /// [`SnakeAgent::exploit`] first for purely greedy play.
    pub fn new(agent: SnakeAgent) -> Self {
        Self { agent }
    }
}

impl Bot for PolicyBot {
    fn select_action(&mut self, state: &GameStateView) -> Option<Action> {
        let encoded = StateEncoder::encode(state);
        Some(self.agent.q_function().policy(&encoded))
    }
}
