use crate::action::Action;
use crate::state::GameStateView;

/// Source of move requests for the simulator: a person, a baseline, or a
/// trained policy. Returning `None` ends the session.
pub trait Bot {
    fn select_action(&mut self, state: &GameStateView) -> Option<Action>;
}
