//! Reward shaping for the tabular agent.
//!
//! Branches are checked in order and the first match wins:
//! terminal, move onto adjacent food, move into danger, hungry, step cost.

use crate::action::Action;
use crate::ml::encoding::EncodedState;

pub const TERMINAL_REWARD: f64 = -10.0;
pub const FOOD_REWARD: f64 = 50.0;
pub const DANGER_REWARD: f64 = -50.0;
pub const HUNGRY_REWARD: f64 = -50.0;
pub const STEP_REWARD: f64 = -1.0;

/// Reward for taking `action` in `state`. `None` marks the terminal entry of a trial.
pub fn reward(state: &EncodedState, action: Option<Action>) -> f64 {
    let Some(action) = action else {
        return TERMINAL_REWARD;
    };
    if state.food_reachable_by(action) {
        FOOD_REWARD
    } else if state.danger_towards(action) {
        DANGER_REWARD
    } else if state.is_hungry() {
        HUNGRY_REWARD
    } else {
        STEP_REWARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::encoding::Feature;

    #[test]
    fn terminal_marker_is_always_minus_ten() {
        let states = [
            EncodedState::default(),
            EncodedState::default()
                .with(Feature::FoodAdjacent)
                .with(Feature::FoodLeft),
            EncodedState::default().with(Feature::Hungry),
        ];
        for state in states {
            assert_eq!(reward(&state, None), -10.0);
        }
    }

    #[test]
    fn food_requires_adjacency_and_matching_direction() {
        let state = EncodedState::default()
            .with(Feature::FoodAdjacent)
            .with(Feature::FoodLeft)
            .with(Feature::FoodUp);
        assert_eq!(reward(&state, Some(Action::Left)), 50.0);
        assert_eq!(reward(&state, Some(Action::Up)), 50.0);
        assert_eq!(reward(&state, Some(Action::Right)), -1.0);

        let far = EncodedState::default().with(Feature::FoodLeft);
        assert_eq!(reward(&far, Some(Action::Left)), -1.0);
    }

    #[test]
    fn food_beats_danger_and_danger_beats_hunger() {
        let state = EncodedState::default()
            .with(Feature::FoodAdjacent)
            .with(Feature::FoodRight)
            .with(Feature::DangerRight)
            .with(Feature::DangerDown)
            .with(Feature::Hungry);
        assert_eq!(reward(&state, Some(Action::Right)), FOOD_REWARD);
        assert_eq!(reward(&state, Some(Action::Down)), DANGER_REWARD);
        assert_eq!(reward(&state, Some(Action::Up)), HUNGRY_REWARD);
    }

    #[test]
    fn plain_move_costs_one() {
        let state = EncodedState::default().with(Feature::MovingDown);
        for action in Action::ALL {
            assert_eq!(reward(&state, Some(action)), STEP_REWARD);
        }
    }
}
