use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::{Action, Direction};
use crate::game::Game;
use crate::state::{GameStateView, Position};

pub const STATE_FEATURES: usize = 14;

/// Steps without food after which the `hungry` flag is raised.
pub const HUNGER_THRESHOLD: u32 = 50;

/// Slots of the encoded state, in wire order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Feature {
    MovingRight,
    MovingLeft,
    MovingUp,
    MovingDown,
    DangerRight,
    DangerLeft,
    DangerUp,
    DangerDown,
    FoodRight,
    FoodLeft,
    FoodUp,
    FoodDown,
    FoodAdjacent,
    Hungry,
}

impl Feature {
    pub const ALL: [Feature; STATE_FEATURES] = [
        Feature::MovingRight,
        Feature::MovingLeft,
        Feature::MovingUp,
        Feature::MovingDown,
        Feature::DangerRight,
        Feature::DangerLeft,
        Feature::DangerUp,
        Feature::DangerDown,
        Feature::FoodRight,
        Feature::FoodLeft,
        Feature::FoodUp,
        Feature::FoodDown,
        Feature::FoodAdjacent,
        Feature::Hungry,
    ];

    pub fn index(self) -> usize {
        match self {
            Feature::MovingRight => 0,
            Feature::MovingLeft => 1,
            Feature::MovingUp => 2,
            Feature::MovingDown => 3,
            Feature::DangerRight => 4,
            Feature::DangerLeft => 5,
            Feature::DangerUp => 6,
            Feature::DangerDown => 7,
            Feature::FoodRight => 8,
            Feature::FoodLeft => 9,
            Feature::FoodUp => 10,
            Feature::FoodDown => 11,
            Feature::FoodAdjacent => 12,
            Feature::Hungry => 13,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::MovingRight => "Snake moving right",
            Feature::MovingLeft => "Snake moving left",
            Feature::MovingUp => "Snake moving up",
            Feature::MovingDown => "Snake moving down",
            Feature::DangerRight => "Danger right",
            Feature::DangerLeft => "Danger left",
            Feature::DangerUp => "Danger up",
            Feature::DangerDown => "Danger down",
            Feature::FoodRight => "Food right",
            Feature::FoodLeft => "Food left",
            Feature::FoodUp => "Food up",
            Feature::FoodDown => "Food down",
            Feature::FoodAdjacent => "Food adjacent",
            Feature::Hungry => "Hungry",
        }
    }

    pub fn moving(direction: Direction) -> Feature {
        match direction {
            Direction::Right => Feature::MovingRight,
            Direction::Left => Feature::MovingLeft,
            Direction::Up => Feature::MovingUp,
            Direction::Down => Feature::MovingDown,
        }
    }

    pub fn danger(action: Action) -> Feature {
        match action {
            Action::Right => Feature::DangerRight,
            Action::Left => Feature::DangerLeft,
            Action::Up => Feature::DangerUp,
            Action::Down => Feature::DangerDown,
        }
    }

    pub fn food(action: Action) -> Feature {
        match action {
            Action::Right => Feature::FoodRight,
            Action::Left => Feature::FoodLeft,
            Action::Up => Feature::FoodUp,
            Action::Down => Feature::FoodDown,
        }
    }
}

/// Error returned when a string is not a valid 14-bit state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 14 characters of '0'/'1', got '{0}'")]
pub struct ParseStateError(pub String);

/// Fixed-width symbolic summary of the world, keyed into the Q-table by its
/// `0`/`1` string form.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedState {
    bits: [bool; STATE_FEATURES],
}

impl EncodedState {
    pub fn get(&self, feature: Feature) -> bool {
        self.bits[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: bool) {
        self.bits[feature.index()] = value;
    }

    pub fn with(mut self, feature: Feature) -> Self {
        self.set(feature, true);
        self
    }

    /// True if food is one cell away in the direction of `action`.
    pub fn food_reachable_by(&self, action: Action) -> bool {
        self.get(Feature::FoodAdjacent) && self.get(Feature::food(action))
    }

    pub fn danger_towards(&self, action: Action) -> bool {
        self.get(Feature::danger(action))
    }

    pub fn is_hungry(&self) -> bool {
        self.get(Feature::Hungry)
    }

    pub fn bitstring(&self) -> String {
        self.bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for EncodedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bitstring())
    }
}

impl FromStr for EncodedState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != STATE_FEATURES {
            return Err(ParseStateError(s.to_string()));
        }
        let mut state = EncodedState::default();
        for (slot, byte) in state.bits.iter_mut().zip(bytes) {
            *slot = match byte {
                b'0' => false,
                b'1' => true,
                _ => return Err(ParseStateError(s.to_string())),
            };
        }
        Ok(state)
    }
}

impl TryFrom<String> for EncodedState {
    type Error = ParseStateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EncodedState> for String {
    fn from(state: EncodedState) -> Self {
        state.bitstring()
    }
}

/// Read access the encoder needs from the world.
pub trait Observation {
    fn head(&self) -> Position;
    fn direction(&self) -> Direction;
    fn food(&self) -> Position;
    fn block(&self) -> i32;
    fn steps_since_food(&self) -> u32;
    fn is_obstacle(&self, x: i32, y: i32) -> bool;
}

impl Observation for Game {
    fn head(&self) -> Position {
        Game::head(self)
    }

    fn direction(&self) -> Direction {
        Game::direction(self)
    }

    fn food(&self) -> Position {
        Game::food(self)
    }

    fn block(&self) -> i32 {
        self.settings().block
    }

    fn steps_since_food(&self) -> u32 {
        Game::steps_since_food(self)
    }

    fn is_obstacle(&self, x: i32, y: i32) -> bool {
        Game::is_obstacle(self, x, y)
    }
}

impl Observation for GameStateView {
    fn head(&self) -> Position {
        GameStateView::head(self)
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn food(&self) -> Position {
        self.food
    }

    fn block(&self) -> i32 {
        self.settings.block
    }

    fn steps_since_food(&self) -> u32 {
        self.steps_since_food
    }

    fn is_obstacle(&self, x: i32, y: i32) -> bool {
        GameStateView::is_obstacle(self, x, y)
    }
}

pub struct StateEncoder;

impl StateEncoder {
    pub fn encode<O: Observation + ?Sized>(world: &O) -> EncodedState {
        let head = world.head();
        let food = world.food();
        let block = world.block();
        let mut state = EncodedState::default();

        state.set(Feature::moving(world.direction()), true);

        for action in Action::ALL {
            let next = head.step(action.direction(), block);
            if world.is_obstacle(next.x, next.y) {
                state.set(Feature::danger(action), true);
            }
            if next == food {
                state.set(Feature::FoodAdjacent, true);
            }
        }

        state.set(Feature::FoodRight, head.x < food.x);
        state.set(Feature::FoodLeft, head.x > food.x);
        state.set(Feature::FoodUp, head.y > food.y);
        state.set(Feature::FoodDown, head.y < food.y);

        state.set(
            Feature::Hungry,
            world.steps_since_food() > HUNGER_THRESHOLD,
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameBuilder;
    use crate::state::GameStatus;

    #[test]
    fn feature_indices_follow_wire_order() {
        for (expected, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), expected);
        }
    }

    #[test]
    fn bitstring_round_trip_is_exact() {
        let state = EncodedState::default()
            .with(Feature::MovingUp)
            .with(Feature::DangerLeft)
            .with(Feature::FoodRight)
            .with(Feature::FoodDown)
            .with(Feature::Hungry);
        let text = state.bitstring();
        assert_eq!(text, "00100100100101");
        assert_eq!(text.parse::<EncodedState>(), Ok(state));
    }

    #[test]
    fn parse_rejects_bad_strings() {
        assert!("0101".parse::<EncodedState>().is_err());
        assert!("0000000000000x".parse::<EncodedState>().is_err());
        assert!("000000000000000".parse::<EncodedState>().is_err());
    }

    #[test]
    fn initial_game_encodes_direction_and_food() {
        let game = GameBuilder::new()
            .with_food(crate::state::Position::new(100, 40))
            .build()
            .expect("game");
        let state = StateEncoder::encode(&game);
        assert!(state.get(Feature::MovingRight));
        assert!(state.get(Feature::DangerLeft), "neck sits to the left of the head");
        assert!(!state.get(Feature::DangerRight));
        assert!(state.get(Feature::FoodLeft));
        assert!(state.get(Feature::FoodUp));
        assert!(!state.get(Feature::FoodAdjacent));
        assert!(!state.is_hungry());
    }

    #[test]
    fn view_and_game_encode_identically() {
        let game = GameBuilder::new().with_seed(9).build().expect("game");
        let view = game.state_view();
        assert_eq!(view.status, GameStatus::Running);
        assert_eq!(StateEncoder::encode(&game), StateEncoder::encode(&view));
    }
}
