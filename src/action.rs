use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Heading of the snake. Exactly one is active at a time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit step in grid cells. Screen coordinates: `y` grows downwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Move request accepted at every boundary of the engine (input sources,
/// policies, persisted tables).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Right,
    Left,
    Up,
    Down,
}

impl Action {
    /// Fixed enumeration order used for policy evaluation and tie-breaking.
    pub const ALL: [Action; 4] = [Action::Right, Action::Left, Action::Up, Action::Down];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Right => "right",
            Action::Left => "left",
            Action::Up => "up",
            Action::Down => "down",
        }
    }

    /// Parses a lowercase token. Anything outside the vocabulary yields `None`.
    pub fn from_token(token: &str) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == token)
    }

    pub fn direction(self) -> Direction {
        match self {
            Action::Right => Direction::Right,
            Action::Left => Direction::Left,
            Action::Up => Direction::Up,
            Action::Down => Direction::Down,
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Right => Action::Right,
            Direction::Left => Action::Left,
            Direction::Up => Action::Up,
            Direction::Down => Action::Down,
        }
    }
}

impl From<Action> for Direction {
    fn from(action: Action) -> Self {
        action.direction()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::from_token(s).ok_or_else(|| GameError::UnknownAction(s.to_string()))
    }
}
