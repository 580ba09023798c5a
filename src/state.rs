use serde::{Deserialize, Serialize};

use crate::action::Direction;
use crate::error::GameError;

/// Default world width in pixels.
pub const DEFAULT_WIDTH: i32 = 640;
/// Default world height in pixels.
pub const DEFAULT_HEIGHT: i32 = 480;
/// Edge length of a grid cell in pixels.
pub const BLOCK: i32 = 20;
/// Largest accepted world width or height in pixels.
pub const MAX_DIMENSION: i32 = 1 << 20;

/// Top-left corner of a grid cell, in pixels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one block away in `direction`.
    pub fn step(self, direction: Direction, block: i32) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx * block, self.y + dy * block)
    }
}

/// Geometry of the world. Bounds are `[0, width) x [0, height)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    pub width: i32,
    pub height: i32,
    pub block: i32,
}

impl GameSettings {
    pub fn new(width: i32, height: i32, block: i32) -> Result<Self, GameError> {
        if block <= 0 {
            return Err(GameError::InvalidConfiguration("block size must be positive"));
        }
        if width <= 0 || height <= 0 {
            return Err(GameError::InvalidConfiguration(
                "world dimensions must be positive",
            ));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GameError::InvalidConfiguration(
                "world dimensions must not exceed 1048576 pixels",
            ));
        }
        if width % block != 0 || height % block != 0 {
            return Err(GameError::InvalidConfiguration(
                "world dimensions must be multiples of the block size",
            ));
        }
        Ok(Self {
            width,
            height,
            block,
        })
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x <= self.width - self.block && y >= 0 && y <= self.height - self.block
    }

    /// True if `position` is inside the world and aligned to the grid.
    pub fn is_cell(&self, position: Position) -> bool {
        self.in_bounds(position.x, position.y)
            && position.x % self.block == 0
            && position.y % self.block == 0
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            block: BLOCK,
        }
    }
}

/// Lifecycle of a single game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// The head left the world or ran into the body.
    Crashed,
    /// The body covers every cell, so no food can be placed.
    Filled,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Running)
    }
}

/// Read-only snapshot of the world handed to encoders, bots and renderers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateView {
    pub settings: GameSettings,
    pub status: GameStatus,
    pub direction: Direction,
    /// Head first.
    pub body: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub steps_since_food: u32,
}

impl GameStateView {
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Out of bounds, or occupied by any body cell including the head.
    pub fn is_obstacle(&self, x: i32, y: i32) -> bool {
        if !self.settings.in_bounds(x, y) {
            return true;
        }
        self.body.iter().any(|cell| cell.x == x && cell.y == y)
    }
}
