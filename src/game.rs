use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::action::{Action, Direction};
use crate::error::GameError;
use crate::state::{GameSettings, GameStateView, GameStatus, Position};

pub const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;

/// Minimum body length of a freshly built snake.
pub const INITIAL_LENGTH: usize = 3;

/// Random draws attempted before food placement falls back to scanning the
/// free cells.
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub settings: GameSettings,
    pub seed: u64,
}

impl GameConfig {
    pub fn new(width: i32, height: i32, block: i32, seed: u64) -> Result<Self, GameError> {
        Ok(Self {
            settings: GameSettings::new(width, height, block)?,
            seed,
        })
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            settings: GameSettings::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Builder that enables deterministic world injection for tests and experiments.
pub struct GameBuilder {
    config: GameConfig,
    body: Option<Vec<Position>>,
    direction: Direction,
    food: Option<Position>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::from_config(GameConfig::default())
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self {
            config,
            body: None,
            direction: Direction::Right,
            food: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.config.settings = settings;
        self
    }

    /// Override the default 640x480 world (block size 20).
    pub fn with_size(mut self, width: i32, height: i32, block: i32) -> Result<Self, GameError> {
        self.config.settings = GameSettings::new(width, height, block)?;
        Ok(self)
    }

    /// Place the snake explicitly, head first.
    pub fn with_body(mut self, body: Vec<Position>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Place the first food item explicitly instead of sampling it.
    pub fn with_food(mut self, food: Position) -> Self {
        self.food = Some(food);
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single call to [`Game::step`] did to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The game was already over, or the request was not a known action.
    Ignored,
    Moved,
    Ate,
    Crashed,
    /// Food was eaten and the body now covers the whole grid.
    Filled,
}

/// Core snake simulator.
pub struct Game {
    settings: GameSettings,
    status: GameStatus,
    direction: Direction,
    body: VecDeque<Position>,
    food: Position,
    score: u32,
    steps_since_food: u32,
    rng: StdRng,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder::from_config(config).build()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn steps_since_food(&self) -> u32 {
        self.steps_since_food
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Out of bounds, or occupied by any body cell including the head.
    pub fn is_obstacle(&self, x: i32, y: i32) -> bool {
        !self.settings.in_bounds(x, y) || self.occupies(Position::new(x, y))
    }

    pub fn state_view(&self) -> GameStateView {
        GameStateView {
            settings: self.settings,
            status: self.status,
            direction: self.direction,
            body: self.body.iter().copied().collect(),
            food: self.food,
            score: self.score,
            steps_since_food: self.steps_since_food,
        }
    }

    /// Parses `token` and applies it. Unknown tokens leave the world untouched.
    pub fn step_token(&mut self, token: &str) -> StepOutcome {
        match Action::from_token(token) {
            Some(action) => self.step(action),
            None => {
                trace!(token, "ignoring unknown action token");
                StepOutcome::Ignored
            }
        }
    }

    /// Advances the world by one tick in the requested direction.
    ///
    /// Reversing onto the body is allowed and ends the game on the spot.
    pub fn step(&mut self, request: impl Into<Action>) -> StepOutcome {
        if self.is_over() {
            return StepOutcome::Ignored;
        }
        self.direction = request.into().direction();
        let new_head = self.head().step(self.direction, self.settings.block);
        self.body.push_front(new_head);

        if self.collides(new_head) {
            self.status = GameStatus::Crashed;
            debug!(score = self.score, x = new_head.x, y = new_head.y, "snake crashed");
            return StepOutcome::Crashed;
        }

        if new_head == self.food {
            self.score += 1;
            self.steps_since_food = 0;
            return match self.sample_food() {
                Ok(food) => {
                    self.food = food;
                    trace!(score = self.score, "food eaten");
                    StepOutcome::Ate
                }
                Err(_) => {
                    self.status = GameStatus::Filled;
                    debug!(score = self.score, "grid filled, no cell left for food");
                    StepOutcome::Filled
                }
            };
        }

        self.body.pop_back();
        self.steps_since_food += 1;
        StepOutcome::Moved
    }

    fn collides(&self, head: Position) -> bool {
        if !self.settings.in_bounds(head.x, head.y) {
            return true;
        }
        self.body.iter().skip(1).any(|&cell| cell == head)
    }

    fn occupies(&self, position: Position) -> bool {
        self.body.iter().any(|&cell| cell == position)
    }

    /// Uniform choice over the cells not covered by the body.
    fn sample_food(&mut self) -> Result<Position, GameError> {
        let block = self.settings.block;
        let columns = self.settings.columns();
        let rows = self.settings.rows();
        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let candidate = Position::new(
                self.rng.gen_range(0..columns) * block,
                self.rng.gen_range(0..rows) * block,
            );
            if !self.occupies(candidate) {
                return Ok(candidate);
            }
        }
        debug!(
            length = self.body.len(),
            "rejection sampling exhausted, scanning free cells"
        );
        let free: Vec<Position> = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Position::new(col * block, row * block)))
            .filter(|cell| !self.occupies(*cell))
            .collect();
        free.choose(&mut self.rng).copied().ok_or(GameError::WorldFull)
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            body,
            direction,
            food,
        } = builder;
        let settings = config.settings;
        let body = match body {
            Some(body) => body,
            None => default_body(&settings)?,
        };
        if body.len() < INITIAL_LENGTH {
            return Err(GameError::InvalidConfiguration(
                "snake must start with at least three cells",
            ));
        }
        if body.iter().any(|cell| !settings.is_cell(*cell)) {
            return Err(GameError::InvalidConfiguration(
                "snake body must lie on grid cells inside the world",
            ));
        }
        for (idx, cell) in body.iter().enumerate() {
            if body[idx + 1..].contains(cell) {
                return Err(GameError::InvalidConfiguration(
                    "snake body cells must be distinct",
                ));
            }
        }

        let mut game = Game {
            settings,
            status: GameStatus::Running,
            direction,
            body: body.into_iter().collect(),
            food: Position::new(0, 0),
            score: 0,
            steps_since_food: 0,
            rng: StdRng::seed_from_u64(config.seed),
        };
        game.food = match food {
            Some(food) => {
                if !settings.is_cell(food) || game.occupies(food) {
                    return Err(GameError::InvalidConfiguration(
                        "food must be placed on a free grid cell",
                    ));
                }
                food
            }
            None => game.sample_food()?,
        };
        Ok(game)
    }
}

/// Head at the centre of the world with two cells trailing to the left.
fn default_body(settings: &GameSettings) -> Result<Vec<Position>, GameError> {
    let block = settings.block;
    let head = Position::new(
        settings.columns() / 2 * block,
        settings.rows() / 2 * block,
    );
    if head.x < 2 * block {
        return Err(GameError::InvalidConfiguration(
            "world is too narrow for the starting snake",
        ));
    }
    Ok(vec![
        head,
        Position::new(head.x - block, head.y),
        Position::new(head.x - 2 * block, head.y),
    ])
}

/// Derives an independent per-game seed from a base seed.
pub fn derive_seed(base: u64, index: u64) -> u64 {
    let mut z = base ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
