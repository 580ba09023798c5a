use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use snakeq::{
    Action, Direction, Game, GameConfig, GameError, GameStatus, Position, StepOutcome,
};

fn snake_at(head: Position, direction: Direction) -> Vec<Position> {
    let (dx, dy) = direction.offset();
    (0..3)
        .map(|i| Position::new(head.x - dx * 20 * i, head.y - dy * 20 * i))
        .collect()
}

#[test]
fn eating_grows_the_snake_and_moves_the_food() -> Result<(), GameError> {
    let mut game = Game::builder()
        .with_body(snake_at(Position::new(100, 100), Direction::Right))
        .with_food(Position::new(120, 100))
        .build()?;

    assert_eq!(game.step(Action::Right), StepOutcome::Ate);
    assert_eq!(game.score(), 1);
    assert_eq!(game.len(), 4);
    assert_eq!(game.head(), Position::new(120, 100));
    assert_eq!(game.steps_since_food(), 0);
    assert!(!game.body().contains(&game.food()));
    assert!(game.settings().is_cell(game.food()));
    assert_eq!(game.status(), GameStatus::Running);
    Ok(())
}

#[test]
fn leaving_the_world_ends_the_game() -> Result<(), GameError> {
    let mut game = Game::builder()
        .with_body(vec![
            Position::new(0, 0),
            Position::new(20, 0),
            Position::new(40, 0),
        ])
        .with_direction(Direction::Left)
        .with_food(Position::new(200, 200))
        .build()?;

    assert_eq!(game.step_token("up"), StepOutcome::Crashed);
    assert!(game.is_over());
    assert_eq!(game.status(), GameStatus::Crashed);
    assert_eq!(game.score(), 0);
    // Finished games ignore further input.
    assert_eq!(game.step(Action::Down), StepOutcome::Ignored);
    Ok(())
}

#[test]
fn unknown_tokens_are_ignored() -> Result<(), GameError> {
    let mut game = Game::new(GameConfig::default())?;
    let before = game.state_view();
    assert_eq!(game.step_token("jump"), StepOutcome::Ignored);
    assert_eq!(game.step_token(""), StepOutcome::Ignored);
    assert_eq!(game.state_view(), before);
    Ok(())
}

#[test]
fn moving_keeps_length_and_counts_hunger() -> Result<(), GameError> {
    let mut game = Game::builder()
        .with_body(snake_at(Position::new(100, 100), Direction::Right))
        .with_food(Position::new(600, 400))
        .build()?;
    for _ in 0..3 {
        assert_eq!(game.step(Action::Down), StepOutcome::Moved);
    }
    assert_eq!(game.len(), 3);
    assert_eq!(game.head(), Position::new(100, 160));
    assert_eq!(game.direction(), Direction::Down);
    assert_eq!(game.steps_since_food(), 3);
    Ok(())
}

#[test]
fn length_tracks_score_under_random_play() -> Result<(), GameError> {
    let mut rng = StdRng::seed_from_u64(99);
    for seed in 0..20 {
        let mut game = Game::new(GameConfig::default().with_seed(seed))?;
        for _ in 0..400 {
            let action = *Action::ALL.choose(&mut rng).expect("four actions");
            game.step(action);
            let score = game.score() as usize;
            match game.status() {
                GameStatus::Running => {
                    assert_eq!(game.len(), 3 + score);
                    assert!(!game.body().contains(&game.food()));
                }
                // The head that crashed stays in the body.
                GameStatus::Crashed => {
                    assert_eq!(game.len(), 4 + score);
                    break;
                }
                GameStatus::Filled => unreachable!("the default world cannot fill this fast"),
            }
        }
    }
    Ok(())
}

#[test]
fn identical_seeds_replay_identically() -> Result<(), GameError> {
    let moves = [Action::Up, Action::Up, Action::Left, Action::Down, Action::Right];
    let play = |seed: u64| -> Result<Vec<Position>, GameError> {
        let mut game = Game::new(GameConfig::default().with_seed(seed))?;
        let mut foods = vec![game.food()];
        for action in moves {
            game.step(action);
            foods.push(game.food());
        }
        Ok(foods)
    };
    assert_eq!(play(5)?, play(5)?);
    Ok(())
}

#[test]
fn invalid_geometry_is_rejected() {
    assert!(matches!(
        GameConfig::new(650, 480, 20, 0),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GameConfig::new(640, 0, 20, 0),
        Err(GameError::InvalidConfiguration(_))
    ));
}
