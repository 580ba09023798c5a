use snakeq::ml::{STALL_LIMIT, SnakeAgent};
use snakeq::{Action, Game, GameConfig, GameError, GameStatus, Hyperparameters, Position};

fn corridor() -> Result<Game, GameError> {
    Game::builder()
        .with_size(4000, 60, 20)?
        .with_body(vec![
            Position::new(60, 20),
            Position::new(40, 20),
            Position::new(20, 20),
        ])
        .with_food(Position::new(0, 0))
        .build()
}

#[test]
fn stall_guard_stops_a_wandering_agent() -> Result<(), GameError> {
    let mut game = corridor()?;
    let mut agent = SnakeAgent::default();
    let mut observed = 0usize;
    let mut count = |_: &Game| observed += 1;
    let episode = agent.run_episode(&mut game, true, &mut count);

    assert!(episode.stalled);
    assert_eq!(episode.status, GameStatus::Running);
    assert!(!game.is_over());
    assert_eq!(episode.score, 0);
    // Without food the guard trips after STALL_LIMIT decisions.
    assert_eq!(episode.trial.steps().len(), STALL_LIMIT as usize);
    assert_eq!(episode.trial.len(), STALL_LIMIT as usize + 1);
    assert_eq!(observed, STALL_LIMIT as usize);
    assert_eq!(game.head(), Position::new(60 + 20 * 100, 20));
    Ok(())
}

#[test]
fn stall_guard_counts_from_the_last_meal() -> Result<(), GameError> {
    // The snake runs along the middle row; pick a seed whose next food lands
    // off that row so it is never reached again.
    let build = |seed: u64| -> Result<Game, GameError> {
        Game::builder()
            .with_seed(seed)
            .with_size(4000, 60, 20)?
            .with_body(vec![
                Position::new(60, 20),
                Position::new(40, 20),
                Position::new(20, 20),
            ])
            .with_food(Position::new(80, 20))
            .build()
    };
    let mut seed = 0;
    loop {
        let mut trial_run = build(seed)?;
        trial_run.step(Action::Right);
        if trial_run.food().y != 20 {
            break;
        }
        seed += 1;
    }

    let mut game = build(seed)?;
    let mut agent = SnakeAgent::default();
    let episode = agent.run_episode(&mut game, true, &mut |_: &Game| {});

    assert!(episode.stalled);
    assert_eq!(episode.score, 1);
    assert_eq!(episode.trial.steps().len(), 1 + STALL_LIMIT as usize + 1);
    assert_eq!(game.head(), Position::new(60 + 20 * 102, 20));
    assert_eq!(game.len(), 4);
    Ok(())
}

#[test]
fn learning_books_one_visit_per_decision() -> Result<(), GameError> {
    let mut game = corridor()?;
    let mut agent = SnakeAgent::default();
    let episode = agent.run_episode(&mut game, true, &mut |_: &Game| {});

    let visits: u32 = agent
        .q_function()
        .entries()
        .iter()
        .map(|(_, _, entry)| entry.visits)
        .sum();
    assert_eq!(visits as usize, episode.trial.steps().len());
    assert_eq!(visits, STALL_LIMIT);
    assert!(
        agent
            .q_function()
            .entries()
            .iter()
            .all(|(_, action, _)| *action == Action::Right)
    );
    assert_eq!(agent.games_played(), 1);
    Ok(())
}

#[test]
fn second_game_explores_a_new_action() -> Result<(), GameError> {
    let mut agent = SnakeAgent::default();
    let mut first = corridor()?;
    let episode = agent.run_episode(&mut first, true, &mut |_: &Game| {});
    let opening = episode.trial.steps()[0].state;

    // Right has been tried from the opening state, so the bonus now favours left.
    assert_eq!(agent.q_function().policy(&opening), Action::Left);

    let mut second = corridor()?;
    let replay = agent.run_episode(&mut second, true, &mut |_: &Game| {});
    assert_eq!(replay.trial.steps()[0].action, Action::Left);
    assert_eq!(replay.status, GameStatus::Crashed);
    Ok(())
}

#[test]
fn exploiting_agent_follows_stored_values() -> Result<(), GameError> {
    let params = Hyperparameters {
        visit_threshold: 5,
        ..Hyperparameters::default()
    };
    let mut agent = SnakeAgent::new(params);
    let scores = agent.play_games(&GameConfig::default(), 5, true)?;
    assert_eq!(scores.len(), 5);
    assert_eq!(agent.games_played(), 5);

    agent.exploit();
    assert_eq!(agent.q_function().hyperparameters().visit_threshold, 0);
    for (state, _, _) in agent.q_function().entries() {
        let chosen = agent.q_function().policy(&state);
        let best = Action::ALL
            .into_iter()
            .map(|action| agent.q_function().q_value(&state, action))
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(agent.q_function().q_value(&state, chosen), best);
    }
    Ok(())
}

#[test]
fn same_seed_same_training() -> Result<(), GameError> {
    let mut a = SnakeAgent::default();
    let mut b = SnakeAgent::default();
    let config = GameConfig::default().with_seed(1234);
    assert_eq!(a.play_games(&config, 10, true)?, b.play_games(&config, 10, true)?);
    assert_eq!(a.q_function().entries(), b.q_function().entries());
    Ok(())
}
