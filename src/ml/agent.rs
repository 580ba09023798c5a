use tracing::{debug, trace};

use crate::error::GameError;
use crate::game::{Game, GameConfig, derive_seed};
use crate::ml::encoding::StateEncoder;
use crate::ml::q_function::{Hyperparameters, QFunction};
use crate::ml::trial::{Trial, TrialRecorder};
use crate::observer::{NoopObserver, StepObserver};
use crate::state::GameStatus;

/// Stall guard. A game is abandoned after this many decisions without food
/// from the start, or this many plus one after the last score change.
pub const STALL_LIMIT: u32 = 100;

/// Result of one game driven by the agent.
#[derive(Clone, Debug)]
pub struct Episode {
    pub score: u32,
    pub status: GameStatus,
    /// True if the stall guard ended the game rather than a terminal state.
    pub stalled: bool,
    pub trial: Trial,
}

/// Plays games with the Q-function's policy and learns from the recorded trials.
#[derive(Clone, Debug, Default)]
pub struct SnakeAgent {
    q_function: QFunction,
    games_played: u64,
}

impl SnakeAgent {
    pub fn new(params: Hyperparameters) -> Self {
        Self {
            q_function: QFunction::new(params),
            games_played: 0,
        }
    }

    pub fn from_parts(q_function: QFunction, games_played: u64) -> Self {
        Self {
            q_function,
            games_played,
        }
    }

    pub fn q_function(&self) -> &QFunction {
        &self.q_function
    }

    pub fn q_function_mut(&mut self) -> &mut QFunction {
        &mut self.q_function
    }

    /// Number of games the agent has learned from.
    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    /// Turns the optimism bonus off so the policy only exploits stored values.
    pub fn exploit(&mut self) {
        self.q_function.set_visit_threshold(0);
    }

    /// Plays `game` to the end and returns the final score.
    pub fn play_game(&mut self, game: &mut Game, learn: bool) -> u32 {
        self.run_episode(game, learn, &mut NoopObserver).score
    }

    /// Plays `game` until it ends or stalls, handing every step to `observer`.
    /// When `learn` is set the finished trial updates the Q-function.
    pub fn run_episode(
        &mut self,
        game: &mut Game,
        learn: bool,
        observer: &mut dyn StepObserver,
    ) -> Episode {
        let mut recorder = TrialRecorder::new();
        let mut last_score = game.score();
        let mut stale_steps = 0u32;
        let mut stalled = false;

        while !game.is_over() {
            if game.score() == last_score {
                stale_steps += 1;
            } else {
                last_score = game.score();
                stale_steps = 0;
            }
            if stale_steps > STALL_LIMIT {
                stalled = true;
                break;
            }

            let state = StateEncoder::encode(&*game);
            let action = self.q_function.policy(&state);
            recorder.record(state, action);
            game.step(action);
            trace!(%state, %action, score = game.score(), "agent step");
            observer.on_step(game);
        }

        let trial = recorder.finish(StateEncoder::encode(&*game));
        if learn {
            self.q_function.update(&trial);
            self.games_played += 1;
        }
        debug!(
            score = game.score(),
            steps = trial.steps().len(),
            stalled,
            learn,
            "game finished"
        );

        Episode {
            score: game.score(),
            status: game.status(),
            stalled,
            trial,
        }
    }

    /// Plays `games` fresh games, each seeded from `config.seed` and its index.
    pub fn play_games(
        &mut self,
        config: &GameConfig,
        games: usize,
        learn: bool,
    ) -> Result<Vec<u32>, GameError> {
        let mut scores = Vec::with_capacity(games);
        for index in 0..games {
            let seed = derive_seed(config.seed, index as u64);
            let mut game = Game::new(config.with_seed(seed))?;
            scores.push(self.play_game(&mut game, learn));
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::state::Position;

    #[test]
    fn crash_ends_trial_with_terminal_state() -> Result<(), GameError> {
        // Fresh table: every pair ties on the bonus, so the agent keeps going right.
        let mut game = Game::builder()
            .with_size(120, 60, 20)?
            .with_body(vec![
                Position::new(40, 20),
                Position::new(20, 20),
                Position::new(0, 20),
            ])
            .with_food(Position::new(0, 0))
            .build()?;
        let mut agent = SnakeAgent::default();
        let episode = agent.run_episode(&mut game, true, &mut NoopObserver);

        assert_eq!(episode.status, GameStatus::Crashed);
        assert!(!episode.stalled);
        // 40 -> 60 -> 80 -> 100 -> 120 (out of bounds)
        assert_eq!(episode.trial.steps().len(), 4);
        assert!(episode.trial.steps().iter().all(|step| step.action == Action::Right));
        assert_eq!(agent.games_played(), 1);
        // Last decision walked into the wall: value is the danger reward.
        let last = episode.trial.steps()[3];
        assert_eq!(agent.q_function().q_value(&last.state, Action::Right), -50.0);
        Ok(())
    }

    #[test]
    fn evaluation_games_do_not_learn() -> Result<(), GameError> {
        let mut agent = SnakeAgent::default();
        let scores = agent.play_games(&GameConfig::default(), 2, false)?;
        assert_eq!(scores.len(), 2);
        assert!(agent.q_function().is_empty());
        assert_eq!(agent.games_played(), 0);
        Ok(())
    }
}
