use crate::game::Game;

/// Receives the world after every completed step, e.g. to draw it or to pace
/// playback. Observers only get shared access and cannot alter the game.
pub trait StepObserver {
    fn on_step(&mut self, game: &Game);
}

/// Observer that ignores every step.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _game: &Game) {}
}

impl<F: FnMut(&Game)> StepObserver for F {
    fn on_step(&mut self, game: &Game) {
        self(game)
    }
}
