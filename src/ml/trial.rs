use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::ml::encoding::EncodedState;

/// One recorded decision: the state observed and the action taken from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStep {
    pub state: EncodedState,
    pub action: Action,
}

/// Complete record of one game, closed by the terminal state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    steps: Vec<TrialStep>,
    terminal: EncodedState,
}

impl Trial {
    pub fn new(steps: Vec<TrialStep>, terminal: EncodedState) -> Self {
        Self { steps, terminal }
    }

    /// Decisions in play order, excluding the terminal marker.
    pub fn steps(&self) -> &[TrialStep] {
        &self.steps
    }

    pub fn terminal(&self) -> EncodedState {
        self.terminal
    }

    /// Number of entries including the terminal marker.
    pub fn len(&self) -> usize {
        self.steps.len() + 1
    }

    /// State observed after step `index`: the next decision's state, or the
    /// terminal state after the last decision.
    pub fn next_state(&self, index: usize) -> EncodedState {
        self.steps
            .get(index + 1)
            .map(|step| step.state)
            .unwrap_or(self.terminal)
    }

    /// Entries as `(state, action)` pairs, the last one with no action.
    pub fn entries(&self) -> impl Iterator<Item = (EncodedState, Option<Action>)> + '_ {
        self.steps
            .iter()
            .map(|step| (step.state, Some(step.action)))
            .chain(std::iter::once((self.terminal, None)))
    }
}

/// Accumulates decisions while a game is running.
#[derive(Debug, Default)]
pub struct TrialRecorder {
    steps: Vec<TrialStep>,
}

impl TrialRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, state: EncodedState, action: Action) {
        self.steps.push(TrialStep { state, action });
    }

    pub fn finish(self, terminal: EncodedState) -> Trial {
        Trial::new(self.steps, terminal)
    }
}
