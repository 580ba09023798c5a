//! Tabular TD(0) Q-learning with an optimistic exploration bonus.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::Action;
use crate::ml::encoding::EncodedState;
use crate::ml::reward::reward;
use crate::ml::trial::Trial;

/// Learning and exploration settings of a [`QFunction`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Learning rate α.
    pub alpha: f64,
    /// Discount γ.
    pub gamma: f64,
    /// Value assumed for pairs never visited.
    pub initial_value: f64,
    /// Visits below which a pair is scored with the exploration bonus (N_e).
    pub visit_threshold: u32,
    /// Optimistic value substituted for under-visited pairs (R⁺).
    pub exploration_bonus: f64,
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err("alpha must lie in (0, 1]");
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err("gamma must lie in [0, 1]");
        }
        if !self.initial_value.is_finite() {
            return Err("initial value must be finite");
        }
        if !self.exploration_bonus.is_finite() {
            return Err("exploration bonus must be finite");
        }
        Ok(())
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            initial_value: 0.0,
            visit_threshold: 1,
            exploration_bonus: 10_000.0,
        }
    }
}

/// Stored estimate and visit count of one (state, action) pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QEntry {
    pub value: f64,
    pub visits: u32,
}

/// Sparse Q-table plus the policy and update rule built on it.
///
/// Pairs absent from the table read as `initial_value` with zero visits; the
/// table only grows when [`QFunction::update`] first sees a pair.
#[derive(Clone, Debug)]
pub struct QFunction {
    params: Hyperparameters,
    table: HashMap<(EncodedState, Action), QEntry>,
}

impl QFunction {
    pub fn new(params: Hyperparameters) -> Self {
        Self {
            params,
            table: HashMap::new(),
        }
    }

    /// Rebuilds a table from stored entries, e.g. a checkpoint.
    pub fn from_entries(
        params: Hyperparameters,
        entries: impl IntoIterator<Item = (EncodedState, Action, QEntry)>,
    ) -> Self {
        let table = entries
            .into_iter()
            .map(|(state, action, entry)| ((state, action), entry))
            .collect();
        Self { params, table }
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.params
    }

    /// Sets N_e. Zero turns exploration off and makes the policy greedy.
    pub fn set_visit_threshold(&mut self, threshold: u32) {
        self.params.visit_threshold = threshold;
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Every stored pair, sorted by state string then action order.
    pub fn entries(&self) -> Vec<(EncodedState, Action, QEntry)> {
        let mut entries: Vec<_> = self
            .table
            .iter()
            .map(|(&(state, action), &entry)| (state, action, entry))
            .collect();
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        entries
    }

    pub fn q_value(&self, state: &EncodedState, action: Action) -> f64 {
        self.table
            .get(&(*state, action))
            .map(|entry| entry.value)
            .unwrap_or(self.params.initial_value)
    }

    pub fn visits(&self, state: &EncodedState, action: Action) -> u32 {
        self.table
            .get(&(*state, action))
            .map(|entry| entry.visits)
            .unwrap_or(0)
    }

    /// R⁺ while the pair has fewer than N_e visits, the stored estimate afterwards.
    pub fn exploration_value(&self, state: &EncodedState, action: Action) -> f64 {
        if self.visits(state, action) < self.params.visit_threshold {
            self.params.exploration_bonus
        } else {
            self.q_value(state, action)
        }
    }

    fn max_q_value(&self, state: &EncodedState) -> f64 {
        Action::ALL
            .into_iter()
            .map(|action| self.q_value(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the greatest exploration value. Ties go to the earliest
    /// action in right, left, up, down order.
    pub fn policy(&self, state: &EncodedState) -> Action {
        let mut best = Action::ALL[0];
        let mut best_value = f64::NEG_INFINITY;
        for action in Action::ALL {
            let value = self.exploration_value(state, action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// Replays a finished trial in play order.
    ///
    /// The last decision takes its immediate reward. Every earlier decision
    /// moves towards `reward + γ · max_a Q(next, a)`, reading the table as it
    /// stands when that decision is processed.
    pub fn update(&mut self, trial: &Trial) {
        let steps = trial.steps();
        let Hyperparameters {
            alpha,
            gamma,
            initial_value,
            ..
        } = self.params;
        let before = self.table.len();

        for (index, step) in steps.iter().enumerate() {
            let immediate = reward(&step.state, Some(step.action));
            let is_last = index + 1 == steps.len();
            let lookahead = if is_last {
                0.0
            } else {
                self.max_q_value(&trial.next_state(index))
            };

            let entry = self
                .table
                .entry((step.state, step.action))
                .or_insert(QEntry {
                    value: initial_value,
                    visits: 0,
                });
            entry.visits += 1;

            if is_last {
                entry.value = immediate;
            } else {
                let target = immediate + gamma * lookahead;
                entry.value += alpha * (target - entry.value);
            }
        }

        debug!(
            decisions = steps.len(),
            new_pairs = self.table.len() - before,
            table_size = self.table.len(),
            "q-table updated"
        );
    }
}

impl Default for QFunction {
    fn default() -> Self {
        Self::new(Hyperparameters::default())
    }
}
