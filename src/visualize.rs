use std::fmt::Write;

use crate::action::Action;
use crate::ml::{EncodedState, Feature, StateEncoder, reward};
use crate::state::{GameStateView, GameStatus, Position};

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    pub show_border: bool,
    pub show_status: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_border: true,
            show_status: true,
        }
    }
}

/// Fine tune textual state descriptions.
#[derive(Clone, Copy, Debug, Default)]
pub struct DescribeOptions {
    /// List only the features that are set.
    pub only_set: bool,
}

const HEAD: char = 'H';
const BODY: char = 'o';
const FOOD: char = '*';
const EMPTY: char = '.';
const BORDER: char = '#';

pub fn render_state(state: &GameStateView) -> String {
    render_state_with_options(state, VisualOptions::default())
}

/// Draws the world one character per cell, top row first.
pub fn render_state_with_options(state: &GameStateView, options: VisualOptions) -> String {
    let mut out = String::new();
    if options.show_status {
        let status = match state.status {
            GameStatus::Running => "Running",
            GameStatus::Crashed => "Crashed",
            GameStatus::Filled => "Filled (no free cell left)",
        };
        let _ = writeln!(out, "Game status: {status}");
        let _ = writeln!(
            out,
            "Score: {}  |  Length: {}  |  Heading: {}  |  Steps since food: {}",
            state.score,
            state.body.len(),
            Action::from(state.direction),
            state.steps_since_food
        );
    }

    let settings = state.settings;
    let columns = settings.columns().max(0) as usize;
    let mut grid = vec![vec![EMPTY; columns]; settings.rows().max(0) as usize];
    let mut paint = |cell: Position, symbol: char| {
        if settings.is_cell(cell) {
            let row = (cell.y / settings.block) as usize;
            let column = (cell.x / settings.block) as usize;
            grid[row][column] = symbol;
        }
    };
    paint(state.food, FOOD);
    for cell in state.body.iter().skip(1) {
        paint(*cell, BODY);
    }
    if let Some(head) = state.body.first() {
        paint(*head, HEAD);
    }

    let edge: String = std::iter::repeat_n(BORDER, columns + 2).collect();
    if options.show_border {
        let _ = writeln!(out, "{edge}");
    }
    for row in grid {
        let line: String = row.into_iter().collect();
        if options.show_border {
            let _ = writeln!(out, "{BORDER}{line}{BORDER}");
        } else {
            let _ = writeln!(out, "{line}");
        }
    }
    if options.show_border {
        let _ = writeln!(out, "{edge}");
    }
    out
}

pub fn describe_state(state: &EncodedState) -> String {
    describe_state_with_options(state, DescribeOptions::default())
}

/// One line per feature, e.g. `Danger up: yes`.
pub fn describe_state_with_options(state: &EncodedState, options: DescribeOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "State {state}");
    for feature in Feature::ALL {
        let set = state.get(feature);
        if options.only_set && !set {
            continue;
        }
        let _ = writeln!(out, "  {}: {}", feature.label(), if set { "yes" } else { "no" });
    }
    out
}

/// Short description of what `action` would mean from `state`, with the
/// reward the learner would book for it.
pub fn describe_action(state: &GameStateView, action: Action) -> String {
    let encoded = StateEncoder::encode(state);
    let mut notes = Vec::new();
    if encoded.food_reachable_by(action) {
        notes.push("towards adjacent food");
    } else if encoded.get(Feature::food(action)) {
        notes.push("towards food");
    }
    if encoded.danger_towards(action) {
        notes.push("into danger");
    }
    if encoded.is_hungry() {
        notes.push("hungry");
    }
    let reward = reward(&encoded, Some(action));
    if notes.is_empty() {
        format!("Move {action} (reward {reward})")
    } else {
        format!("Move {action} ({}; reward {reward})", notes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    fn small_view() -> GameStateView {
        Game::builder()
            .with_size(100, 60, 20)
            .expect("valid size")
            .with_body(vec![
                Position::new(40, 20),
                Position::new(20, 20),
                Position::new(0, 20),
            ])
            .with_food(Position::new(60, 20))
            .build()
            .expect("game")
            .state_view()
    }

    #[test]
    fn render_marks_head_body_and_food() {
        let text = render_state(&small_view());
        assert!(text.contains("Game status: Running"));
        assert!(text.contains("Score: 0"));
        assert!(text.contains("#ooH*.#"));
        assert!(text.contains("#######"));
    }

    #[test]
    fn render_without_decorations_is_just_the_grid() {
        let options = VisualOptions {
            show_border: false,
            show_status: false,
        };
        let text = render_state_with_options(&small_view(), options);
        assert_eq!(text, ".....\nooH*.\n.....\n");
    }

    #[test]
    fn describe_lists_every_feature() {
        let state = StateEncoder::encode(&small_view());
        let text = describe_state(&state);
        assert!(text.contains("Snake moving right: yes"));
        assert!(text.contains("Food adjacent: yes"));
        assert!(text.contains("Hungry: no"));

        let only = describe_state_with_options(&state, DescribeOptions { only_set: true });
        assert!(!only.contains("Hungry"));
    }

    #[test]
    fn describe_action_reports_reward() {
        let view = small_view();
        let desc = describe_action(&view, Action::Right);
        assert!(desc.contains("towards adjacent food"));
        assert!(desc.contains("reward 50"));
        let desc = describe_action(&view, Action::Left);
        assert!(desc.contains("into danger"));
    }

    #[test]
    fn describe_action_notes_distant_food() {
        let mut view = small_view();
        view.food = Position::new(80, 0);
        let desc = describe_action(&view, Action::Up);
        assert!(desc.contains("towards food"));
        assert!(!desc.contains("adjacent"));
        assert!(desc.contains("reward -1"));
    }
}
