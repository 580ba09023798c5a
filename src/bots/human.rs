use std::io::{self, BufRead, Write};

use crate::action::{Action, Direction};
use crate::bot::Bot;
use crate::ml::StateEncoder;
use crate::state::GameStateView;
use crate::visualize::{describe_state, render_state};

/// Interactive bot that reads moves from standard input.
pub struct HumanBot {
    name: String,
}

impl HumanBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for HumanBot {
    fn default() -> Self {
        Self::new("Human")
    }
}

/// Maps typed input to a move. Blank input keeps the current heading.
pub fn parse_move(input: &str, current: Direction) -> Option<Action> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => Some(Action::from(current)),
        "d" => Some(Action::Right),
        "a" => Some(Action::Left),
        "w" => Some(Action::Up),
        "s" => Some(Action::Down),
        other => Action::from_token(other),
    }
}

impl Bot for HumanBot {
    fn select_action(&mut self, state: &GameStateView) -> Option<Action> {
        let stdin = io::stdin();
        loop {
            println!("\n=== {} (score {}) ===", self.name, state.score);
            println!("{}", render_state(state));
            println!("{}", describe_state(&StateEncoder::encode(state)));
            println!("Move with right/left/up/down (or d/a/w/s), Enter to keep going, 'q' to quit.");
            print!("Move: ");
            if io::stdout().flush().is_err() {
                eprintln!("failed to flush stdout");
            }
            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(_) => {
                    eprintln!("failed to read input");
                    continue;
                }
            }
            let trimmed = input.trim();
            if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
                println!("Exiting game at user's request.");
                return None;
            }
            if let Some(action) = parse_move(trimmed, state.direction) {
                return Some(action);
            }
            println!("Invalid input: '{trimmed}'.");
        }
    }
}
