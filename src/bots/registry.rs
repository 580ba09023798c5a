use std::error::Error;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Bot;
use crate::game::derive_seed;
use crate::ml::load_agent;
use crate::{HumanBot, PolicyBot, RandomBot};

/// Returns a normalized label for a bot spec (the head token before any ':').
pub fn label_for_spec(spec: &str) -> String {
    spec.split(':')
        .next()
        .unwrap_or(spec)
        .trim()
        .to_ascii_lowercase()
}

/// Create a bot instance from a CLI-style spec.
/// Supported specs:
/// - human[:name]
/// - random[:seed]
/// - agent:<checkpoint path>
pub fn create_bot_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
) -> Result<Box<dyn Bot>, Box<dyn Error>> {
    let argument = spec.split_once(':').map(|(_, value)| value.trim());
    match label_for_spec(spec).as_str() {
        "human" => {
            let name = argument
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Human {index}"));
            Ok(Box::new(HumanBot::new(name)))
        }
        "random" => {
            let custom_seed = match argument {
                Some(value) => value
                    .parse::<u64>()
                    .map_err(|err| format!("invalid random seed '{value}': {err}"))?,
                None => derive_seed(seed, index as u64),
            };
            Ok(Box::new(RandomBot::new(StdRng::seed_from_u64(custom_seed))))
        }
        "agent" => {
            let path = argument
                .filter(|path| !path.is_empty())
                .ok_or("agent spec needs a checkpoint path, e.g. agent:checkpoints/agent_500_games.bin")?;
            let mut agent = load_agent(path)?;
            agent.exploit();
            Ok(Box::new(PolicyBot::new(agent)))
        }
        _ => Err(format!("unrecognized bot spec: {spec}").into()),
    }
}
