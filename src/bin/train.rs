use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use tracing::{debug, info};

use snakeq::game::DEFAULT_SEED;
use snakeq::ml::{checkpoint_file_name, load_agent, save_agent};
use snakeq::state::{BLOCK, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use snakeq::{Game, GameConfig, Hyperparameters, ScoreSummary, SnakeAgent, derive_seed};

#[derive(Parser, Debug)]
#[command(
    name = "train",
    about = "Train the snake Q-learning agent and write periodic checkpoints.",
    version
)]
struct TrainArgs {
    /// Number of training games to play in this run.
    #[arg(short = 'g', long = "games", default_value_t = 500)]
    games: u64,
    /// Save a checkpoint every N games (the checkpoint game itself is played greedily).
    #[arg(long = "checkpoint-every", default_value_t = 50)]
    checkpoint_every: u64,
    /// Directory where checkpoints will be written.
    #[arg(short = 'o', long = "output", default_value = "checkpoints")]
    output: PathBuf,
    /// Base seed; game N uses a seed derived from it and N.
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Resume from a checkpoint written by this program.
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Learning rate.
    #[arg(long, default_value_t = 0.1)]
    alpha: f64,
    /// Discount factor.
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,
    /// Value assumed for pairs that have no entry yet.
    #[arg(long = "initial-value", default_value_t = 0.0)]
    initial_value: f64,
    /// Visits below which a pair is treated optimistically.
    #[arg(long = "visit-threshold", default_value_t = 1)]
    visit_threshold: u32,
    /// Optimistic value used for under-visited pairs.
    #[arg(long = "exploration-bonus", default_value_t = 10_000.0)]
    exploration_bonus: f64,
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: i32,
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: i32,
    #[arg(long, default_value_t = BLOCK)]
    block: i32,
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = TrainArgs::parse();
    snakeq::logging::init(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: TrainArgs) -> Result<(), Box<dyn Error>> {
    if args.checkpoint_every == 0 {
        return Err("checkpoint-every must be positive".into());
    }
    let config = GameConfig::new(args.width, args.height, args.block, args.seed)?;

    let mut agent = match &args.resume {
        Some(path) => {
            let agent = load_agent(path)?;
            println!(
                "Resuming from {} ({} games played, {} table entries)",
                display_path(path),
                agent.games_played(),
                agent.q_function().len()
            );
            agent
        }
        None => {
            let params = Hyperparameters {
                alpha: args.alpha,
                gamma: args.gamma,
                initial_value: args.initial_value,
                visit_threshold: args.visit_threshold,
                exploration_bonus: args.exploration_bonus,
            };
            params.validate()?;
            SnakeAgent::new(params)
        }
    };

    fs::create_dir_all(&args.output)?;
    let visit_threshold = agent.q_function().hyperparameters().visit_threshold;
    let mut window: Vec<u32> = Vec::with_capacity(args.checkpoint_every as usize);

    info!(games = args.games, output = %display_path(&args.output), "training started");
    for _ in 0..args.games {
        let number = agent.games_played() + 1;
        let mut game = Game::new(config.with_seed(derive_seed(config.seed, number)))?;
        let checkpoint_game = number % args.checkpoint_every == 0;

        if checkpoint_game {
            agent.q_function_mut().set_visit_threshold(0);
        }
        let score = agent.play_game(&mut game, true);
        if checkpoint_game {
            agent.q_function_mut().set_visit_threshold(visit_threshold);
        }
        debug!(game = number, score, "training game finished");
        window.push(score);

        if checkpoint_game {
            let path = args.output.join(checkpoint_file_name(agent.games_played()));
            save_agent(&agent, &path)?;
            let summary = ScoreSummary::from_scores(&window);
            println!(
                "Game {number:>6}: greedy score {score:>3}  |  last {} games avg {:.2} (max {})  |  {} entries  -> {}",
                summary.games,
                summary.mean,
                summary.max,
                agent.q_function().len(),
                display_path(&path)
            );
            window.clear();
        }
    }

    info!(
        games_played = agent.games_played(),
        entries = agent.q_function().len(),
        "training finished"
    );
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
