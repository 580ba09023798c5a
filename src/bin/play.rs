use std::error::Error;
use std::process;
use std::thread;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::info;

use snakeq::game::DEFAULT_SEED;
use snakeq::state::{BLOCK, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use snakeq::{
    Game, GameConfig, STALL_LIMIT, ScoreSummary, create_bot_from_spec, derive_seed,
    describe_action, label_for_spec, render_state,
};

#[derive(Parser, Debug)]
#[command(
    name = "play",
    about = "Play snake games with a human, random or trained agent at the controls."
)]
struct Args {
    /// Bot spec: human[:name], random[:seed] or agent:<checkpoint path>.
    #[arg(default_value = "human")]
    bot: String,
    /// Number of games to play.
    #[arg(short = 'g', long = "games", default_value_t = 1)]
    games: u64,
    /// Base RNG seed for food placement.
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Print the board and the chosen move after every step.
    #[arg(long = "visualize", action = ArgAction::SetTrue)]
    visualize: bool,
    /// Pause between steps in milliseconds; does not change the simulated game.
    #[arg(long = "delay-ms", default_value_t = 0)]
    delay_ms: u64,
    /// Keep going when the score has not changed for a long time.
    #[arg(long = "no-stall-guard", action = ArgAction::SetTrue)]
    no_stall_guard: bool,
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
    let args = Args::parse();
    snakeq::logging::init(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = GameConfig::new(args.width, args.height, args.block, args.seed)?;
    let label = label_for_spec(&args.bot);
    let interactive = label == "human";
    let stall_guard = !interactive && !args.no_stall_guard;
    let delay = Duration::from_millis(args.delay_ms);
    let mut bot = create_bot_from_spec(&args.bot, 0, args.seed)?;

    let mut scores = Vec::new();
    'games: for index in 0..args.games {
        let mut game = Game::new(config.with_seed(derive_seed(config.seed, index)))?;
        let mut last_score = game.score();
        let mut stale_steps = 0u32;
        info!(game = index + 1, bot = %label, "game started");

        while !game.is_over() {
            if game.score() == last_score {
                stale_steps += 1;
            } else {
                last_score = game.score();
                stale_steps = 0;
            }
            if stall_guard && stale_steps > STALL_LIMIT {
                println!("No food for {STALL_LIMIT} moves, stopping this game.");
                break;
            }

            let view = game.state_view();
            if args.visualize && !interactive {
                println!("{}", render_state(&view));
            }
            let Some(action) = bot.select_action(&view) else {
                scores.push(game.score());
                break 'games;
            };
            if args.visualize {
                println!("Chosen move: {}\n", describe_action(&view, action));
            }
            game.step(action);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        if args.visualize || interactive {
            println!("{}", render_state(&game.state_view()));
        }
        println!("Game {} over ({:?}). Score: {}", index + 1, game.status(), game.score());
        scores.push(game.score());
    }

    if scores.len() > 1 {
        let summary = ScoreSummary::from_scores(&scores);
        println!(
            "\n{} games: avg {:.2}  min {}  max {}",
            summary.games, summary.mean, summary.min, summary.max
        );
    }
    Ok(())
}
