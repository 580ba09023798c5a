use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use plotters::prelude::*;
use tracing::debug;

use snakeq::ml::{load_agent, parse_checkpoint_file_name};
use snakeq::state::{BLOCK, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use snakeq::{GameConfig, ScoreSummary};

/// Default base seed for evaluation games, shared by every checkpoint.
const DEFAULT_SEED: u64 = 0xE7A1_0A7E_5EED_0001;

#[derive(Parser, Debug)]
#[command(
    name = "evaluate",
    about = "Score every saved checkpoint greedily and plot the learning curve."
)]
struct Args {
    /// Directory holding agent_<games>_games.bin checkpoints.
    #[arg(short = 'd', long = "dir", default_value = "checkpoints")]
    dir: PathBuf,
    /// Games to play per checkpoint.
    #[arg(short = 'n', long = "samples", default_value_t = 20)]
    samples: usize,
    /// Base RNG seed; every checkpoint plays the same sequence of worlds.
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Output chart file (png).
    #[arg(short = 'o', long = "out", default_value = "learning_curve.png")]
    out: PathBuf,
    /// Show a textual summary only (no chart).
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,
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
    if args.samples == 0 {
        return Err("samples must be positive".into());
    }
    let config = GameConfig::new(args.width, args.height, args.block, args.seed)?;
    let checkpoints = find_checkpoints(&args.dir)?;
    if checkpoints.is_empty() {
        return Err(format!("no checkpoints found in {}", args.dir.display()).into());
    }

    println!("Average score over {} greedy games per checkpoint:", args.samples);
    let mut series: Vec<(u64, f64)> = Vec::with_capacity(checkpoints.len());
    for (games, path) in &checkpoints {
        let mut agent = load_agent(path)?;
        agent.exploit();
        let scores = agent.play_games(&config, args.samples, false)?;
        let summary = ScoreSummary::from_scores(&scores);
        debug!(games, path = %path.display(), mean = summary.mean, "checkpoint evaluated");
        println!(
            "  {games:>8} games  avg {:>7.2}  min {:>3}  max {:>3}  ({} entries)",
            summary.mean,
            summary.min,
            summary.max,
            agent.q_function().len()
        );
        series.push((*games, summary.mean));
    }

    if !args.no_chart {
        render_line_chart(&args.out, &series)?;
        println!("\nChart written to {}", args.out.display());
    }
    Ok(())
}

/// Checkpoints in `dir`, ordered by the number of games they were trained on.
fn find_checkpoints(dir: &Path) -> Result<Vec<(u64, PathBuf)>, Box<dyn Error>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(games) = name.to_str().and_then(parse_checkpoint_file_name) {
            found.push((games, entry.path()));
        }
    }
    found.sort_by_key(|(games, _)| *games);
    Ok(found)
}

fn render_line_chart(out: &Path, data: &[(u64, f64)]) -> Result<(), Box<dyn Error>> {
    let max_games = data.iter().map(|(games, _)| *games).max().unwrap_or(1).max(1);
    let max_score = data
        .iter()
        .map(|(_, score)| *score)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Snake agent: average score vs. games played",
            ("sans-serif", 28).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0u64..max_games, 0.0f64..max_score * 1.1)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc("Average score")
        .x_desc("Games played")
        .y_label_formatter(&|v| format!("{v:.1}"))
        .draw()
        .map_err(|e| format!("{e}"))?;

    chart
        .draw_series(LineSeries::new(data.iter().copied(), &BLUE))
        .map_err(|e| format!("{e}"))?;
    chart
        .draw_series(
            data.iter()
                .map(|(games, score)| Circle::new((*games, *score), 3, BLUE.filled())),
        )
        .map_err(|e| format!("{e}"))?;

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
