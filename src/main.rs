//! Pipe Dash headless driver
//!
//! Runs the simulation at the reference 60 Hz rate without a window. Taps come
//! from the command line or the autopilot; audio cues are logged. The final
//! renderer snapshot is printed as JSON.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use pipe_dash::consts::SIM_DT;
use pipe_dash::sim::{GameEvent, GamePhase};
use pipe_dash::{GameSimulation, LogCues, SimConfig};

/// Pipe Dash simulation driver
#[derive(Parser)]
#[command(version, about = "Runs a headless Pipe Dash session and prints the final snapshot")]
struct Cli {
    /// RNG seed for obstacle placement
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// JSON tuning file (missing fields use defaults)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Let the autopilot play
    #[arg(long)]
    autopilot: bool,

    /// Tap at these simulated times (seconds)
    #[arg(long, value_name = "SECS", num_args = 1..)]
    taps_at: Vec<f32>,

    /// Tap to restart as soon as a run ends
    #[arg(long)]
    restart_on_crash: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    log::info!("Pipe Dash starting with seed {}", cli.seed);

    let mut game = GameSimulation::new(config, cli.seed).with_audio(Box::new(LogCues::new()));
    game.set_autopilot(cli.autopilot);

    let mut taps = cli.taps_at.clone();
    taps.sort_by(f32::total_cmp);
    let mut taps = taps.into_iter().peekable();

    let frames = (cli.seconds.max(0.0) / SIM_DT).round() as u64;
    let mut best = 0;
    for frame in 0..frames {
        let now = frame as f32 * SIM_DT;
        let mut tapped = false;
        while taps.next_if(|&t| t <= now).is_some() {
            tapped = true;
        }
        if tapped || (cli.restart_on_crash && game.phase() == GamePhase::Ended) {
            game.on_tap();
        }

        for event in game.tick(SIM_DT) {
            match event {
                GameEvent::Scored { score } => {
                    best = best.max(score);
                    log::info!("t={now:.2}s score {score}");
                }
                GameEvent::Hit { by } => log::info!("t={now:.2}s crashed into {by:?}"),
                GameEvent::Started => log::info!("t={now:.2}s run started"),
                other => log::debug!("t={now:.2}s {other:?}"),
            }
        }
    }

    log::info!(
        "Finished {:.1}s: phase {:?}, score {}, best {}",
        cli.seconds,
        game.phase(),
        game.score(),
        best
    );
    println!("{}", game.snapshot().to_json()?);
    Ok(())
}
