//! # Gloom Main Entry Point
//!
//! Headless driver: starts a game, reads input tokens from stdin
//! (whitespace separated key names such as `l l g i a`, or `@x,y` to click a
//! tile while targeting) and prints the text frame after every token.

use clap::Parser;
use env_logger::{Builder, Env};
use gloom::{FileSlot, Frame, Game, GameState, GloomResult, Input, MemorySlot, SaveSlot};
use log::{error, info, warn};
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Command line arguments for the Gloom driver.
#[derive(Parser, Debug)]
#[command(name = "gloom")]
#[command(about = "A turn-based dungeon crawler driven from stdin")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// File used by the save and load keys; kept in memory when omitted
    #[arg(long)]
    save_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(&args) {
        error!("Game aborted: {}", e);
        eprintln!("gloom: {}", e);
        std::process::exit(1);
    }
}

/// Initializes `env_logger`, letting `RUST_LOG` override the command line.
fn initialize_logging(log_level: &str) {
    let env = Env::default().default_filter_or(log_level);
    let _ = Builder::from_env(env).try_init();
}

fn run(args: &Args) -> GloomResult<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Starting Gloom v{} with seed {}", gloom::VERSION, seed);

    let slot: Box<dyn SaveSlot> = match &args.save_path {
        Some(path) => Box::new(FileSlot::new(path.clone())),
        None => Box::new(MemorySlot::new()),
    };
    let mut game = Game::new(GameState::new_game(seed)?, slot);
    println!("{}", Frame::capture(game.state())?.to_text());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        for token in line.split_whitespace() {
            let input = match Input::parse(token) {
                Ok(input) => input,
                Err(e) => {
                    warn!("Skipping input: {}", e);
                    continue;
                }
            };
            let outcome = game.handle_input(&input)?;
            info!("{} -> {:?}", token, outcome);
            println!("{}", Frame::capture(game.state())?.to_text());
        }
    }

    let stats = &game.state().statistics;
    info!(
        "Session over: {} turns, {} kills, deepest level {}",
        game.state().turn_number,
        stats.enemies_defeated,
        stats.max_depth_reached
    );
    Ok(())
}
