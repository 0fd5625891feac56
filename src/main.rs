//! # Mines of Nar'Gyl Main Entry Point
//!
//! Sets up logging, shows the main menu and runs the game loop on a plain
//! terminal.

use clap::Parser;
use log::{error, info, LevelFilter};
use nargyl::{
    config, Game, GenerationConfig, JsonFileSlot, MenuPresenter, NargylError, NargylResult,
    SaveSlot, TerminalDisplay,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Command line arguments for the Mines of Nar'Gyl.
#[derive(Parser, Debug)]
#[command(name = "nargyl")]
#[command(about = "A turn-based descent into the Mines of Nar'Gyl")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// File holding the saved game
    #[arg(long, default_value = "savegame.json")]
    save_path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Mines of Nar'Gyl v{}", nargyl::VERSION);

    if let Err(err) = run(&args) {
        error!("Fatal error: {}", err);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    let level = LevelFilter::from_str(log_level).unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

fn run(args: &Args) -> NargylResult<()> {
    let stdin = io::stdin();
    let mut display = TerminalDisplay::new(stdin.lock(), io::stdout());
    let slot = JsonFileSlot::new(&args.save_path);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);

    main_menu(&mut display, &slot, seed)
}

fn main_menu<R: BufRead, W: Write>(
    display: &mut TerminalDisplay<R, W>,
    slot: &JsonFileSlot,
    seed: u64,
) -> NargylResult<()> {
    let options = [
        "Play a new game".to_string(),
        "Continue last game".to_string(),
        "Quit".to_string(),
    ];

    loop {
        let choice = match display.menu("MINES OF NAR'GYL", &options, config::MAIN_MENU_WIDTH) {
            Ok(choice) => choice,
            Err(NargylError::Io(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
                info!("Input closed at the main menu");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        match choice {
            Some(0) => {
                let mut game = Game::new_game(GenerationConfig::new(seed))?;
                game.run(display, slot)?;
            }
            Some(1) => match slot.load() {
                Ok(data) => {
                    let mut game = Game::from_save(data, GenerationConfig::new(seed))?;
                    game.run(display, slot)?;
                }
                Err(NargylError::NoSavedGame) => {
                    display.message_box("No saved game to load.", config::MAIN_MENU_WIDTH)?;
                }
                Err(err) => return Err(err),
            },
            Some(2) => {
                info!("Player quit");
                return Ok(());
            }
            _ => {}
        }
    }
}
