mod args;
mod engine;
mod report;

use analysis::{AnalysisConfig, GameAnalyzer};
use args::Args;
use clap::Parser;
use engine::UciEngine;
use log::{info, LevelFilter};
use report::{PlyLine, Summary};
use simplelog::{Config, SimpleLogger, WriteLogger};
use std::error::Error;
use std::fs::File;
use std::process;
use utils::GameRecord;

/// Exit status after an interrupt, as shells report SIGINT.
const INTERRUPTED: i32 = 130;

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    // Reject bad limits before anything is started
    let config = AnalysisConfig::from_limits(args.depth, args.time, args.centipawn)?;

    match (args.depth, args.time) {
        (None, None) => println!("INFO: Defaulting to {}", config.limit),
        _ => println!("Parsing [{}] at {}", args.pgn_file.display(), config.limit),
    }

    let game = GameRecord::from_file(&args.pgn_file)?;
    info!(
        "Loaded game {} vs {} ({} plies)",
        game.tag("White").unwrap_or("?"),
        game.tag("Black").unwrap_or("?"),
        game.moves.len()
    );

    let mut engine = UciEngine::start(&args.engine, &args.options)?;

    let terminator = engine.terminator();
    ctrlc::set_handler(move || {
        log::info!("Received SIGINT, stopping engine...");
        terminator.terminate();
        process::exit(INTERRUPTED);
    })?;

    let report = GameAnalyzer::new(config, &mut engine)
        .analyze(game.replay(), |record| println!("{}", PlyLine(record)))?;

    print!("{}", Summary(&report));

    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    if let Some(log_file) = &args.log_file {
        WriteLogger::init(LevelFilter::Debug, Config::default(), File::create(log_file)?)?;
    } else {
        let level = if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        SimpleLogger::init(level, Config::default())?;
    }

    Ok(args)
}
