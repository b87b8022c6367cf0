use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "centipawn")]
#[command(author = "Jørgen Hanssen <jorgen@hanssen.io>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Centipawn loss of every move in a PGN game, scored by a UCI engine")]
pub struct Args {
    /// PGN file to analyse. Only the first game is read.
    pub pgn_file: PathBuf,

    /// Search depth per position. Defaults to 10 when no time is given.
    #[arg(short, long)]
    pub depth: Option<u8>,

    /// Search time per position, in seconds.
    #[arg(short, long)]
    pub time: Option<f64>,

    /// Include trailing centipawn loss statistics.
    #[arg(short, long)]
    pub centipawn: bool,

    /// UCI engine executable.
    #[arg(short, long, default_value = "stockfish")]
    pub engine: PathBuf,

    /// Engine option as NAME=VALUE, may be repeated.
    #[arg(short, long = "option", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    #[arg(short, long)]
    pub verbose: bool,

    /// Log engine communication to a file for debugging.
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,
}

fn parse_option(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing option name in '{}'", s));
    }

    Ok((name.to_string(), value.trim().to_string()))
}
