//! minesweeper-inference CLI: watch the solver play, or play with its advice.

use std::io::{self, BufRead};
use std::num::ParseIntError;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use minesweeper_inference::config::GameConfig;
use minesweeper_inference::game::{Game, GameResult, MoveKind, Outcome};
use minesweeper_inference::Cell;

#[derive(Parser)]
#[command(name = "minesweeper-inference", version, about = "Knowledge-based minesweeper solver")]
struct Cli {
    /// TOML file with height, width, mines and seed.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of rows.
    #[arg(long, global = true)]
    height: Option<usize>,

    /// Number of columns.
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Number of mines.
    #[arg(long, global = true)]
    mines: Option<usize>,

    /// RNG seed for the mine layout and the solver's guesses.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the solver play on its own.
    Auto {
        /// Number of games to play. With more than one, only a tally is printed.
        #[arg(long, default_value = "1")]
        games: usize,
    },

    /// Play interactively, taking the solver's recommendation on an empty line.
    Play,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Auto { games } if games > 1 => auto_tally(&config, games),
        Commands::Auto { .. } => auto_single(&config),
        Commands::Play => minesweeper_repl(&config),
    }
}

fn resolve_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(mines) = cli.mines {
        config.mines = mines;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn auto_single(config: &GameConfig) -> Result<()> {
    let mut game = Game::new(config)?;
    println!("{}", game.render());
    while let Some((cell, kind)) = game.ai_move() {
        match kind {
            MoveKind::Safe => println!("Safe move: {:?}", cell),
            MoveKind::Random => println!("No known safe move, guessing: {:?}", cell),
        }
        match game.reveal(cell)? {
            Outcome::Exploded(cell) => {
                println!("Hit a mine at {:?}!\n{}", cell, game.mine_map());
                return Ok(());
            }
            Outcome::Won => {
                println!("{}", game.render());
                println!("All mines found - the solver wins!");
                return Ok(());
            }
            Outcome::Revealed { .. } => println!("{}", game.render()),
        }
    }
    println!("No moves left.");
    Ok(())
}

fn auto_tally(config: &GameConfig, games: usize) -> Result<()> {
    let mut wins = 0;
    let mut moves = 0;
    let mut guesses = 0;
    for idx in 0..games {
        // Derive a distinct seed per game so a seeded tally is reproducible.
        let game_config = GameConfig {
            seed: config.seed.map(|seed| seed.wrapping_add(idx as u64)),
            ..config.clone()
        };
        let summary = Game::new(&game_config)?.play_to_end()?;
        if summary.result == GameResult::Won {
            wins += 1;
        }
        moves += summary.moves;
        guesses += summary.random_moves;
    }
    println!(
        "won {}/{} games ({:.1}%), {} moves, {} guesses",
        wins,
        games,
        100.0 * wins as f64 / games as f64,
        moves,
        guesses
    );
    Ok(())
}

fn minesweeper_repl(config: &GameConfig) -> Result<()> {
    let mut game = Game::new(config)?;
    println!("Let's play minesweeper");
    println!("{}", game.render());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let recommendation = game.ai_move();
        match recommendation {
            Some((cell, MoveKind::Safe)) => println!("The solver recommends: {:?} (safe)", cell),
            Some((cell, MoveKind::Random)) => println!("The solver recommends: {:?} (guess)", cell),
            None => {
                println!("No more moves available - you win!");
                return Ok(());
            }
        }
        println!("Enter a move as: row,col (or enter to take the solver's recommendation)");
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let mark_str = line.into_diagnostic()?;

        let cell = if mark_str.trim().is_empty() {
            match recommendation {
                Some((cell, _)) => cell,
                None => continue,
            }
        } else {
            match parse_mark(&mark_str) {
                Some(cell) => cell,
                None => {
                    println!("Could not parse input as coordinates row,col: {}", mark_str);
                    continue;
                }
            }
        };

        match game.reveal(cell) {
            Ok(Outcome::Exploded(cell)) => {
                println!("Hit a mine! at {:?}:\n{}", cell, game.mine_map());
                return Ok(());
            }
            Ok(Outcome::Won) => {
                println!("{}", game.render());
                println!("All mines found - you win!");
                return Ok(());
            }
            Ok(Outcome::Revealed { .. }) => println!("{}", game.render()),
            Err(err) => println!("{}", err),
        }
    }
}

fn parse_mark(mark_str: &str) -> Option<Cell> {
    let maybe_mark: Vec<Result<usize, ParseIntError>> = mark_str
        .splitn(2, ',')
        .map(|coord_str| coord_str.trim().parse::<usize>())
        .collect();

    if maybe_mark.len() != 2 {
        return None;
    }
    let row = maybe_mark[0].as_ref().ok()?;
    let col = maybe_mark[1].as_ref().ok()?;
    Some((*row, *col))
}
