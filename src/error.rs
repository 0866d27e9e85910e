//! Error types for the solver, the board and game configuration.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::grid::Cell;

/// Errors raised on invalid input to the solver or the game around it.
///
/// Logical contradictions inside the knowledge base are not represented here:
/// they mean the oracle lied or a move was replayed inconsistently, and the
/// solver panics on them.
#[derive(Debug, Error, Diagnostic)]
pub enum SolverError {
    #[error("cell {cell:?} is outside the {height}x{width} grid")]
    #[diagnostic(
        code(mines::out_of_bounds),
        help("Rows range over 0..height and columns over 0..width.")
    )]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("cell {cell:?} reports {count} neighboring mines but has only {neighbors} neighbors")]
    #[diagnostic(
        code(mines::invalid_count),
        help("Counts must come from the grid oracle for this game.")
    )]
    InvalidCount {
        cell: Cell,
        count: usize,
        neighbors: usize,
    },

    #[error("cell {cell:?} has already been played")]
    #[diagnostic(code(mines::already_played))]
    AlreadyPlayed { cell: Cell },

    #[error("cell {cell:?} has already been revealed")]
    #[diagnostic(code(mines::already_revealed))]
    AlreadyRevealed { cell: Cell },

    #[error("too many mines: a {height}x{width} grid holds at most {max}, requested {requested}")]
    #[diagnostic(
        code(mines::too_many_mines),
        help("Lower --mines or enlarge the grid.")
    )]
    TooManyMines {
        height: usize,
        width: usize,
        max: usize,
        requested: usize,
    },

    #[error("invalid game configuration: {message}")]
    #[diagnostic(code(mines::config::invalid))]
    InvalidConfig { message: String },

    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(mines::config::io))]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {source}")]
    #[diagnostic(
        code(mines::config::parse),
        help("Expected TOML keys: height, width, mines, seed.")
    )]
    ConfigParse {
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for solver and game operations.
pub type SolverResult<T> = std::result::Result<T, SolverError>;
