use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::count_grid::{self, CountGrid};
use crate::error::SolverResult;
use crate::grid::Cell;
use crate::knowledge::KnowledgeBase;
use crate::mine_map::{GridOracle, MineMap};

/// How the solver arrived at a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Proven safe.
    Safe,
    /// Guessed; no safe move was known.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Revealed { cell: Cell, count: usize },
    Exploded(Cell),
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Won,
    Lost(Cell),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub result: GameResult,
    pub moves: usize,
    pub safe_moves: usize,
    pub random_moves: usize,
}

///
/// A single game: the hidden mine map, what the player has seen of it, and the solver's
/// knowledge. Every revealed cell is fed straight to the solver, so the revealed cells and
/// the solver's moves are always the same set.
///
pub struct Game<R> {
    mine_map: MineMap,
    count_grid: CountGrid,
    solver: KnowledgeBase,
    flags: BTreeSet<Cell>,
    rng: R,
}

impl Game<StdRng> {
    pub fn new(config: &GameConfig) -> SolverResult<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mine_map = MineMap::generate(config.dims(), config.mines, &mut rng)?;
        info!(
            height = config.height,
            width = config.width,
            mines = config.mines,
            seed = ?config.seed,
            "new game"
        );
        Ok(Game::with_mine_map(mine_map, rng))
    }
}

impl<R: Rng> Game<R> {
    pub fn with_mine_map(mine_map: MineMap, rng: R) -> Self {
        let dims = mine_map.dims();
        Game {
            mine_map,
            count_grid: count_grid::init_count_grid(dims),
            solver: KnowledgeBase::new(dims),
            flags: BTreeSet::new(),
            rng,
        }
    }

    pub fn mine_map(&self) -> &MineMap {
        &self.mine_map
    }

    pub fn count_grid(&self) -> &CountGrid {
        &self.count_grid
    }

    pub fn solver(&self) -> &KnowledgeBase {
        &self.solver
    }

    pub fn flags(&self) -> &BTreeSet<Cell> {
        &self.flags
    }

    pub fn render(&self) -> String {
        count_grid::render(&self.count_grid, &self.flags)
    }

    /// Every mine flagged, or every safe cell revealed.
    pub fn won(&self) -> bool {
        let nsafe = self.mine_map.dims().ncells() - self.mine_map.nmines();
        self.flags == self.mine_map.mines() || self.solver.moves_made().len() == nsafe
    }

    /// The solver's next move: a proven-safe cell if it knows one, otherwise a guess.
    pub fn ai_move(&mut self) -> Option<(Cell, MoveKind)> {
        if let Some(cell) = self.solver.make_safe_move() {
            return Some((cell, MoveKind::Safe));
        }
        self.solver
            .make_random_move(&mut self.rng)
            .map(|cell| (cell, MoveKind::Random))
    }

    /// Reveal `cell` and hand its count to the solver.
    pub fn reveal(&mut self, cell: Cell) -> SolverResult<Outcome> {
        let cell = self.mine_map.dims().check(cell)?;
        if self.mine_map.is_mine(cell) {
            info!(?cell, "hit a mine");
            return Ok(Outcome::Exploded(cell));
        }
        let count = count_grid::reveal(&mut self.count_grid, cell, &self.mine_map)?;
        self.solver.add_knowledge(cell, count)?;
        self.flags.extend(self.solver.mines().iter().copied());
        debug!(?cell, count, flags = self.flags.len(), "revealed");

        if self.won() {
            self.flags = self.mine_map.mines();
            info!(moves = self.solver.moves_made().len(), "won");
            return Ok(Outcome::Won);
        }
        Ok(Outcome::Revealed { cell, count })
    }

    /// Let the solver play until it wins or hits a mine.
    pub fn play_to_end(&mut self) -> SolverResult<GameSummary> {
        let mut moves = 0;
        let mut safe_moves = 0;
        let mut random_moves = 0;
        let result = loop {
            if self.won() {
                break GameResult::Won;
            }
            // With no move left, every unplayed cell is a known mine.
            let Some((cell, kind)) = self.ai_move() else {
                break GameResult::Won;
            };
            moves += 1;
            match kind {
                MoveKind::Safe => safe_moves += 1,
                MoveKind::Random => random_moves += 1,
            }
            match self.reveal(cell)? {
                Outcome::Exploded(cell) => break GameResult::Lost(cell),
                Outcome::Won => break GameResult::Won,
                Outcome::Revealed { .. } => {}
            }
        };
        Ok(GameSummary {
            result,
            moves,
            safe_moves,
            random_moves,
        })
    }
}
