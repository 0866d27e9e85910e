use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;

use crate::error::{SolverError, SolverResult};
use crate::grid::{get_dims, Cell, Dims};

/// Answers questions about the hidden board. Must give the same answer every time for
/// a given game.
pub trait GridOracle {
    fn dims(&self) -> Dims;

    fn is_mine(&self, cell: Cell) -> bool;

    /// Mines among the up-to-eight cells around `cell`, not counting `cell` itself.
    fn neighbor_mine_count(&self, cell: Cell) -> usize {
        self.dims()
            .neighbors(cell)
            .into_iter()
            .filter(|n| self.is_mine(*n))
            .count()
    }
}

/// Ground-truth representation of a game (i.e. where the mines are)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineMap {
    dims: Dims,
    rows: Vec<Vec<bool>>,
}

impl MineMap {
    ///
    /// Generates a new height x width mine map with nmines mines
    /// distributed across the map uniformly at random.
    ///
    pub fn generate<R: Rng>(dims: Dims, nmines: usize, rng: &mut R) -> SolverResult<MineMap> {
        let ncells = dims.ncells();
        if nmines > ncells {
            return Err(SolverError::TooManyMines {
                height: dims.height,
                width: dims.width,
                max: ncells,
                requested: nmines,
            });
        }
        // Selection sampling: walking the cells in row-major order, pick each one with
        // probability n_left_to_pick / n_left_to_pick_from. This picks exactly nmines
        // cells, every subset equally likely.
        let mut n_picked = 0;
        let mine_cells = dims.cells().enumerate().filter(|(cell_idx, _)| {
            let n_left_to_pick = (nmines - n_picked) as f64;
            let n_left_to_pick_from = (ncells - cell_idx) as f64;
            let pick = rng.gen_bool(n_left_to_pick / n_left_to_pick_from);
            if pick {
                n_picked += 1;
            }
            pick
        });
        let mine_cells: Vec<Cell> = mine_cells.map(|(_, cell)| cell).collect();
        MineMap::from_mines(dims, mine_cells)
    }

    /// A map with mines at exactly the given cells.
    pub fn from_mines(dims: Dims, mines: impl IntoIterator<Item = Cell>) -> SolverResult<MineMap> {
        let mut rows = vec![vec![false; dims.width]; dims.height];
        for cell in mines {
            let (i, j) = dims.check(cell)?;
            rows[i][j] = true;
        }
        Ok(MineMap { dims, rows })
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> SolverResult<MineMap> {
        let dims = get_dims(&rows);
        if let Some(row) = rows.iter().position(|row| row.len() != dims.width) {
            return Err(SolverError::InvalidConfig {
                message: format!("row {} has {} columns, expected {}", row, rows[row].len(), dims.width),
            });
        }
        Ok(MineMap { dims, rows })
    }

    pub fn mines(&self) -> BTreeSet<Cell> {
        self.dims.cells().filter(|cell| self.is_mine(*cell)).collect()
    }

    pub fn nmines(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| **cell).count()
    }
}

impl GridOracle for MineMap {
    fn dims(&self) -> Dims {
        self.dims
    }

    fn is_mine(&self, (i, j): Cell) -> bool {
        self.rows[i][j]
    }
}

impl fmt::Display for MineMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("{}-", "--".repeat(self.dims.width));
        for row in &self.rows {
            writeln!(f, "{}", rule)?;
            for cell in row {
                f.write_str(if *cell { "|X" } else { "| " })?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", rule)
    }
}
