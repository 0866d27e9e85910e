use std::collections::BTreeSet;

use crate::error::{SolverError, SolverResult};
use crate::grid::*;
use crate::mine_map::GridOracle;

// Board shown to the player, kept independently from the mine map itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountCell {
    pub neighbor_mine_count: i32,
}

impl CountCell {
    pub fn is_revealed(&self) -> bool {
        self.neighbor_mine_count != UNKNOWN_CELL_COUNT
    }
}

pub type CountGrid = Vec<Vec<CountCell>>;

const UNKNOWN_CELL_COUNT: i32 = -1;

pub fn init_count_grid(dims: Dims) -> CountGrid {
    vec![vec![CountCell { neighbor_mine_count: UNKNOWN_CELL_COUNT }; dims.width]; dims.height]
}

/// Reveal a single cell and return its neighbor mine count.
pub fn reveal(count_grid: &mut CountGrid, cell: Cell, oracle: &impl GridOracle) -> SolverResult<usize> {
    let (i, j) = get_dims(count_grid).check(cell)?;
    // Revealing a mine ends the game; callers check for it first.
    if oracle.is_mine(cell) {
        panic!("revealed cell {i},{j} is a mine");
    }
    let cur_cell: &mut CountCell = get_mut(count_grid, i, j);
    if cur_cell.is_revealed() {
        return Err(SolverError::AlreadyRevealed { cell });
    }
    let count = oracle.neighbor_mine_count(cell);
    cur_cell.neighbor_mine_count = count as i32;
    Ok(count)
}

pub fn is_revealed(count_grid: &CountGrid, (i, j): Cell) -> bool {
    get(count_grid, i, j).is_revealed()
}

pub fn flatten_cells(count_grid: &CountGrid) -> Vec<Vec<i32>> {
    count_grid
        .iter()
        .map(|row| row.iter().map(|cell| cell.neighbor_mine_count).collect())
        .collect()
}

pub fn from_vec(count_grid_vec: Vec<Vec<i32>>) -> CountGrid {
    count_grid_vec
        .iter()
        .map(|row| row.iter().map(|count| CountCell { neighbor_mine_count: *count }).collect())
        .collect()
}

/// Render the board: `F` for flagged cells, the count for revealed ones, `-` otherwise.
pub fn render(count_grid: &CountGrid, flags: &BTreeSet<Cell>) -> String {
    let mut str = get_row_col_str(count_grid);
    for (i, row) in count_grid.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            if flags.contains(&(i, j)) {
                str.push_str("F ");
            } else if cell.is_revealed() {
                str.push_str(&format!("{} ", cell.neighbor_mine_count));
            } else {
                str.push_str("- ");
            }
        }
        str.push('\n');
    }
    str
}
