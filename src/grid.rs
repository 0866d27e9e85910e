use crate::error::{SolverError, SolverResult};

///////////////////
// x x x x x x x //
// x x 1 2 1 x x //
// x 1 _ _ _ 1 x //
// 1 _ _ _ _ _ 1 //
///////////////////
///
/// Grid coordinates and neighborhood helpers
///

/// A `(row, col)` coordinate.
pub type Cell = (usize, usize);

/// Grid extent. Every cell handed to the solver is checked against this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub height: usize,
    pub width: usize,
}

impl Dims {
    pub fn new(height: usize, width: usize) -> Dims {
        Dims { height, width }
    }

    pub fn ncells(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, (i, j): Cell) -> bool {
        i < self.height && j < self.width
    }

    pub fn check(&self, cell: Cell) -> SolverResult<Cell> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(SolverError::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// The up-to-eight cells adjacent to `cell`, clipped at edges and corners.
    pub fn neighbors(&self, (i, j): Cell) -> Vec<Cell> {
        let mut neighbors = Vec::with_capacity(8);
        for ni in i.saturating_sub(1)..=(i + 1).min(self.height.saturating_sub(1)) {
            for nj in j.saturating_sub(1)..=(j + 1).min(self.width.saturating_sub(1)) {
                if (ni, nj) != (i, j) {
                    neighbors.push((ni, nj));
                }
            }
        }
        neighbors
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.ncells()).map(move |idx| (idx / width, idx % width))
    }
}

///
/// Common row-vector grid functions
///

pub fn get<T>(grid: &Vec<Vec<T>>, i: usize, j: usize) -> &T {
    &grid[i][j]
}

pub fn get_mut<T>(grid: &mut Vec<Vec<T>>, i: usize, j: usize) -> &mut T {
    &mut grid[i][j]
}

pub fn get_num_rows<T>(grid: &Vec<Vec<T>>) -> usize {
    grid.len()
}

pub fn get_num_cols<T>(grid: &Vec<Vec<T>>) -> usize {
    grid.first().map_or(0, |row| row.len())
}

pub fn get_dims<T>(grid: &Vec<Vec<T>>) -> Dims {
    Dims::new(get_num_rows(grid), get_num_cols(grid))
}

pub fn get_row_col_str<T>(grid: &Vec<Vec<T>>) -> String {
    format!("nrows: {}, ncols: {}\n", get_num_rows(grid), get_num_cols(grid))
}
