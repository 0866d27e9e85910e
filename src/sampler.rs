use rand::Rng;

use crate::grid::{Cell, Dims};

/// Source of uniformly random cells, injected wherever the solver has to guess.
pub trait CellSampler {
    fn uniform_cell(&mut self, dims: Dims) -> Cell;
}

impl<R: Rng> CellSampler for R {
    fn uniform_cell(&mut self, dims: Dims) -> Cell {
        (self.gen_range(0..dims.height), self.gen_range(0..dims.width))
    }
}
