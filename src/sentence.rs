use std::collections::BTreeSet;
use std::fmt;

use crate::grid::Cell;

///
/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Sentences only ever shrink. Once a cell's status is known it is removed with
/// `mark_mine` or `mark_safe`; the caller is responsible for applying the same
/// fact to every other sentence it holds.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Sentence {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        assert!(
            count <= cells.len(),
            "inconsistent sentence: {} mines among {} cells",
            count,
            cells.len()
        );
        Sentence { cells, count }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every remaining cell, if every remaining cell must be a mine.
    pub fn known_mines(&self) -> Option<&BTreeSet<Cell>> {
        (self.count == self.cells.len()).then_some(&self.cells)
    }

    /// Every remaining cell, if none of them can be a mine.
    pub fn known_safes(&self) -> Option<&BTreeSet<Cell>> {
        (self.count == 0).then_some(&self.cells)
    }

    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            assert!(self.count > 0, "cell {:?} marked as a mine in a sentence with no mines left", cell);
            self.count -= 1;
        }
    }

    pub fn mark_safe(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            assert!(
                self.count <= self.cells.len(),
                "cell {:?} marked safe but the sentence needs all its cells to be mines",
                cell
            );
        }
    }

    /// `self.cells` is a proper subset of `other.cells`.
    pub fn is_proper_subset(&self, other: &Sentence) -> bool {
        self.cells.len() < other.cells.len() && self.cells.is_subset(&other.cells)
    }

    /// The sentence left over after removing `self` from a proper superset `other`.
    pub fn difference(&self, other: &Sentence) -> Sentence {
        assert!(
            self.count <= other.count,
            "subset {} carries more mines than superset {}",
            self,
            other
        );
        Sentence::new(other.cells.difference(&self.cells).copied(), other.count - self.count)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (i, j)) in self.cells.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", i, j)?;
        }
        write!(f, "}} = {}", self.count)
    }
}
