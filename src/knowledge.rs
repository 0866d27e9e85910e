use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::error::{SolverError, SolverResult};
use crate::grid::{Cell, Dims};
use crate::sampler::CellSampler;
use crate::sentence::Sentence;

/// Counters for one run of the propagation fixpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PropagationStats {
    pub passes: usize,
    pub mines_marked: usize,
    pub safes_marked: usize,
    pub sentences_inferred: usize,
}

///
/// Terms:
/// move: a cell that has been revealed and fed back through `add_knowledge`.
/// safe cell: a cell proven not to hold a mine. Every move is a safe cell.
/// mine cell: a cell proven to hold a mine.
/// sentence: "exactly n of these cells are mines", over cells that are neither safe nor mines.
///
/// The safe and mine sets only ever grow and never intersect. A cell that ends up in
/// both means the counts fed in were inconsistent, and the solver panics.
///
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    dims: Dims,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    knowledge: Vec<Sentence>,
}

impl KnowledgeBase {
    pub fn new(dims: Dims) -> KnowledgeBase {
        KnowledgeBase {
            dims,
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            knowledge: Vec::new(),
        }
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    fn is_classified(&self, cell: &Cell) -> bool {
        self.moves_made.contains(cell) || self.safes.contains(cell) || self.mines.contains(cell)
    }

    /// Record `cell` as a mine and remove it from every sentence.
    pub fn mark_mine(&mut self, cell: Cell) {
        assert!(
            !self.safes.contains(&cell),
            "contradiction: cell {:?} is known safe but was marked as a mine",
            cell
        );
        trace!(?cell, "mark mine");
        self.mines.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell);
        }
    }

    /// Record `cell` as safe and remove it from every sentence.
    pub fn mark_safe(&mut self, cell: Cell) {
        assert!(
            !self.mines.contains(&cell),
            "contradiction: cell {:?} is a known mine but was marked safe",
            cell
        );
        trace!(?cell, "mark safe");
        self.safes.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell);
        }
    }

    ///
    /// Called once the board tells us that the safe cell `cell` has `count` mines among its
    /// neighbors. Records the move, turns the hint into knowledge, and propagates until no
    /// new fact can be derived.
    ///
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> SolverResult<PropagationStats> {
        let cell = self.dims.check(cell)?;
        if self.moves_made.contains(&cell) {
            return Err(SolverError::AlreadyPlayed { cell });
        }
        let neighbors = self.dims.neighbors(cell);
        if count > neighbors.len() {
            return Err(SolverError::InvalidCount {
                cell,
                count,
                neighbors: neighbors.len(),
            });
        }

        self.moves_made.insert(cell);
        self.mark_safe(cell);

        // The hint counts mines we already know about as well; only the rest are spread
        // over the unexplored neighbors.
        let known_mines = neighbors.iter().filter(|n| self.mines.contains(*n)).count();
        let remaining = count.checked_sub(known_mines).unwrap_or_else(|| {
            panic!(
                "contradiction: cell {:?} reports {} mines but {} neighbors are known mines",
                cell, count, known_mines
            )
        });
        let unexplored: BTreeSet<Cell> = neighbors
            .into_iter()
            .filter(|n| !self.is_classified(n))
            .collect();

        if remaining == 0 {
            for neighbor in unexplored {
                self.mark_safe(neighbor);
            }
        } else if unexplored.len() <= remaining {
            assert_eq!(
                unexplored.len(),
                remaining,
                "contradiction: cell {:?} needs {} more mines among {} unexplored neighbors",
                cell,
                remaining,
                unexplored.len()
            );
            for neighbor in unexplored {
                self.mark_mine(neighbor);
            }
        } else {
            let sentence = Sentence::new(unexplored, remaining);
            trace!(%sentence, "new sentence");
            if !self.knowledge.contains(&sentence) {
                self.knowledge.push(sentence);
            }
        }

        let stats = self.propagate();
        debug!(
            ?cell,
            count,
            passes = stats.passes,
            mines_marked = stats.mines_marked,
            safes_marked = stats.safes_marked,
            sentences_inferred = stats.sentences_inferred,
            sentences = self.knowledge.len(),
            "knowledge updated"
        );
        Ok(stats)
    }

    /// Repeat mine extraction, safe extraction and subset inference until a whole pass
    /// derives nothing new.
    fn propagate(&mut self) -> PropagationStats {
        let mut stats = PropagationStats::default();
        loop {
            stats.passes += 1;
            let mut changed = false;

            let new_mines: BTreeSet<Cell> = self
                .knowledge
                .iter()
                .filter(|sentence| !sentence.is_empty())
                .filter_map(Sentence::known_mines)
                .flatten()
                .filter(|cell| !self.mines.contains(*cell))
                .copied()
                .collect();
            for cell in new_mines {
                changed = true;
                stats.mines_marked += 1;
                self.mark_mine(cell);
            }

            // A sentence with no mines left carries no more information once its cells
            // are marked safe.
            let mut new_safes: BTreeSet<Cell> = BTreeSet::new();
            self.knowledge.retain(|sentence| match sentence.known_safes() {
                Some(cells) => {
                    new_safes.extend(cells.iter().copied());
                    false
                }
                None => true,
            });
            new_safes.retain(|cell| !self.safes.contains(cell));
            for cell in new_safes {
                changed = true;
                stats.safes_marked += 1;
                self.mark_safe(cell);
            }

            let mut inferred: Vec<Sentence> = Vec::new();
            for subset in &self.knowledge {
                for superset in &self.knowledge {
                    if !subset.is_proper_subset(superset) {
                        continue;
                    }
                    let candidate = subset.difference(superset);
                    if !self.knowledge.contains(&candidate) && !inferred.contains(&candidate) {
                        trace!(%subset, %superset, %candidate, "subset inference");
                        inferred.push(candidate);
                    }
                }
            }
            if !inferred.is_empty() {
                changed = true;
                stats.sentences_inferred += inferred.len();
                self.knowledge.extend(inferred);
            }

            if !changed {
                break;
            }
        }
        stats
    }

    /// A cell known to be safe that hasn't been played yet, smallest first.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).next().copied()
    }

    ///
    /// A uniformly random cell that hasn't been played and isn't a known mine, or `None`
    /// if every cell is one or the other.
    ///
    pub fn make_random_move<S: CellSampler + ?Sized>(&self, sampler: &mut S) -> Option<Cell> {
        // moves_made is a subset of safes, so it never overlaps mines.
        if self.moves_made.len() + self.mines.len() >= self.dims.ncells() {
            return None;
        }
        loop {
            let cell = sampler.uniform_cell(self.dims);
            if !self.moves_made.contains(&cell) && !self.mines.contains(&cell) {
                return Some(cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cells(cells: &[Cell]) -> BTreeSet<Cell> {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_subset_inference_marks_mine() {
        let mut kb = KnowledgeBase::new(Dims::new(3, 4));
        kb.knowledge.push(Sentence::new([(1, 1), (1, 2)], 1));
        kb.knowledge.push(Sentence::new([(1, 1), (1, 2), (1, 3)], 2));
        let stats = kb.propagate();

        assert_eq!(cells(&[(1, 3)]), *kb.mines());
        assert!(kb.safes().is_empty());
        assert!(stats.sentences_inferred >= 1);
        assert_eq!(1, stats.mines_marked);
        for sentence in kb.knowledge() {
            assert!(!sentence.cells().contains(&(1, 3)));
        }
    }

    #[test]
    fn test_subset_inference_marks_safe() {
        let mut kb = KnowledgeBase::new(Dims::new(3, 4));
        kb.knowledge.push(Sentence::new([(0, 0), (0, 1)], 1));
        kb.knowledge.push(Sentence::new([(0, 0), (0, 1), (0, 2), (0, 3)], 1));
        kb.propagate();

        assert_eq!(cells(&[(0, 2), (0, 3)]), *kb.safes());
        assert!(kb.mines().is_empty());
    }

    #[test]
    fn test_zero_count_marks_neighbors_safe() {
        let mut kb = KnowledgeBase::new(Dims::new(3, 3));
        kb.add_knowledge((0, 0), 0).unwrap();
        assert_eq!(cells(&[(0, 0), (0, 1), (1, 0), (1, 1)]), *kb.safes());
        assert_eq!(cells(&[(0, 0)]), *kb.moves_made());
        assert!(kb.knowledge().is_empty());
    }

    #[test]
    fn test_full_count_marks_neighbors_mines() {
        let mut kb = KnowledgeBase::new(Dims::new(2, 2));
        kb.add_knowledge((0, 0), 3).unwrap();
        assert_eq!(cells(&[(0, 1), (1, 0), (1, 1)]), *kb.mines());
    }

    #[test]
    fn test_scenario_three_by_three() {
        // - - -
        // - - -
        // - - x
        let mut kb = KnowledgeBase::new(Dims::new(3, 3));
        kb.add_knowledge((0, 0), 0).unwrap();
        assert_eq!(cells(&[(0, 0), (0, 1), (1, 0), (1, 1)]), *kb.safes());

        kb.add_knowledge((1, 1), 1).unwrap();
        assert_eq!(1, kb.knowledge().len());

        kb.add_knowledge((1, 2), 1).unwrap();
        // {(0,2),(2,1),(2,2)} = 1 inside {(0,2),(2,0),(2,1),(2,2)} = 1 clears (2,0).
        assert!(kb.safes().contains(&(2, 0)));

        kb.add_knowledge((2, 1), 1).unwrap();
        assert_eq!(cells(&[(2, 2)]), *kb.mines());
        let expected_safes: BTreeSet<Cell> =
            Dims::new(3, 3).cells().filter(|c| *c != (2, 2)).collect();
        assert_eq!(expected_safes, *kb.safes());
        assert!(kb.knowledge().is_empty());
    }

    #[test]
    fn test_hint_discounts_known_mines() {
        // - x - -
        let mut kb = KnowledgeBase::new(Dims::new(1, 4));
        kb.add_knowledge((0, 0), 1).unwrap();
        assert_eq!(cells(&[(0, 1)]), *kb.mines());

        kb.add_knowledge((0, 2), 1).unwrap();
        assert!(kb.safes().contains(&(0, 3)));
        assert_eq!(cells(&[(0, 1)]), *kb.mines());
    }

    #[test]
    fn test_duplicate_observation_is_not_added_twice() {
        let mut kb = KnowledgeBase::new(Dims::new(3, 5));
        kb.knowledge.push(Sentence::new([(0, 3), (1, 3), (2, 3)], 1));
        kb.safes.extend([(0, 1), (1, 1), (2, 1), (0, 2), (2, 2)]);
        kb.moves_made.extend([(0, 1), (1, 1), (2, 1), (0, 2), (2, 2)]);
        kb.add_knowledge((1, 2), 1).unwrap();
        assert_eq!(vec![Sentence::new([(0, 3), (1, 3), (2, 3)], 1)], kb.knowledge().to_vec());
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let mut kb = KnowledgeBase::new(Dims::new(2, 2));
        assert!(matches!(
            kb.add_knowledge((2, 0), 0),
            Err(SolverError::OutOfBounds { .. })
        ));
        assert!(kb.moves_made().is_empty());
    }

    #[test]
    fn test_rejects_impossible_count() {
        let mut kb = KnowledgeBase::new(Dims::new(2, 2));
        assert!(matches!(
            kb.add_knowledge((0, 0), 4),
            Err(SolverError::InvalidCount { count: 4, neighbors: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_replayed_move() {
        let mut kb = KnowledgeBase::new(Dims::new(2, 2));
        kb.add_knowledge((0, 0), 1).unwrap();
        assert!(matches!(
            kb.add_knowledge((0, 0), 1),
            Err(SolverError::AlreadyPlayed { cell: (0, 0) })
        ));
    }

    #[should_panic(expected = "contradiction")]
    #[test]
    fn test_contradiction_panics() {
        let mut kb = KnowledgeBase::new(Dims::new(1, 3));
        kb.add_knowledge((0, 0), 0).unwrap();
        // (0,1) is already known safe, so (0,2) would need two mines.
        kb.add_knowledge((0, 1), 2).unwrap();
    }

    #[test]
    fn test_make_safe_move() {
        let mut kb = KnowledgeBase::new(Dims::new(3, 3));
        assert_eq!(None, kb.make_safe_move());
        kb.add_knowledge((0, 0), 0).unwrap();
        let before = kb.clone();
        let mv = kb.make_safe_move().unwrap();
        assert!(kb.safes().contains(&mv));
        assert!(!kb.moves_made().contains(&mv));
        assert_eq!(before.safes(), kb.safes());
        assert_eq!(before.moves_made(), kb.moves_made());
    }

    #[test]
    fn test_make_random_move_avoids_moves_and_mines() {
        let mut kb = KnowledgeBase::new(Dims::new(2, 2));
        kb.add_knowledge((0, 0), 3).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        // Only (0,0) has been played and the other three cells are mines.
        assert_eq!(None, kb.make_random_move(&mut rng));

        let mut kb = KnowledgeBase::new(Dims::new(3, 3));
        kb.add_knowledge((1, 1), 1).unwrap();
        for _ in 0..50 {
            let cell = kb.make_random_move(&mut rng).unwrap();
            assert_ne!((1, 1), cell);
        }
    }
}
