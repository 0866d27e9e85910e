//! Property tests for the knowledge base.
//!
//! Boards are random; the solver is driven with counts from the true mine map and checked
//! against it after every observation.

use std::collections::BTreeSet;

use minesweeper_inference::{Cell, Dims, GridOracle, KnowledgeBase, MineMap, Sentence};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn board() -> impl Strategy<Value = (MineMap, u64)> {
    (1usize..8, 1usize..8)
        .prop_flat_map(|(height, width)| (Just(Dims::new(height, width)), 0..=height * width, any::<u64>()))
        .prop_map(|(dims, nmines, seed)| {
            let mut rng = StdRng::seed_from_u64(seed);
            (MineMap::generate(dims, nmines, &mut rng).unwrap(), seed)
        })
}

fn check_against_truth(kb: &KnowledgeBase, truth: &BTreeSet<Cell>) {
    assert!(kb.safes().is_disjoint(kb.mines()));
    assert!(kb.moves_made().is_subset(kb.safes()));
    assert!(kb.mines().is_subset(truth), "mines {:?} vs truth {:?}", kb.mines(), truth);
    assert!(kb.safes().is_disjoint(truth), "safes {:?} vs truth {:?}", kb.safes(), truth);
    for sentence in kb.knowledge() {
        assert!(sentence.count() <= sentence.cells().len());
        assert_eq!(
            sentence.count(),
            sentence.cells().intersection(truth).count(),
            "unsound sentence {}",
            sentence
        );
        assert!(sentence.cells().is_disjoint(kb.safes()));
        assert!(sentence.cells().is_disjoint(kb.mines()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_solver_is_monotone_and_sound((mine_map, seed) in board()) {
        let truth = mine_map.mines();
        let mut kb = KnowledgeBase::new(mine_map.dims());
        let mut rng = StdRng::seed_from_u64(seed);

        loop {
            let cell = match kb.make_safe_move() {
                Some(cell) => cell,
                None => match kb.make_random_move(&mut rng) {
                    Some(cell) => cell,
                    None => break,
                },
            };
            if mine_map.is_mine(cell) {
                break;
            }
            let safes_before = kb.safes().clone();
            let mines_before = kb.mines().clone();

            kb.add_knowledge(cell, mine_map.neighbor_mine_count(cell)).unwrap();

            prop_assert!(safes_before.is_subset(kb.safes()));
            prop_assert!(mines_before.is_subset(kb.mines()));
            prop_assert!(kb.moves_made().contains(&cell));
            check_against_truth(&kb, &truth);
        }
    }

    #[test]
    fn prop_revealing_every_safe_cell_terminates((mine_map, _seed) in board()) {
        let truth = mine_map.mines();
        let mut kb = KnowledgeBase::new(mine_map.dims());
        for cell in mine_map.dims().cells() {
            if truth.contains(&cell) || kb.moves_made().contains(&cell) {
                continue;
            }
            kb.add_knowledge(cell, mine_map.neighbor_mine_count(cell)).unwrap();
        }
        check_against_truth(&kb, &truth);
        prop_assert_eq!(None, kb.make_safe_move());
    }

    #[test]
    fn prop_sentence_marks_shrink_by_one(
        cells in prop::collection::btree_set((0usize..5, 0usize..5), 1..10),
        pick in any::<prop::sample::Index>(),
    ) {
        let cells: Vec<Cell> = cells.into_iter().collect();
        let cell = cells[pick.index(cells.len())];
        let count = cells.len() / 2;

        let mut as_mine = Sentence::new(cells.clone(), count.max(1));
        as_mine.mark_mine(cell);
        prop_assert_eq!(cells.len() - 1, as_mine.cells().len());
        prop_assert_eq!(count.max(1) - 1, as_mine.count());

        let mut as_safe = Sentence::new(cells.clone(), count.min(cells.len() - 1));
        as_safe.mark_safe(cell);
        prop_assert_eq!(cells.len() - 1, as_safe.cells().len());
        prop_assert_eq!(count.min(cells.len() - 1), as_safe.count());

        // Marking a cell that isn't in the sentence changes nothing.
        let before = as_safe.clone();
        as_safe.mark_mine(cell);
        as_safe.mark_safe(cell);
        prop_assert_eq!(before, as_safe);
    }
}

#[test]
fn test_subset_difference_end_to_end() {
    // x x x
    // - - x
    // - - -
    let mine_map = MineMap::from_mines(Dims::new(3, 3), [(0, 0), (0, 1), (0, 2), (1, 2)]).unwrap();
    let mut kb = KnowledgeBase::new(mine_map.dims());
    for cell in [(2, 0), (1, 0), (2, 1)] {
        kb.add_knowledge(cell, mine_map.neighbor_mine_count(cell)).unwrap();
    }
    check_against_truth(&kb, &mine_map.mines());
    assert_eq!(BTreeSet::from([(0, 0), (0, 1)]), *kb.mines());
    assert!(kb.safes().contains(&(1, 1)));
    assert_eq!(vec![Sentence::new([(1, 2), (2, 2)], 1)], kb.knowledge().to_vec());

    // (1,1) sees {(0,2),(1,2),(2,2)} = 2 around {(1,2),(2,2)} = 1, leaving (0,2) a mine.
    kb.add_knowledge((1, 1), mine_map.neighbor_mine_count((1, 1))).unwrap();
    check_against_truth(&kb, &mine_map.mines());
    assert!(kb.mines().contains(&(0, 2)));
}
