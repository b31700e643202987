mod common;

use edgewave_core::{
    Position, SelectionStrategy, SolveStatus, Solver, SolverError, TerminalStateError, TileId,
};
use proptest::prelude::*;
use std::collections::HashMap;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_a_b_pair_always_resolves() {
    init_logger();
    let tileset = common::a_b_pair();
    let a = tileset.id_by_name("A").unwrap();
    let b = tileset.id_by_name("B").unwrap();
    for seed in 0..20 {
        let mut solver = Solver::new(tileset.clone(), 2, 1, seed).unwrap();
        assert_eq!(solver.run().unwrap(), SolveStatus::Resolved);
        assert_eq!(solver.grid().chosen(Position::new(0, 0)), Some(a));
        assert_eq!(solver.grid().chosen(Position::new(1, 0)), Some(b));
    }
}

#[test]
fn test_initial_contradiction_is_reported_at_build() {
    init_logger();
    let tileset = std::sync::Arc::new(
        edgewave_core::TileSet::new(vec![edgewave_core::Tile::new(
            "lonely",
            edgewave_core::Edges::new("u", "d", "y", "x"),
        )])
        .unwrap(),
    );
    let mut solver = Solver::new(tileset, 2, 1, 0).unwrap();
    let expected = SolveStatus::Contradiction {
        at: Position::new(1, 0),
    };
    assert_eq!(solver.status(), expected);
    assert_eq!(solver.steps(), 0);
    assert_eq!(
        solver.step(),
        Err(SolverError::TerminalState(TerminalStateError {
            status: expected
        }))
    );
}

#[test]
fn test_parity_ring_always_contradicts() {
    init_logger();
    let (tileset, domains) = common::parity_ring();
    for seed in 0..25 {
        let mut builder = Solver::builder(tileset.clone(), 2, 2).seed(seed);
        for (position, tiles) in &domains {
            builder = builder.initial_domain(*position, tiles.clone());
        }
        let mut solver = builder.build().unwrap();
        assert_eq!(solver.status(), SolveStatus::InProgress);

        let before = solver.grid().clone();
        let report = solver.step().unwrap();
        assert!(report.collapsed.is_some());
        assert!(matches!(report.status, SolveStatus::Contradiction { .. }));

        // Cells narrowed before the contradiction are still reported.
        assert!(!report.narrowed.is_empty());
        for position in solver.grid().positions() {
            let changed = before.domain(position) != solver.grid().domain(position);
            if changed && !solver.grid().is_resolved(position) {
                assert!(
                    report.narrowed.contains(&position),
                    "{position} narrowed but missing from {:?}",
                    report.narrowed
                );
            }
        }
        assert!(solver.step().is_err());
    }
}

#[test]
fn test_single_cell_distribution_is_uniform() {
    let tileset = common::uniform(3);
    let mut counts: HashMap<TileId, usize> = HashMap::new();
    for seed in 0..300 {
        let mut solver = Solver::new(tileset.clone(), 1, 1, seed).unwrap();
        assert_eq!(solver.run().unwrap(), SolveStatus::Resolved);
        let tile = solver.grid().chosen(Position::new(0, 0)).unwrap();
        *counts.entry(tile).or_default() += 1;
    }
    assert_eq!(counts.len(), 3);
    for (tile, count) in counts {
        assert!(count > 50, "tile {tile} chosen only {count}/300 times");
    }
}

#[test]
fn test_first_minimum_collapses_in_linear_order() {
    let tileset = common::uniform(2);
    let mut solver = Solver::builder(tileset, 3, 2)
        .seed(17)
        .selection_strategy(SelectionStrategy::FirstMinimum)
        .build()
        .unwrap();
    solver.run().unwrap();
    let order: Vec<Position> = solver.history().iter().map(|c| c.position).collect();
    let expected: Vec<Position> = solver.grid().positions().collect();
    assert_eq!(order, expected);
}

#[test]
fn test_run_after_resolution_returns_status() {
    let mut solver = Solver::new(common::uniform(2), 2, 2, 1).unwrap();
    assert_eq!(solver.run().unwrap(), SolveStatus::Resolved);
    assert_eq!(solver.run().unwrap(), SolveStatus::Resolved);
    assert_eq!(solver.steps(), 4);
}

#[test]
fn test_invalid_dimensions() {
    let result = Solver::new(common::uniform(2), 0, 4, 0);
    assert!(matches!(result, Err(SolverError::Grid(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_domains_only_shrink(seed in any::<u64>(), width in 1usize..7, height in 1usize..7) {
        let tileset = common::pipes();
        let mut solver = Solver::new(tileset, width, height, seed).unwrap();
        let mut previous = solver.grid().clone();
        while !solver.status().is_terminal() {
            solver.step().unwrap();
            for position in previous.positions() {
                let before = previous.domain(position).unwrap();
                let after = solver.grid().domain(position).unwrap();
                prop_assert!(after.iter().all(|tile| before.contains(tile)));
                if let Some(tile) = previous.chosen(position) {
                    prop_assert_eq!(solver.grid().chosen(position), Some(tile));
                }
            }
            previous = solver.grid().clone();
        }
    }

    #[test]
    fn prop_arc_consistent_after_each_step(seed in any::<u64>(), width in 1usize..7, height in 1usize..7) {
        let tileset = common::pipes();
        let mut solver = Solver::new(tileset.clone(), width, height, seed).unwrap();
        while !solver.status().is_terminal() {
            let report = solver.step().unwrap();
            if !matches!(report.status, SolveStatus::Contradiction { .. }) {
                prop_assert!(common::is_arc_consistent(solver.grid(), &tileset));
            }
        }
    }

    #[test]
    fn prop_same_seed_same_solve(seed in any::<u64>(), width in 1usize..6, height in 1usize..6) {
        let tileset = common::pipes();
        let mut first = Solver::new(tileset.clone(), width, height, seed).unwrap();
        let mut second = Solver::new(tileset, width, height, seed).unwrap();
        prop_assert_eq!(first.run().unwrap(), second.run().unwrap());
        prop_assert_eq!(first.history(), second.history());
        prop_assert_eq!(first.snapshot(), second.snapshot());
    }

    #[test]
    fn prop_resolved_grids_are_total(seed in any::<u64>(), width in 1usize..7, height in 1usize..7) {
        let tileset = common::pipes();
        let mut solver = Solver::new(tileset.clone(), width, height, seed).unwrap();
        if solver.run().unwrap() == SolveStatus::Resolved {
            prop_assert!(solver.grid().all_resolved());
            prop_assert!(common::resolved_pairs_compatible(solver.grid(), &tileset));
            prop_assert_eq!(solver.history().len(), width * height);
        }
    }
}
