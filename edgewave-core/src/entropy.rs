use crate::grid::{Grid, Position};
use rand::{Rng, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// How to choose among the cells that share the lowest entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SelectionStrategy {
    /// Uniform pick among the tied cells, drawn from the solver's RNG.
    #[default]
    RandomLowest,
    /// First tied cell in linear-index order. Draws nothing from the RNG.
    FirstMinimum,
}

/// Picks the next cell to collapse.
pub trait CellScheduler: Debug {
    /// Returns the cell to collapse next, or `None` once every cell is resolved.
    fn select(&self, grid: &Grid, rng: &mut dyn RngCore) -> Option<Position>;
}

/// Minimum-remaining-values scheduler.
///
/// Entropy is the domain size: among unresolved cells the smallest domain wins,
/// and ties are broken according to the [`SelectionStrategy`].
#[derive(Debug, Clone, Default)]
pub struct EntropyScheduler {
    strategy: SelectionStrategy,
}

impl EntropyScheduler {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Unresolved cells with the smallest domain, in linear-index order.
    pub fn lowest_entropy_cells(grid: &Grid) -> Vec<Position> {
        let mut min_entropy = usize::MAX;
        let mut lowest_cells = Vec::new();
        for index in 0..grid.len() {
            if grid.is_resolved_at(index) {
                continue;
            }
            let entropy = grid.domain_size_at(index);
            if entropy < min_entropy {
                min_entropy = entropy;
                lowest_cells.clear();
            }
            if entropy == min_entropy {
                lowest_cells.push(grid.position(index));
            }
        }
        lowest_cells
    }
}

impl CellScheduler for EntropyScheduler {
    fn select(&self, grid: &Grid, rng: &mut dyn RngCore) -> Option<Position> {
        let lowest_cells = Self::lowest_entropy_cells(grid);
        match self.strategy {
            SelectionStrategy::FirstMinimum => lowest_cells.first().copied(),
            SelectionStrategy::RandomLowest => {
                if lowest_cells.is_empty() {
                    return None;
                }
                let pick = rng.gen_range(0..lowest_cells.len());
                lowest_cells.get(pick).copied()
            }
        }
    }
}
