//! Core library for edge-label Wave Function Collapse.
//! Defines the tile catalog, the grid of candidate domains and the step-wise solver.

use rand::distributions::WeightedError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum-remaining-values cell scheduling.
pub mod entropy;
/// Grid of per-cell candidate domains.
pub mod grid;
/// Constraint propagation logic and traits.
pub mod propagator;
/// Re-running a solve under fresh seeds until it resolves.
pub mod retry;
/// Directions and the interned edge-label index.
pub mod rules;
/// The step-wise solver state machine.
pub mod solver;
/// Tiles, edge labels and the tile catalog.
pub mod tile;

pub use crate::entropy::{CellScheduler, EntropyScheduler, SelectionStrategy};
pub use crate::grid::{
    Cell, EmptyDomainError, Grid, GridError, InvalidCollapseError, Position,
};
pub use crate::propagator::{ConstraintPropagator, PropagationError, QueuePropagator};
pub use crate::retry::{until_resolved, until_resolved_with, RetryOutcome, SolveEvent};
pub use crate::rules::Direction;
pub use crate::solver::{
    Collapse, GridSnapshot, SolveStatus, Solver, SolverBuilder, StepReport, TerminalStateError,
};
pub use crate::tile::{Edges, Tile, TileId, TileSet, TileSetError};

/// Errors that can occur while building or stepping a [`Solver`].
///
/// A contradiction is not one of them: it is a terminal [`SolveStatus`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// `step()` was called after the solve finished.
    #[error(transparent)]
    TerminalState(#[from] TerminalStateError),
    /// An error related to grid dimensions or accessing grid data.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
    /// Propagation failed for a reason other than a contradiction.
    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),
    /// Error occurred during weighted random selection.
    #[error("Weighted selection error: {0}")]
    Weighted(#[from] WeightedError),
    /// An error occurred validating the TileSet or a tile id.
    #[error("TileSet configuration error: {0}")]
    TileSet(#[from] TileSetError),
    /// An error related to invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Information about the current state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressInfo {
    /// The number of cells committed to a tile.
    pub resolved_cells: usize,
    /// The total number of cells in the grid.
    pub total_cells: usize,
    /// The number of steps taken so far.
    pub steps: u64,
}

impl ProgressInfo {
    /// Completed share of the grid in `0.0..=100.0`.
    pub fn percentage(&self) -> f64 {
        if self.total_cells == 0 {
            return 100.0;
        }
        self.resolved_cells as f64 / self.total_cells as f64 * 100.0
    }
}
