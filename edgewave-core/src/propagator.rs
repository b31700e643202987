//! Constraint propagation logic and traits.

use crate::grid::{EmptyDomainError, Grid, GridError, Position};
use crate::tile::TileSet;
use std::fmt::Debug;
use thiserror::Error;

pub mod queue;

pub use queue::QueuePropagator;

/// Errors that can occur during the constraint propagation phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropagationError {
    /// A cell's domain became empty: no tile can satisfy its neighbours.
    #[error("Contradiction detected during propagation: {0}")]
    Contradiction(#[from] EmptyDomainError),
    /// The grid refused an update for a reason other than a contradiction.
    #[error("Grid error during propagation: {0}")]
    Grid(GridError),
}

impl From<GridError> for PropagationError {
    fn from(error: GridError) -> Self {
        match error {
            GridError::EmptyDomain(empty) => Self::Contradiction(empty),
            other => Self::Grid(other),
        }
    }
}

/// Trait defining the interface for a constraint propagation algorithm.
///
/// Implementors restore consistency in `grid` after the cells in `seeds`
/// changed, using the adjacency predicate of `tileset`.
pub trait ConstraintPropagator: Debug {
    /// Propagates constraints outward from `seeds` until nothing changes,
    /// appending every cell whose domain shrank to `narrowed` in first-change
    /// order.
    ///
    /// On `Err(PropagationError::Contradiction)` the cells narrowed before the
    /// failure keep their narrowed domains and are already in `narrowed`.
    fn propagate_into(
        &mut self,
        grid: &mut Grid,
        tileset: &TileSet,
        seeds: Vec<Position>,
        narrowed: &mut Vec<Position>,
    ) -> Result<(), PropagationError>;

    /// Propagates constraints outward from `seeds` until nothing changes.
    ///
    /// # Returns
    ///
    /// * `Ok(narrowed)` with every cell whose domain shrank, in first-change order.
    /// * `Err(PropagationError::Contradiction)` if a domain would become empty.
    ///   Use [`propagate_into`](Self::propagate_into) to keep the cells
    ///   narrowed before that point.
    fn propagate(
        &mut self,
        grid: &mut Grid,
        tileset: &TileSet,
        seeds: Vec<Position>,
    ) -> Result<Vec<Position>, PropagationError> {
        let mut narrowed = Vec::new();
        self.propagate_into(grid, tileset, seeds, &mut narrowed)?;
        Ok(narrowed)
    }
}
