use crate::{
    entropy::{CellScheduler, EntropyScheduler, SelectionStrategy},
    grid::{Grid, Position},
    propagator::{ConstraintPropagator, PropagationError, QueuePropagator},
    tile::{TileId, TileSet},
    ProgressInfo, SolverError,
};
use log::{debug, info, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Where a solve stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolveStatus {
    InProgress,
    /// Every cell is resolved and no contradiction was ever raised.
    Resolved,
    /// The domain of `at` became empty.
    Contradiction { at: Position },
}

impl SolveStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Resolved => write!(f, "resolved"),
            Self::Contradiction { at } => write!(f, "contradiction at {at}"),
        }
    }
}

/// `step()` was called after the solve had already finished.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Solver already finished ({status}); no further steps are valid")]
pub struct TerminalStateError {
    pub status: SolveStatus,
}

/// One committed decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Collapse {
    pub position: Position,
    pub tile: TileId,
}

/// What a single `step()` changed, enough for a renderer to redraw only that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// The cell committed this step; `None` when nothing was left to collapse.
    pub collapsed: Option<Collapse>,
    /// Cells whose domain shrank during propagation, including those narrowed
    /// before a contradiction stopped it.
    pub narrowed: Vec<Position>,
    pub status: SolveStatus,
}

/// Resolved tile per cell in linear-index order (`None` for unresolved cells).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Option<TileId>>,
}

impl GridSnapshot {
    pub fn get(&self, position: Position) -> Option<TileId> {
        if position.x >= self.width || position.y >= self.height {
            return None;
        }
        let index = position
            .y
            .checked_mul(self.width)
            .and_then(|row| row.checked_add(position.x))?;
        self.cells.get(index).copied().flatten()
    }

    /// Rows of the snapshot, top to bottom. Empty when `width` is zero.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<TileId>]> {
        let cells: &[Option<TileId>] = if self.width == 0 { &[] } else { &self.cells };
        cells.chunks(self.width.max(1))
    }
}

/// Builder for [`Solver`].
///
/// Allows for a more ergonomic construction than passing every knob at once.
pub struct SolverBuilder {
    tileset: Arc<TileSet>,
    width: usize,
    height: usize,
    seed: Option<u64>,
    initial_domains: Vec<(Position, Vec<TileId>)>,
    scheduler: Option<Box<dyn CellScheduler>>,
    propagator: Option<Box<dyn ConstraintPropagator>>,
}

impl SolverBuilder {
    /// Seed for the solver's RNG. Without one a random seed is drawn and logged.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Narrows the starting domain of `position` to `tiles`.
    ///
    /// May be called repeatedly; restrictions on the same cell intersect.
    pub fn initial_domain(mut self, position: Position, tiles: Vec<TileId>) -> Self {
        self.initial_domains.push((position, tiles));
        self
    }

    /// Uses an `EntropyScheduler` with the given tie-break strategy.
    pub fn selection_strategy(self, strategy: SelectionStrategy) -> Self {
        self.scheduler(Box::new(EntropyScheduler::new(strategy)))
    }

    pub fn scheduler(mut self, scheduler: Box<dyn CellScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn propagator(mut self, propagator: Box<dyn ConstraintPropagator>) -> Self {
        self.propagator = Some(propagator);
        self
    }

    /// Creates the grid, applies initial domains and runs an initial propagation
    /// pass seeded from every cell.
    ///
    /// A contradiction found here does not fail the build: the solver starts in
    /// the terminal `Contradiction` state instead.
    ///
    /// # Errors
    ///
    /// `SolverError::Grid` for zero dimensions or out-of-bounds initial domains,
    /// `SolverError::TileSet` for initial domains naming unknown tiles.
    pub fn build(self) -> Result<Solver, SolverError> {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut grid = Grid::new(self.width, self.height, self.tileset.len())?;
        let mut propagator = self
            .propagator
            .unwrap_or_else(|| Box::new(QueuePropagator::new()));
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Box::new(EntropyScheduler::default()));

        info!(
            "Creating {}x{} solver over {} tiles with seed {}",
            self.width,
            self.height,
            self.tileset.len(),
            seed
        );

        let mut status = SolveStatus::InProgress;
        for (position, tiles) in &self.initial_domains {
            let mask = self.tileset.mask(tiles)?;
            match grid.restrict_domain(*position, &mask) {
                Ok(_) => {}
                Err(crate::grid::GridError::EmptyDomain(empty)) => {
                    warn!("Initial domain of {} is empty", empty.position);
                    status = SolveStatus::Contradiction {
                        at: empty.position,
                    };
                    break;
                }
                Err(other) => return Err(other.into()),
            }
        }

        if status == SolveStatus::InProgress {
            let all_cells: Vec<Position> = grid.positions().collect();
            match propagator.propagate(&mut grid, &self.tileset, all_cells) {
                Ok(narrowed) => debug!(
                    "Initial propagation narrowed {} cells",
                    narrowed.len()
                ),
                Err(PropagationError::Contradiction(empty)) => {
                    warn!(
                        "Initial propagation found a contradiction at {}",
                        empty.position
                    );
                    status = SolveStatus::Contradiction {
                        at: empty.position,
                    };
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok(Solver {
            tileset: self.tileset,
            grid,
            scheduler,
            propagator,
            rng: StdRng::seed_from_u64(seed),
            seed,
            status,
            history: Vec::new(),
            steps: 0,
        })
    }
}

/// Step-wise entropy-guided solver.
///
/// Each [`Solver::step`] picks the lowest-entropy cell, commits it to a tile
/// drawn by weight from its domain and propagates the consequences to a fixed
/// point before returning. All randomness comes from one RNG seeded at build
/// time, so a seed replays the same sequence of collapses.
pub struct Solver {
    tileset: Arc<TileSet>,
    grid: Grid,
    scheduler: Box<dyn CellScheduler>,
    propagator: Box<dyn ConstraintPropagator>,
    rng: StdRng,
    seed: u64,
    status: SolveStatus,
    history: Vec<Collapse>,
    steps: u64,
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("seed", &self.seed)
            .field("status", &self.status)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl Solver {
    pub fn builder(tileset: Arc<TileSet>, width: usize, height: usize) -> SolverBuilder {
        SolverBuilder {
            tileset,
            width,
            height,
            seed: None,
            initial_domains: Vec::new(),
            scheduler: None,
            propagator: None,
        }
    }

    /// Default scheduler and propagator, full initial domains.
    pub fn new(
        tileset: Arc<TileSet>,
        width: usize,
        height: usize,
        seed: u64,
    ) -> Result<Self, SolverError> {
        Self::builder(tileset, width, height).seed(seed).build()
    }

    /// Performs one observe / collapse / propagate cycle.
    ///
    /// # Errors
    ///
    /// `SolverError::TerminalState` once the solve is `Resolved` or
    /// `Contradiction`. A contradiction raised by this step is not an error; it
    /// is reported through `StepReport::status`.
    pub fn step(&mut self) -> Result<StepReport, SolverError> {
        if self.status.is_terminal() {
            return Err(TerminalStateError {
                status: self.status,
            }
            .into());
        }
        let Some(position) = self.scheduler.select(&self.grid, &mut self.rng) else {
            self.status = SolveStatus::Resolved;
            info!("After {} steps: nothing left to collapse, solve resolved", self.steps);
            return Ok(StepReport {
                collapsed: None,
                narrowed: Vec::new(),
                status: self.status,
            });
        };

        self.steps += 1;

        let tile = self.choose_tile(position)?;
        debug!(
            "Step {}: collapsing {} to tile {} ({} candidates)",
            self.steps,
            position,
            tile,
            self.grid.domain_size(position)
        );
        self.grid.collapse(position, tile)?;
        let collapsed = Collapse { position, tile };
        self.history.push(collapsed);

        let mut narrowed = Vec::new();
        match self.propagator.propagate_into(
            &mut self.grid,
            &self.tileset,
            vec![position],
            &mut narrowed,
        ) {
            Ok(()) => {}
            Err(PropagationError::Contradiction(empty)) => {
                warn!(
                    "Step {}: contradiction at {} after collapsing {}",
                    self.steps, empty.position, position
                );
                self.status = SolveStatus::Contradiction {
                    at: empty.position,
                };
                return Ok(StepReport {
                    collapsed: Some(collapsed),
                    narrowed,
                    status: self.status,
                });
            }
            Err(other) => return Err(other.into()),
        }

        if self.grid.all_resolved() {
            self.status = SolveStatus::Resolved;
            info!("Step {}: every cell resolved", self.steps);
        }

        Ok(StepReport {
            collapsed: Some(collapsed),
            narrowed,
            status: self.status,
        })
    }

    /// Steps until the solve is `Resolved` or `Contradiction`.
    ///
    /// Returns the current status straight away if it is already terminal.
    pub fn run(&mut self) -> Result<SolveStatus, SolverError> {
        while !self.status.is_terminal() {
            self.step()?;
        }
        Ok(self.status)
    }

    /// Draws a tile from the domain at `position`, weighted by tile weight.
    fn choose_tile(&mut self, position: Position) -> Result<TileId, SolverError> {
        let candidates = self.grid.domain(position).unwrap_or_default();
        let weights = candidates
            .iter()
            .map(|&tile| {
                self.tileset.weight(tile).ok_or_else(|| {
                    SolverError::Configuration(format!(
                        "Weight missing for tile {tile} at {position}"
                    ))
                })
            })
            .collect::<Result<Vec<f32>, SolverError>>()?;

        let dist = WeightedIndex::new(&weights)?;
        let chosen = dist.sample(&mut self.rng);
        candidates.get(chosen).copied().ok_or_else(|| {
            SolverError::Configuration(format!(
                "Weighted choice {chosen} out of range at {position}"
            ))
        })
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn tileset(&self) -> &Arc<TileSet> {
        &self.tileset
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of `step()` calls that collapsed a cell.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Collapses in the order they were made.
    pub fn history(&self) -> &[Collapse] {
        &self.history
    }

    pub fn progress(&self) -> ProgressInfo {
        ProgressInfo {
            resolved_cells: self.grid.resolved_count(),
            total_cells: self.grid.len(),
            steps: self.steps,
        }
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self
                .grid
                .positions()
                .map(|position| self.grid.chosen(position))
                .collect(),
        }
    }
}
