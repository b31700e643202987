use crate::rules::Direction;
use crate::tile::TileId;
use bitvec::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A cell coordinate. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cell's domain was narrowed to nothing: no tile fits there any more.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Contradiction: domain of cell {position} became empty")]
pub struct EmptyDomainError {
    pub position: Position,
}

/// A collapse request that can never be honoured.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidCollapseError {
    #[error("Cell {0} is already resolved")]
    AlreadyResolved(Position),
    #[error("Tile {tile} is not in the domain of cell {position}")]
    NotInDomain { position: Position, tile: TileId },
}

/// Errors raised by grid construction and mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Grid needs at least one tile")]
    NoTiles,
    #[error("Position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },
    #[error("Domain mask has {found} entries, expected {expected}")]
    MaskLength { expected: usize, found: usize },
    #[error(transparent)]
    EmptyDomain(#[from] EmptyDomainError),
    #[error(transparent)]
    InvalidCollapse(#[from] InvalidCollapseError),
}

/// A copy of one cell's state. Cells never leave the grid by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub domain: Vec<TileId>,
    pub resolved: bool,
    pub chosen: Option<TileId>,
}

/// The solver's working state: one candidate set per cell.
///
/// Cells live in a flat arena addressed by `y * width + x`. The only ways to
/// change a domain are [`Grid::restrict_domain`] and [`Grid::collapse`], and
/// neither ever adds a tile, so domains only shrink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    num_tiles: usize,
    domains: Vec<BitVec>,
    chosen: Vec<Option<TileId>>,
}

impl Grid {
    /// Creates a grid with every domain set to all `num_tiles` tiles.
    pub fn new(width: usize, height: usize, num_tiles: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        if num_tiles == 0 {
            return Err(GridError::NoTiles);
        }
        let size = width
            .checked_mul(height)
            .ok_or(GridError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            num_tiles,
            domains: vec![bitvec![1; num_tiles]; size],
            chosen: vec![None; size],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Always `false`; zero-sized grids are rejected.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Linear index of `position`, or `None` outside the grid.
    pub fn index(&self, position: Position) -> Option<usize> {
        if position.x < self.width && position.y < self.height {
            Some(position.y * self.width + position.x)
        } else {
            None
        }
    }

    pub fn position(&self, index: usize) -> Position {
        Position::new(index % self.width, index / self.width)
    }

    /// Every position in linear-index order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.len()).map(move |index| Position::new(index % width, index / width))
    }

    /// In-bounds neighbours of `position`, labelled with the direction from `position`.
    ///
    /// No wraparound: edge cells have fewer than four neighbours.
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = (Position, Direction)> {
        let (width, height) = (self.width, self.height);
        Direction::ALL.into_iter().filter_map(move |direction| {
            let (dx, dy) = direction.offset();
            let x = position.x.checked_add_signed(dx)?;
            let y = position.y.checked_add_signed(dy)?;
            (x < width && y < height).then_some((Position::new(x, y), direction))
        })
    }

    /// Number of tiles still possible at `position`; `0` outside the grid.
    pub fn domain_size(&self, position: Position) -> usize {
        self.domain_bits(position).map_or(0, |bits| bits.count_ones())
    }

    /// `false` outside the grid.
    pub fn is_resolved(&self, position: Position) -> bool {
        self.index(position)
            .and_then(|index| self.chosen.get(index))
            .is_some_and(Option::is_some)
    }

    pub fn all_resolved(&self) -> bool {
        self.chosen.iter().all(Option::is_some)
    }

    /// Number of resolved cells.
    pub fn resolved_count(&self) -> usize {
        self.chosen.iter().filter(|chosen| chosen.is_some()).count()
    }

    /// The tile committed at `position`, if resolved.
    pub fn chosen(&self, position: Position) -> Option<TileId> {
        self.index(position)
            .and_then(|index| self.chosen.get(index).copied().flatten())
    }

    /// The candidate tiles at `position`, ascending.
    pub fn domain(&self, position: Position) -> Option<Vec<TileId>> {
        self.domain_bits(position)
            .map(|bits| bits.iter_ones().map(TileId).collect())
    }

    pub fn cell(&self, position: Position) -> Option<Cell> {
        let index = self.index(position)?;
        let chosen = self.chosen.get(index).copied().flatten();
        Some(Cell {
            position,
            domain: self.domain(position)?,
            resolved: chosen.is_some(),
            chosen,
        })
    }

    pub(crate) fn domain_bits(&self, position: Position) -> Option<&BitSlice> {
        self.index(position)
            .and_then(|index| self.domains.get(index))
            .map(|domain| domain.as_bitslice())
    }

    pub(crate) fn domain_size_at(&self, index: usize) -> usize {
        self.domains.get(index).map_or(0, |domain| domain.count_ones())
    }

    pub(crate) fn is_resolved_at(&self, index: usize) -> bool {
        self.chosen.get(index).is_some_and(Option::is_some)
    }

    fn checked_index(&self, position: Position) -> Result<usize, GridError> {
        self.index(position).ok_or(GridError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        })
    }

    /// Intersects the domain at `position` with `allowed`.
    ///
    /// Returns `Ok(true)` if the domain shrank. Resolved cells are left alone and
    /// report `Ok(false)`. If the intersection would be empty the domain is kept
    /// as it was and `GridError::EmptyDomain` is returned.
    pub fn restrict_domain(
        &mut self,
        position: Position,
        allowed: &BitSlice,
    ) -> Result<bool, GridError> {
        let index = self.checked_index(position)?;
        if allowed.len() != self.num_tiles {
            return Err(GridError::MaskLength {
                expected: self.num_tiles,
                found: allowed.len(),
            });
        }
        if self.is_resolved_at(index) {
            return Ok(false);
        }

        let Some(domain) = self.domains.get_mut(index) else {
            return Err(GridError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            });
        };
        let removed: Vec<usize> = domain
            .iter_ones()
            .filter(|&tile| !allowed[tile])
            .collect();
        if removed.is_empty() {
            return Ok(false);
        }
        if removed.len() == domain.count_ones() {
            return Err(EmptyDomainError { position }.into());
        }
        for tile in removed {
            domain.set(tile, false);
        }
        Ok(true)
    }

    /// Commits `position` to `tile`.
    ///
    /// # Errors
    ///
    /// `InvalidCollapseError::AlreadyResolved` if the cell is resolved,
    /// `InvalidCollapseError::NotInDomain` if `tile` is no longer a candidate.
    pub fn collapse(&mut self, position: Position, tile: TileId) -> Result<(), GridError> {
        let index = self.checked_index(position)?;
        if self.is_resolved_at(index) {
            return Err(InvalidCollapseError::AlreadyResolved(position).into());
        }
        let in_domain = self
            .domains
            .get(index)
            .and_then(|domain| domain.get(tile.0).map(|bit| *bit))
            .unwrap_or(false);
        if !in_domain {
            return Err(InvalidCollapseError::NotInDomain { position, tile }.into());
        }

        if let Some(domain) = self.domains.get_mut(index) {
            domain.fill(false);
            domain.set(tile.0, true);
        }
        if let Some(chosen) = self.chosen.get_mut(index) {
            *chosen = Some(tile);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_degenerate_sizes() {
        assert_eq!(
            Grid::new(0, 3, 2),
            Err(GridError::InvalidDimensions { width: 0, height: 3 })
        );
        assert_eq!(Grid::new(3, 3, 0), Err(GridError::NoTiles));
    }

    #[test]
    fn test_new_rejects_overflowing_cell_count() {
        assert_eq!(
            Grid::new(usize::MAX, 2, 2),
            Err(GridError::InvalidDimensions {
                width: usize::MAX,
                height: 2
            })
        );
    }

    #[test]
    fn test_index_round_trips_position() {
        let grid = Grid::new(4, 3, 2).unwrap();
        for position in grid.positions() {
            let index = grid.index(position).unwrap();
            assert_eq!(grid.position(index), position);
        }
        assert_eq!(grid.index(Position::new(4, 0)), None);
        assert_eq!(grid.index(Position::new(0, 3)), None);
    }

    #[test]
    fn test_neighbors_in_corner_and_center() {
        let grid = Grid::new(3, 3, 1).unwrap();
        let corner: Vec<_> = grid.neighbors(Position::new(0, 0)).collect();
        assert_eq!(
            corner,
            vec![
                (Position::new(1, 0), Direction::Right),
                (Position::new(0, 1), Direction::Down),
            ]
        );
        assert_eq!(grid.neighbors(Position::new(1, 1)).count(), 4);
        let last: Vec<_> = grid.neighbors(Position::new(2, 2)).collect();
        assert_eq!(
            last,
            vec![
                (Position::new(2, 1), Direction::Up),
                (Position::new(1, 2), Direction::Left),
            ]
        );
    }

    #[test]
    fn test_restrict_domain_reports_change() {
        let mut grid = Grid::new(2, 1, 3).unwrap();
        let position = Position::new(1, 0);
        assert_eq!(grid.restrict_domain(position, &bitvec![1, 0, 1]), Ok(true));
        assert_eq!(grid.domain_size(position), 2);
        assert_eq!(grid.restrict_domain(position, &bitvec![1, 1, 1]), Ok(false));
        assert_eq!(grid.domain(position), Some(vec![TileId(0), TileId(2)]));
    }

    #[test]
    fn test_restrict_domain_empty_keeps_domain() {
        let mut grid = Grid::new(1, 1, 2).unwrap();
        let position = Position::new(0, 0);
        let result = grid.restrict_domain(position, &bitvec![0, 0]);
        assert_eq!(result, Err(GridError::EmptyDomain(EmptyDomainError { position })));
        assert_eq!(grid.domain_size(position), 2);
    }

    #[test]
    fn test_restrict_domain_ignores_resolved_cells() {
        let mut grid = Grid::new(1, 1, 2).unwrap();
        let position = Position::new(0, 0);
        grid.collapse(position, TileId(1)).unwrap();
        assert_eq!(grid.restrict_domain(position, &bitvec![1, 0]), Ok(false));
        assert_eq!(grid.chosen(position), Some(TileId(1)));
    }

    #[test]
    fn test_restrict_domain_rejects_bad_input() {
        let mut grid = Grid::new(1, 1, 2).unwrap();
        assert!(matches!(
            grid.restrict_domain(Position::new(1, 0), &bitvec![1, 0]),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(
            grid.restrict_domain(Position::new(0, 0), &bitvec![1]),
            Err(GridError::MaskLength { expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_collapse_rules() {
        let mut grid = Grid::new(2, 1, 2).unwrap();
        let position = Position::new(0, 0);
        grid.restrict_domain(position, &bitvec![0, 1]).unwrap();
        assert_eq!(
            grid.collapse(position, TileId(0)),
            Err(InvalidCollapseError::NotInDomain {
                position,
                tile: TileId(0)
            }
            .into())
        );
        grid.collapse(position, TileId(1)).unwrap();
        assert!(grid.is_resolved(position));
        assert_eq!(
            grid.collapse(position, TileId(1)),
            Err(InvalidCollapseError::AlreadyResolved(position).into())
        );
        assert!(!grid.all_resolved());
        assert_eq!(grid.resolved_count(), 1);
    }

    #[test]
    fn test_cell_is_a_copy() {
        let mut grid = Grid::new(1, 1, 3).unwrap();
        let position = Position::new(0, 0);
        let before = grid.cell(position).unwrap();
        grid.collapse(position, TileId(2)).unwrap();
        assert_eq!(before.domain.len(), 3);
        assert!(!before.resolved);
        let after = grid.cell(position).unwrap();
        assert_eq!(after.domain, vec![TileId(2)]);
        assert_eq!(after.chosen, Some(TileId(2)));
        assert!(grid.cell(Position::new(3, 3)).is_none());
    }
}
