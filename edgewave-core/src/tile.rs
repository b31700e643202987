use crate::rules::{Direction, EdgeIndex};
use bitvec::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Represents a unique identifier for a tile.
///
/// The index of the tile inside its `TileSet`, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileId(pub usize);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors that can occur during TileSet creation or validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileSetError {
    /// The tile list was empty.
    #[error("TileSet must contain at least one tile.")]
    Empty,
    /// Weights must be > 0.
    #[error("TileSet weights must be positive. Found non-positive weight at index {0}: {1}")]
    NonPositiveWeight(usize, String),
    /// Two tiles share a name.
    #[error("Duplicate tile name: {0}")]
    DuplicateName(String),
    /// A `TileId` outside the set was referenced.
    #[error("Unknown tile id {0}")]
    UnknownTile(usize),
}

/// The four edge labels of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edges {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl Edges {
    pub fn new(
        up: impl Into<String>,
        down: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            up: up.into(),
            down: down.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    /// Same label on every side.
    pub fn uniform(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(label.clone(), label.clone(), label.clone(), label)
    }

    pub fn get(&self, direction: Direction) -> &str {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    fn in_slot_order(&self) -> [&str; 4] {
        [&self.up, &self.down, &self.left, &self.right]
    }
}

/// A placeable tile: a name, four edge labels and a selection weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    name: String,
    edges: Edges,
    weight: f32,
}

impl Tile {
    /// Creates a tile with weight `1.0`.
    pub fn new(name: impl Into<String>, edges: Edges) -> Self {
        Self {
            name: name.into(),
            edges,
            weight: 1.0,
        }
    }

    /// Relative weight used when this tile competes with others during collapse.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    pub fn edge(&self, direction: Direction) -> &str {
        self.edges.get(direction)
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }
}

/// Immutable catalog of tiles and their adjacency predicate.
///
/// Tile `a` may sit next to tile `b` in direction `d` iff
/// `a.edge(d) == b.edge(d.opposite())`.
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Tile>,
    index: EdgeIndex,
}

impl TileSet {
    /// Creates a new `TileSet`, validating the tiles.
    ///
    /// # Errors
    ///
    /// Returns `TileSetError::Empty` if `tiles` is empty.
    /// Returns `TileSetError::NonPositiveWeight` if any weight is `<= 0.0` (or NaN).
    /// Returns `TileSetError::DuplicateName` if two tiles share a name.
    pub fn new(tiles: Vec<Tile>) -> Result<Self, TileSetError> {
        if tiles.is_empty() {
            return Err(TileSetError::Empty);
        }
        let mut names = HashSet::new();
        for (index, tile) in tiles.iter().enumerate() {
            if tile.weight.is_nan() || tile.weight <= 0.0 {
                return Err(TileSetError::NonPositiveWeight(
                    index,
                    tile.weight.to_string(),
                ));
            }
            if !names.insert(tile.name.as_str()) {
                return Err(TileSetError::DuplicateName(tile.name.clone()));
            }
        }

        let index = EdgeIndex::build(tiles.iter().map(|tile| tile.edges.in_slot_order()));
        Ok(Self { tiles, index })
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always `false`; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, tile_id: TileId) -> Option<&Tile> {
        self.tiles.get(tile_id.0)
    }

    /// Gets the weight for a specific `TileId`.
    pub fn weight(&self, tile_id: TileId) -> Option<f32> {
        self.get(tile_id).map(Tile::weight)
    }

    pub fn id_by_name(&self, name: &str) -> Option<TileId> {
        self.tiles
            .iter()
            .position(|tile| tile.name == name)
            .map(TileId)
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> {
        (0..self.tiles.len()).map(TileId)
    }

    /// Whether `b` may be placed in `direction` of `a`.
    ///
    /// Ids outside the set are never compatible.
    #[inline]
    pub fn compatible(&self, a: TileId, b: TileId, direction: Direction) -> bool {
        self.index.check(a.0, b.0, direction)
    }

    /// Tiles that may sit in `direction` of a cell whose candidates are `domain`.
    ///
    /// This is the set of tiles whose `direction.opposite()` edge carries any of
    /// the labels `domain` exposes along `direction`.
    pub fn supported(&self, domain: &BitSlice, direction: Direction) -> BitVec {
        self.index.supported(domain, direction)
    }

    /// A domain containing every tile.
    pub fn full_domain(&self) -> BitVec {
        bitvec![1; self.tiles.len()]
    }

    /// Builds a domain mask from explicit ids.
    ///
    /// # Errors
    ///
    /// Returns `TileSetError::UnknownTile` for an id outside the set.
    pub fn mask(&self, ids: &[TileId]) -> Result<BitVec, TileSetError> {
        let mut mask = bitvec![0; self.tiles.len()];
        for id in ids {
            if id.0 >= self.tiles.len() {
                return Err(TileSetError::UnknownTile(id.0));
            }
            mask.set(id.0, true);
        }
        Ok(mask)
    }
}
