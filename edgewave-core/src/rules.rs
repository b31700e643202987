use bitvec::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One of the four grid directions, seen from the cell doing the looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in the order neighbours are reported.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];

    /// The direction pointing back at the origin.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `(dx, dy)` step for this direction; `y` grows downwards.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Stable slot used for per-direction tables.
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// Precomputed edge-label lookup for a tile set.
///
/// Labels are interned to small integers. For every direction and label we
/// keep the mask of tiles exposing that label on that side, so that
/// "which tiles can sit next to this domain" becomes a union of masks.
#[derive(Debug, Clone)]
pub(crate) struct EdgeIndex {
    num_tiles: usize,
    num_labels: usize,
    /// `label_of[tile][direction.slot()]`
    label_of: Vec<[usize; 4]>,
    /// `by_label[direction.slot()][label]` = tiles whose edge in `direction` is `label`.
    by_label: [Vec<BitVec>; 4],
}

impl EdgeIndex {
    /// Builds the index from each tile's four labels, given in `Direction::slot` order.
    pub(crate) fn build<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = [&'a str; 4]>,
    {
        let mut interned: HashMap<&'a str, usize> = HashMap::new();
        let mut label_of = Vec::new();
        for tile_edges in edges {
            let mut ids = [0usize; 4];
            for (slot, label) in tile_edges.into_iter().enumerate() {
                let next = interned.len();
                ids[slot] = *interned.entry(label).or_insert(next);
            }
            label_of.push(ids);
        }

        let num_tiles = label_of.len();
        let num_labels = interned.len();
        let mut by_label: [Vec<BitVec>; 4] =
            std::array::from_fn(|_| vec![bitvec![0; num_tiles]; num_labels]);
        for (tile, ids) in label_of.iter().enumerate() {
            for (slot, &label) in ids.iter().enumerate() {
                if let Some(mask) = by_label[slot].get_mut(label) {
                    mask.set(tile, true);
                }
            }
        }

        Self {
            num_tiles,
            num_labels,
            label_of,
            by_label,
        }
    }

    pub(crate) fn label(&self, tile: usize, direction: Direction) -> Option<usize> {
        self.label_of.get(tile).map(|ids| ids[direction.slot()])
    }

    /// Checks `a.edge(direction) == b.edge(direction.opposite())`.
    #[inline]
    pub(crate) fn check(&self, a: usize, b: usize, direction: Direction) -> bool {
        match (self.label(a, direction), self.label(b, direction.opposite())) {
            (Some(from), Some(to)) => from == to,
            _ => false,
        }
    }

    /// Tiles that may sit in `direction` of a cell whose candidates are `domain`.
    pub(crate) fn supported(&self, domain: &BitSlice, direction: Direction) -> BitVec {
        let mut exposed = bitvec![0; self.num_labels];
        for tile in domain.iter_ones() {
            if let Some(label) = self.label(tile, direction) {
                exposed.set(label, true);
            }
        }

        let facing = &self.by_label[direction.opposite().slot()];
        let mut allowed = bitvec![0; self.num_tiles];
        for label in exposed.iter_ones() {
            if let Some(mask) = facing.get(label) {
                for tile in mask.iter_ones() {
                    allowed.set(tile, true);
                }
            }
        }
        allowed
    }
}
