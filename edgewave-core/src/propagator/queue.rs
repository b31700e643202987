use crate::{
    grid::{Grid, Position},
    propagator::{ConstraintPropagator, PropagationError},
    tile::TileSet,
};
use bitvec::prelude::*;
use log::trace;
use std::collections::VecDeque;

/// Breadth-first worklist propagator.
///
/// Each popped cell narrows its unresolved neighbours to the tiles whose facing
/// edge matches a label the cell can still expose. A neighbour that shrinks is
/// queued in turn. Domains are finite and only shrink, so the queue drains.
#[derive(Debug, Clone, Default)]
pub struct QueuePropagator;

impl QueuePropagator {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintPropagator for QueuePropagator {
    fn propagate_into(
        &mut self,
        grid: &mut Grid,
        tileset: &TileSet,
        seeds: Vec<Position>,
        narrowed: &mut Vec<Position>,
    ) -> Result<(), PropagationError> {
        let mut queue: VecDeque<Position> = seeds.into();
        let mut seen = bitvec![0; grid.len()];

        while let Some(position) = queue.pop_front() {
            // Copy the source domain; neighbours are mutated below.
            let Some(source) = grid.domain_bits(position).map(|bits| bits.to_bitvec()) else {
                continue;
            };

            let neighbors: Vec<_> = grid.neighbors(position).collect();
            for (neighbor, direction) in neighbors {
                if grid.is_resolved(neighbor) {
                    continue;
                }
                let allowed = tileset.supported(&source, direction);
                if grid.restrict_domain(neighbor, &allowed)? {
                    trace!(
                        "{} narrowed {} to {} tiles",
                        position,
                        neighbor,
                        grid.domain_size(neighbor)
                    );
                    if let Some(index) = grid.index(neighbor) {
                        if !seen[index] {
                            seen.set(index, true);
                            narrowed.push(neighbor);
                        }
                    }
                    queue.push_back(neighbor);
                }
            }
        }

        Ok(())
    }
}
