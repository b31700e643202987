// Shared fixtures for the edgewave-core integration tests.
#![allow(dead_code)]

use edgewave_core::{Edges, Grid, Position, Tile, TileId, TileSet};
use std::sync::Arc;

/// Nine pipe tiles: red ("R") pipes on green ("G") ground.
pub fn pipes() -> Arc<TileSet> {
    let tile = |name: &str, up, down, left, right| Tile::new(name, Edges::new(up, down, left, right));
    Arc::new(
        TileSet::new(vec![
            tile("down_right", "G", "R", "G", "R"),
            tile("up_left", "R", "G", "R", "G"),
            tile("up_right", "R", "G", "G", "R"),
            tile("down_left", "G", "R", "R", "G"),
            tile("vertical", "R", "R", "G", "G"),
            tile("horizontal", "G", "G", "R", "R"),
            tile("tee_up", "R", "G", "R", "R"),
            tile("cross", "R", "R", "R", "R"),
            tile("ground", "G", "G", "G", "G"),
        ])
        .unwrap(),
    )
}

/// Tiles that fit anywhere: every solve resolves.
pub fn uniform(count: usize) -> Arc<TileSet> {
    Arc::new(
        TileSet::new(
            (0..count)
                .map(|i| Tile::new(format!("t{i}"), Edges::uniform("g")))
                .collect(),
        )
        .unwrap(),
    )
}

/// Two tiles that force each other on a 2x1 grid: `a` left of `b`.
pub fn a_b_pair() -> Arc<TileSet> {
    Arc::new(
        TileSet::new(vec![
            Tile::new("A", Edges::new("-", "-", "a", "x")),
            Tile::new("B", Edges::new("-", "-", "x", "b")),
        ])
        .unwrap(),
    )
}

/// Eight tiles around a 2x2 ring whose labels must flip parity an odd number
/// of times. Every pair of neighbours is consistent on its own, the ring as a
/// whole is not, so any first collapse leads to a contradiction.
///
/// Returns the tileset and the initial domain of each ring cell.
pub fn parity_ring() -> (Arc<TileSet>, Vec<(Position, Vec<TileId>)>) {
    let mut tiles = Vec::new();
    for bit in ["0", "1"] {
        let flipped = if bit == "0" { "1" } else { "0" };
        tiles.push(Tile::new(format!("x{bit}"), Edges::new("n", bit, "n", bit)));
        tiles.push(Tile::new(format!("y{bit}"), Edges::new("n", bit, bit, "n")));
        tiles.push(Tile::new(format!("z{bit}"), Edges::new(bit, "n", bit, "n")));
        tiles.push(Tile::new(format!("w{bit}"), Edges::new(flipped, "n", "n", bit)));
    }
    let tileset = TileSet::new(tiles).unwrap();
    let ids = |prefix: &str| {
        ["0", "1"]
            .iter()
            .filter_map(|bit| tileset.id_by_name(&format!("{prefix}{bit}")))
            .collect::<Vec<_>>()
    };
    let domains = vec![
        (Position::new(0, 0), ids("x")),
        (Position::new(1, 0), ids("y")),
        (Position::new(1, 1), ids("z")),
        (Position::new(0, 1), ids("w")),
    ];
    (Arc::new(tileset), domains)
}

/// Every candidate of every cell has a compatible candidate in each neighbour.
pub fn is_arc_consistent(grid: &Grid, tileset: &TileSet) -> bool {
    grid.positions().all(|position| {
        let domain = grid.domain(position).unwrap_or_default();
        grid.neighbors(position).all(|(neighbor, direction)| {
            let neighbor_domain = grid.domain(neighbor).unwrap_or_default();
            domain.iter().all(|&a| {
                neighbor_domain
                    .iter()
                    .any(|&b| tileset.compatible(a, b, direction))
            })
        })
    })
}

/// Every resolved pair of neighbours is compatible.
pub fn resolved_pairs_compatible(grid: &Grid, tileset: &TileSet) -> bool {
    grid.positions().all(|position| {
        grid.neighbors(position).all(|(neighbor, direction)| {
            match (grid.chosen(position), grid.chosen(neighbor)) {
                (Some(a), Some(b)) => tileset.compatible(a, b, direction),
                _ => true,
            }
        })
    })
}
