use bitvec::prelude::*;
use edgewave_core::{
    Direction, EmptyDomainError, Grid, GridError, InvalidCollapseError, Position, TileId,
};

#[test]
fn test_grid_new() {
    let grid = Grid::new(3, 4, 5).unwrap();
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 4);
    assert_eq!(grid.len(), 12);
    assert_eq!(grid.num_tiles(), 5);
    for position in grid.positions() {
        assert_eq!(grid.domain_size(position), 5);
        assert!(!grid.is_resolved(position));
    }
    assert_eq!(grid.resolved_count(), 0);
}

#[test]
fn test_out_of_bounds_reads() {
    let grid = Grid::new(2, 2, 3).unwrap();
    let outside = Position::new(2, 0);
    assert_eq!(grid.index(outside), None);
    assert_eq!(grid.domain_size(outside), 0);
    assert!(!grid.is_resolved(outside));
    assert_eq!(grid.domain(outside), None);
    assert_eq!(grid.cell(outside), None);
}

#[test]
fn test_positions_are_row_major() {
    let grid = Grid::new(2, 2, 1).unwrap();
    let positions: Vec<_> = grid.positions().collect();
    assert_eq!(
        positions,
        vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ]
    );
}

#[test]
fn test_neighbors_corner_and_center() {
    let grid = Grid::new(3, 3, 1).unwrap();

    let corner: Vec<_> = grid.neighbors(Position::new(0, 0)).collect();
    assert_eq!(corner.len(), 2);
    assert!(corner.contains(&(Position::new(1, 0), Direction::Right)));
    assert!(corner.contains(&(Position::new(0, 1), Direction::Down)));

    let center: Vec<_> = grid.neighbors(Position::new(1, 1)).collect();
    assert_eq!(center.len(), 4);
    assert!(center.contains(&(Position::new(1, 0), Direction::Up)));
    assert!(center.contains(&(Position::new(0, 1), Direction::Left)));
}

#[test]
fn test_restrict_domain_only_shrinks() {
    let mut grid = Grid::new(1, 1, 4).unwrap();
    let origin = Position::new(0, 0);

    assert_eq!(grid.restrict_domain(origin, bits![1, 1, 0, 1]), Ok(true));
    assert_eq!(grid.domain(origin), Some(vec![TileId(0), TileId(1), TileId(3)]));

    // Re-allowing tile 2 adds nothing back.
    assert_eq!(grid.restrict_domain(origin, bits![1, 1, 1, 1]), Ok(false));
    assert_eq!(grid.domain_size(origin), 3);
}

#[test]
fn test_restrict_to_empty_keeps_domain() {
    let mut grid = Grid::new(2, 1, 3).unwrap();
    let target = Position::new(1, 0);
    grid.restrict_domain(target, bits![1, 1, 0]).unwrap();

    let result = grid.restrict_domain(target, bits![0, 0, 1]);
    assert_eq!(
        result,
        Err(GridError::EmptyDomain(EmptyDomainError { position: target }))
    );
    assert_eq!(grid.domain(target), Some(vec![TileId(0), TileId(1)]));
}

#[test]
fn test_restrict_rejects_bad_masks() {
    let mut grid = Grid::new(2, 1, 3).unwrap();
    assert_eq!(
        grid.restrict_domain(Position::new(0, 0), bits![1, 1]),
        Err(GridError::MaskLength {
            expected: 3,
            found: 2
        })
    );
    assert!(matches!(
        grid.restrict_domain(Position::new(5, 5), bits![1, 1, 1]),
        Err(GridError::OutOfBounds { .. })
    ));
}

#[test]
fn test_collapse_commits_a_tile() {
    let mut grid = Grid::new(2, 1, 3).unwrap();
    let target = Position::new(0, 0);
    grid.collapse(target, TileId(2)).unwrap();

    let cell = grid.cell(target).unwrap();
    assert!(cell.resolved);
    assert_eq!(cell.chosen, Some(TileId(2)));
    assert_eq!(cell.domain, vec![TileId(2)]);
    assert_eq!(grid.resolved_count(), 1);
    assert!(!grid.all_resolved());

    // Resolved cells ignore later restrictions.
    assert_eq!(grid.restrict_domain(target, bits![1, 0, 0]), Ok(false));
    assert_eq!(grid.chosen(target), Some(TileId(2)));
}

#[test]
fn test_collapse_errors() {
    let mut grid = Grid::new(2, 1, 3).unwrap();
    let target = Position::new(1, 0);
    grid.restrict_domain(target, bits![1, 0, 1]).unwrap();

    assert_eq!(
        grid.collapse(target, TileId(1)),
        Err(GridError::InvalidCollapse(InvalidCollapseError::NotInDomain {
            position: target,
            tile: TileId(1)
        }))
    );
    grid.collapse(target, TileId(0)).unwrap();
    assert_eq!(
        grid.collapse(target, TileId(0)),
        Err(GridError::InvalidCollapse(
            InvalidCollapseError::AlreadyResolved(target)
        ))
    );
}

#[test]
fn test_singleton_domain_is_not_resolved() {
    let mut grid = Grid::new(1, 1, 2).unwrap();
    let origin = Position::new(0, 0);
    grid.restrict_domain(origin, bits![0, 1]).unwrap();
    assert_eq!(grid.domain_size(origin), 1);
    assert!(!grid.is_resolved(origin));
    assert_eq!(grid.chosen(origin), None);
}
