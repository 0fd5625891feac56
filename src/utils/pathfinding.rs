//! # Reachability
//!
//! Breadth-first flood fills over walkable tiles, used to check that a
//! generated level is connected.

use crate::{Position, TileGrid};
use ::pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

fn walkable_neighbours(grid: &TileGrid, pos: &Position) -> Vec<Position> {
    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(|next| !grid.is_blocked(*next))
        .collect()
}

/// All walkable tiles reachable from `start` with orthogonal steps.
///
/// Returns an empty set when `start` itself is blocked.
pub fn reachable_from(grid: &TileGrid, start: Position) -> HashSet<Position> {
    if grid.is_blocked(start) {
        return HashSet::new();
    }
    bfs_reach(start, |pos| walkable_neighbours(grid, pos)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_rooms_joined_by_corridor() {
        let mut grid = TileGrid::new(20, 10);
        for x in 1..4 {
            for y in 1..4 {
                grid.carve(Position::new(x, y));
                grid.carve(Position::new(x + 10, y));
            }
        }
        let before = reachable_from(&grid, Position::new(2, 2));
        assert_eq!(before.len(), 9);
        assert!(!before.contains(&Position::new(12, 2)));

        for x in 3..12 {
            grid.carve(Position::new(x, 2));
        }
        assert!(reachable_from(&grid, Position::new(2, 2)).contains(&Position::new(12, 2)));
        assert_eq!(reachable_from(&grid, Position::new(1, 1)).len(), 18 + 7);
    }

    #[test]
    fn test_blocked_start_reaches_nothing() {
        let grid = TileGrid::new(5, 5);
        assert!(reachable_from(&grid, Position::new(2, 2)).is_empty());
    }
}
