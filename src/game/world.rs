//! # World Module
//!
//! The tile grid: passability, sight blocking and the explored overlay.

use crate::{NargylError, NargylResult, Position};
use serde::{Deserialize, Serialize};

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Whether movement into this tile is impossible
    pub blocked: bool,
    /// Whether this tile stops line of sight
    pub blocks_sight: bool,
    /// Set the first time the tile becomes visible; never reverts
    pub explored: bool,
}

impl Tile {
    /// Solid rock. Every tile of a fresh grid starts this way.
    pub fn wall() -> Self {
        Self {
            blocked: true,
            blocks_sight: true,
            explored: false,
        }
    }

    /// Carved, walkable ground.
    pub fn floor() -> Self {
        Self {
            blocked: false,
            blocks_sight: false,
            explored: false,
        }
    }

    /// An obstruction placed inside an otherwise open room.
    pub fn pillar() -> Self {
        Self::wall()
    }
}

/// Fixed-size 2D grid of tiles, stored row-major and indexed `[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Vec<Tile>>,
}

impl TileGrid {
    /// Creates a grid with every tile blocked.
    pub fn new(width: u32, height: u32) -> Self {
        let tiles = vec![vec![Tile::wall(); width as usize]; height as usize];
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Checks if a position lies inside the grid.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        if self.is_valid_position(pos) {
            Some(&self.tiles[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    pub fn get_tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if self.is_valid_position(pos) {
            Some(&mut self.tiles[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Replaces the tile at a position.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> NargylResult<()> {
        match self.get_tile_mut(pos) {
            Some(slot) => {
                *slot = tile;
                Ok(())
            }
            None => Err(NargylError::InvalidAction(format!(
                "Position ({}, {}) is outside the {}x{} grid",
                pos.x, pos.y, self.width, self.height
            ))),
        }
    }

    /// Whether the tile at `pos` blocks movement. Positions off the grid are blocked.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get_tile(pos).map_or(true, |tile| tile.blocked)
    }

    /// Whether the tile at `pos` blocks sight. Positions off the grid do.
    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.get_tile(pos).map_or(true, |tile| tile.blocks_sight)
    }

    pub fn is_explored(&self, pos: Position) -> bool {
        self.get_tile(pos).map_or(false, |tile| tile.explored)
    }

    /// Makes a tile walkable and see-through. Out-of-bounds positions are ignored.
    pub fn carve(&mut self, pos: Position) {
        if let Some(tile) = self.get_tile_mut(pos) {
            tile.blocked = false;
            tile.blocks_sight = false;
        }
    }

    pub fn mark_explored(&mut self, pos: Position) {
        if let Some(tile) = self.get_tile_mut(pos) {
            tile.explored = true;
        }
    }

    /// Iterates over every position in the grid, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_blocked() {
        let grid = TileGrid::new(10, 8);
        assert_eq!(grid.tiles.len(), 8);
        assert_eq!(grid.tiles[0].len(), 10);
        assert!(grid.positions().all(|pos| grid.is_blocked(pos)));
    }

    #[test]
    fn test_carve_and_bounds() {
        let mut grid = TileGrid::new(10, 8);
        grid.carve(Position::new(3, 4));
        assert!(!grid.is_blocked(Position::new(3, 4)));
        assert!(!grid.blocks_sight(Position::new(3, 4)));
        assert!(grid.is_blocked(Position::new(-1, 0)));
        assert!(grid.is_blocked(Position::new(10, 0)));

        // Carving outside the grid is a no-op
        grid.carve(Position::new(50, 50));
        assert_eq!(grid.positions().filter(|pos| !grid.is_blocked(*pos)).count(), 1);
    }

    #[test]
    fn test_set_tile_out_of_bounds() {
        let mut grid = TileGrid::new(4, 4);
        assert!(grid.set_tile(Position::new(1, 1), Tile::floor()).is_ok());
        assert!(grid.set_tile(Position::new(4, 1), Tile::floor()).is_err());
    }

    #[test]
    fn test_explored_never_reverts() {
        let mut grid = TileGrid::new(4, 4);
        let pos = Position::new(2, 2);
        assert!(!grid.is_explored(pos));
        grid.mark_explored(pos);
        grid.carve(pos);
        assert!(grid.is_explored(pos));
    }
}
