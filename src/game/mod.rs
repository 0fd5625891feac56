//! # Game Module
//!
//! Core simulation: the entity model, combat rules, AI behaviors and the turn loop.
//!
//! This module contains the fundamental building blocks of the engine:
//! - Tile grid and entity representation
//! - Combat, progression and spell resolution
//! - Per-entity AI behaviors
//! - Game state aggregate, persistence snapshot and turn scheduler

pub mod actions;
pub mod ai;
pub mod combat;
pub mod components;
pub mod entities;
pub mod inventory;
pub mod persistence;
pub mod scheduler;
pub mod spells;
pub mod state;
pub mod world;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::*;
pub use ai::*;
pub use combat::*;
pub use components::*;
pub use entities::*;
pub use persistence::*;
pub use scheduler::*;
pub use spells::*;
pub use state::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D coordinate on the tile grid.
///
/// # Examples
///
/// ```
/// use nargyl::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Euclidean distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use nargyl::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.euclidean_distance(pos2), 5.0);
    /// ```
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::cardinal()
            .into_iter()
            .map(|direction| self + direction.to_delta())
            .collect()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// The eight compass directions a single step can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use nargyl::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
            Direction::Northeast => Position::new(1, -1),
            Direction::Northwest => Position::new(-1, -1),
            Direction::Southeast => Position::new(1, 1),
            Direction::Southwest => Position::new(-1, 1),
        }
    }

    /// Returns only the 4 cardinal directions.
    pub fn cardinal() -> Vec<Direction> {
        vec![
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

/// Display color. Opaque to the simulation; passed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const DARK_RED: Color = Color::new(191, 0, 0);
    pub const DARKER_RED: Color = Color::new(127, 0, 0);
    pub const DESATURATED_RED: Color = Color::new(127, 63, 63);
    pub const ORANGE: Color = Color::new(255, 127, 0);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const LIGHT_YELLOW: Color = Color::new(255, 255, 115);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const LIGHT_GREEN: Color = Color::new(115, 255, 115);
    pub const DESATURATED_GREEN: Color = Color::new(63, 127, 63);
    pub const DARKEST_GREEN: Color = Color::new(0, 63, 0);
    pub const FUCHSIA: Color = Color::new(255, 0, 255);
    pub const SEPIA: Color = Color::new(127, 101, 63);
    pub const DARK_VIOLET: Color = Color::new(95, 0, 191);
    pub const LIGHT_VIOLET: Color = Color::new(185, 115, 255);
    pub const DARK_CRIMSON: Color = Color::new(127, 0, 31);
    pub const LIGHTEST_AZURE: Color = Color::new(191, 223, 255);
    pub const DESATURATED_AZURE: Color = Color::new(63, 95, 127);
    pub const GOLD: Color = Color::new(200, 180, 50);
}

/// Unique identifier for game entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// Uppercases the first character of a name for the start of a log line.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
    }

    #[test]
    fn test_position_euclidean_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.euclidean_distance(pos2), 5.0);
    }

    #[test]
    fn test_position_cardinal_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(adjacent.len(), 4);
        assert!(adjacent.contains(&Position::new(5, 4))); // North
        assert!(adjacent.contains(&Position::new(4, 5))); // West
        assert!(!adjacent.contains(&Position::new(4, 4))); // No diagonal
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = new_entity_id();
        let id2 = new_entity_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("alien weakling"), "Alien weakling");
        assert_eq!(capitalize(""), "");
    }
}
