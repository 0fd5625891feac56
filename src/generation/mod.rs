//! # Generation Module
//!
//! Procedural level generation: room layout, the boss arena and the
//! level-scaled spawn tables for monsters and items.
//!
//! Generators take a [`LevelRequest`] (which dungeon level, and the player
//! to place) plus a [`RandomSource`], and return a [`GeneratedLevel`].

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::{config, Entity, EntityId, NargylResult, Position, RandomSource, TileGrid};
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible games
    pub seed: u64,
    pub map_width: u32,
    pub map_height: u32,
    /// Smallest side of a standard room
    pub room_min_size: i32,
    /// Largest side of a standard room
    pub room_max_size: i32,
    /// Room placement attempts on every level
    pub base_rooms: u32,
    /// Extra room placement attempts per dungeon level
    pub rooms_per_level: u32,
    /// Every n-th level is a boss arena
    pub boss_level_interval: u32,
    pub boss_room_min_width: i32,
    pub boss_room_max_width: i32,
    pub boss_room_min_height: i32,
    pub boss_room_max_height: i32,
    /// Top-left corner of the boss arena
    pub boss_room_anchor: Position,
    pub pillar_count: u32,
    /// Upper bound on every reroll loop
    pub max_rerolls: u32,
}

impl GenerationConfig {
    /// Creates the standard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use nargyl::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.room_max_size >= config.room_min_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            map_width: config::MAP_WIDTH,
            map_height: config::MAP_HEIGHT,
            room_min_size: config::ROOM_MIN_SIZE,
            room_max_size: config::ROOM_MAX_SIZE,
            base_rooms: config::BASE_ROOMS,
            rooms_per_level: config::ROOMS_PER_LEVEL,
            boss_level_interval: config::BOSS_LEVEL_INTERVAL,
            boss_room_min_width: config::BOSS_ROOM_MIN_WIDTH,
            boss_room_max_width: config::BOSS_ROOM_MAX_WIDTH,
            boss_room_min_height: config::BOSS_ROOM_MIN_HEIGHT,
            boss_room_max_height: config::BOSS_ROOM_MAX_HEIGHT,
            boss_room_anchor: Position::new(config::BOSS_ROOM_ANCHOR.0, config::BOSS_ROOM_ANCHOR.1),
            pillar_count: config::PILLAR_COUNT,
            max_rerolls: config::MAX_REROLLS,
        }
    }

    /// Creates a configuration for testing with fewer rooms per level.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            base_rooms: 3,
            rooms_per_level: 2,
            ..Self::new(seed)
        }
    }

    /// Whether `dungeon_level` uses the boss arena layout.
    pub fn is_boss_level(&self, dungeon_level: u32) -> bool {
        self.boss_level_interval > 0 && dungeon_level % self.boss_level_interval == 0
    }

    /// Room placement attempts for a standard level.
    pub fn room_attempts(&self, dungeon_level: u32) -> u32 {
        self.base_rooms + self.rooms_per_level * dungeon_level
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Axis-aligned rectangle used while laying out a level.
///
/// The edges `x1`, `y1`, `x2`, `y2` stay solid; only the interior is carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    /// Creates a room from its top-left corner and size.
    ///
    /// # Examples
    ///
    /// ```
    /// use nargyl::{Room, Position};
    ///
    /// let room = Room::new(5, 5, 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.contains(Position::new(7, 7)));
    /// assert!(!room.contains(Position::new(5, 5)));
    /// ```
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Whether two rooms touch or overlap, edges included.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Whether a position lies in the carved interior.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    /// Every interior (walkable) position.
    pub fn interior_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in (self.y1 + 1)..self.y2 {
            for x in (self.x1 + 1)..self.x2 {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }
}

/// What a generator is asked to build.
#[derive(Debug, Clone)]
pub struct LevelRequest {
    pub dungeon_level: u32,
    /// The player, carried over from the previous level. Its position is overwritten.
    pub player: Entity,
}

/// A freshly generated level.
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub map: TileGrid,
    /// Live entities, the player included
    pub entities: Vec<Entity>,
    pub stairs_id: Option<EntityId>,
    /// Rooms carved, in placement order. Not kept after installation.
    pub rooms: Vec<Room>,
}

impl GeneratedLevel {
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for the request.
    fn generate(&self, request: &LevelRequest, rng: &mut dyn RandomSource) -> NargylResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, request: &LevelRequest) -> NargylResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use crate::RandomSource;

    /// Evaluates a level-scaled step table of `(value, from_level)` pairs.
    ///
    /// Entries are scanned from the last to the first; the first whose level
    /// has been reached wins. Below every threshold the value is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use nargyl::generation::utils::from_dungeon_level;
    ///
    /// let table = [(15, 3), (30, 5), (60, 7)];
    /// assert_eq!(from_dungeon_level(&table, 2), 0);
    /// assert_eq!(from_dungeon_level(&table, 5), 30);
    /// assert_eq!(from_dungeon_level(&table, 9), 60);
    /// ```
    pub fn from_dungeon_level(table: &[(u32, u32)], dungeon_level: u32) -> u32 {
        table
            .iter()
            .rev()
            .find(|(_, level)| dungeon_level >= *level)
            .map_or(0, |(value, _)| *value)
    }

    /// Weighted choice returning an index into `weights`.
    ///
    /// Draws a number in `1..=sum` and walks the weights cumulatively.
    /// Returns `None` when every weight is zero.
    pub fn random_choice_index(weights: &[u32], rng: &mut dyn RandomSource) -> Option<usize> {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return None;
        }
        let dice = rng.random_int(1, total as i32) as u32;
        let mut running = 0;
        for (index, weight) in weights.iter().enumerate() {
            running += weight;
            if dice <= running {
                return Some(index);
            }
        }
        None
    }

    /// Weighted choice among `(value, weight)` pairs.
    pub fn random_choice<T: Copy>(table: &[(T, u32)], rng: &mut dyn RandomSource) -> Option<T> {
        let weights: Vec<u32> = table.iter().map(|(_, weight)| *weight).collect();
        random_choice_index(&weights, rng).map(|index| table[index].0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRandom;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.map_width, 80);
        assert_eq!(config.map_height, 45);
        assert_eq!(config.room_attempts(1), 10);
        assert!(config.is_boss_level(5));
        assert!(config.is_boss_level(10));
        assert!(!config.is_boss_level(4));
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(5, 5, 10, 8);
        assert_eq!((room.x2, room.y2), (15, 13));
        assert_eq!(room.center(), Position::new(10, 9));
        assert_eq!(room.interior_positions().len(), 9 * 7);
        assert!(!room.contains(Position::new(15, 9)));
    }

    #[test]
    fn test_room_intersection_includes_edges() {
        let room1 = Room::new(5, 5, 10, 8);
        let touching = Room::new(15, 5, 6, 6);
        let apart = Room::new(16, 5, 6, 6);
        assert!(room1.intersects(&touching));
        assert!(touching.intersects(&room1));
        assert!(!room1.intersects(&apart));
    }

    #[test]
    fn test_random_choice_walks_cumulative_weights() {
        let weights = [80, 15];
        let mut rng = ScriptedRandom::new([1, 80, 81, 95]);
        assert_eq!(utils::random_choice_index(&weights, &mut rng), Some(0));
        assert_eq!(utils::random_choice_index(&weights, &mut rng), Some(0));
        assert_eq!(utils::random_choice_index(&weights, &mut rng), Some(1));
        assert_eq!(utils::random_choice_index(&weights, &mut rng), Some(1));
        assert_eq!(utils::random_choice_index(&[0, 0], &mut rng), None);
    }

    #[test]
    fn test_random_choice_skips_zero_weights() {
        let table = [('a', 0), ('b', 5), ('c', 0)];
        let mut rng = crate::seeded(1);
        for _ in 0..50 {
            assert_eq!(utils::random_choice(&table, &mut rng), Some('b'));
        }
    }

    #[test]
    fn test_from_dungeon_level_defaults_to_zero() {
        assert_eq!(utils::from_dungeon_level(&[(25, 2)], 1), 0);
        assert_eq!(utils::from_dungeon_level(&[(25, 2)], 2), 25);
        assert_eq!(utils::from_dungeon_level(&[], 9), 0);
    }
}
