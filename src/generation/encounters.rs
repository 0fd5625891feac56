//! # Encounter Generation
//!
//! Monster spawn tables and monster construction.
//!
//! Monster strength scales with the player's character level; how often each
//! kind appears scales with the dungeon level.

use super::utils::from_dungeon_level;
use crate::{Ai, Color, DeathHandler, Entity, Fighter, Position};

/// Upper bound of monsters per room, as `(count, from_level)` steps.
pub const MAX_MONSTERS_TABLE: [(u32, u32); 3] = [(2, 1), (4, 4), (6, 6)];

/// Kinds of monster that populate standard rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    AlienWeakling,
    AlienInvader,
}

impl MonsterKind {
    pub fn all() -> [MonsterKind; 2] {
        [MonsterKind::AlienWeakling, MonsterKind::AlienInvader]
    }

    pub fn name(self) -> &'static str {
        match self {
            MonsterKind::AlienWeakling => "Alien Weakling",
            MonsterKind::AlienInvader => "Alien Invader",
        }
    }

    /// Spawn weight on a dungeon level.
    pub fn weight(self, dungeon_level: u32) -> u32 {
        match self {
            MonsterKind::AlienWeakling => 80,
            MonsterKind::AlienInvader => {
                from_dungeon_level(&[(15, 3), (30, 5), (60, 7)], dungeon_level)
            }
        }
    }

    /// Builds a monster of this kind scaled to the player's level.
    pub fn spawn(self, position: Position, player_level: u32) -> Entity {
        let level = player_level as i32;
        let (fighter, color) = match self {
            MonsterKind::AlienWeakling => (
                Fighter::new(10 + 10 * level, level / 4, level / 2 + 4, 20 + 5 * level, DeathHandler::Monster),
                Color::DESATURATED_GREEN,
            ),
            MonsterKind::AlienInvader => (
                Fighter::new(20 + 15 * level, 2 + level / 4, level / 2 + 7, 50 + 10 * level, DeathHandler::Monster),
                Color::DARKEST_GREEN,
            ),
        };
        Entity::new(position, 'X', self.name(), color)
            .blocking()
            .with_fighter(fighter)
            .with_ai(Ai::Basic)
    }
}

/// Weighted monster table for a dungeon level, in a fixed order.
pub fn monster_table(dungeon_level: u32) -> Vec<(MonsterKind, u32)> {
    MonsterKind::all()
        .into_iter()
        .map(|kind| (kind, kind.weight(dungeon_level)))
        .collect()
}

pub fn max_monsters_per_room(dungeon_level: u32) -> u32 {
    from_dungeon_level(&MAX_MONSTERS_TABLE, dungeon_level)
}

/// The boss guarding every boss arena.
pub fn spawn_boss(position: Position, player_level: u32) -> Entity {
    let level = player_level as i32;
    Entity::new(position, 'X', "Alien Champion", Color::BLACK)
        .blocking()
        .with_fighter(Fighter::new(80 + 15 * level, 5, 6, 100 + 10 * level, DeathHandler::Boss))
        .with_ai(Ai::Boss)
}
