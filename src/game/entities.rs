//! # Entities Module
//!
//! The universal actor/object record and constructors for the fixed entities
//! every game needs (player, start marker, stairs, fireball).

use crate::{new_entity_id, Ai, Color, DeathHandler, EntityId, Equipment, Fighter, Item, Position};
use serde::{Deserialize, Serialize};

/// Suffix appended to an item's name while it is equipped.
pub const EQUIPPED_MARKER: &str = " *";

/// A thing on the map or in the inventory.
///
/// Every capability is optional; an entity carries any subset of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub color: Color,
    pub name: String,
    /// Whether other entities may share this tile
    pub blocks: bool,
    /// Drawn on explored tiles even when out of sight
    pub always_visible: bool,
    /// Character level. Only meaningful for the player.
    pub level: u32,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
    pub equipment: Option<Equipment>,
}

impl Entity {
    /// Creates a bare entity with no capabilities.
    pub fn new(position: Position, glyph: char, name: impl Into<String>, color: Color) -> Self {
        Self {
            id: new_entity_id(),
            position,
            glyph,
            color,
            name: name.into(),
            blocks: false,
            always_visible: false,
            level: 1,
            fighter: None,
            ai: None,
            item: None,
            equipment: None,
        }
    }

    pub fn blocking(mut self) -> Self {
        self.blocks = true;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.always_visible = true;
        self
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }

    /// Attaches gear. Gear is always an item too, so an item capability is
    /// added when the entity has none.
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = Some(equipment);
        if self.item.is_none() {
            self.item = Some(Item::new(None));
        }
        self
    }

    /// Euclidean distance to another entity.
    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.position.euclidean_distance(other.position)
    }

    /// Whether this entity is something the player can target.
    pub fn is_hostile(&self) -> bool {
        self.fighter.is_some() && matches!(self.ai, Some(ref ai) if !ai.is_projectile())
    }

    pub fn is_equipped(&self) -> bool {
        self.equipment.as_ref().map_or(false, |gear| gear.is_equipped)
    }

    /// The player character with starting stats.
    pub fn player(position: Position) -> Self {
        Entity::new(position, 'O', "player", Color::WHITE)
            .blocking()
            .with_fighter(Fighter::new(100, 2, 5, 0, DeathHandler::Player))
    }

    /// Fixed marker placed in the first room of a standard level.
    pub fn start_marker(position: Position) -> Self {
        Entity::new(position, '^', "Start", Color::DARKER_RED).always_visible()
    }

    pub fn stairs(position: Position) -> Self {
        Entity::new(position, 'V', "Stairs", Color::WHITE).always_visible()
    }

    /// A homing projectile heading for `target`.
    pub fn fireball(position: Position, target: Position) -> Self {
        Entity::new(position, '*', "Fireball", Color::DESATURATED_RED)
            .with_fighter(Fighter::new(1, 100, 5, 0, DeathHandler::Projectile))
            .with_ai(Ai::Projectile { target })
    }
}
