//! # Components Module
//!
//! Optional capabilities attached to an [`Entity`](crate::Entity).
//!
//! Capabilities never point back at their owner. Code that needs the owner
//! works from the owning entity's id and reaches the capability through it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Equip locations. At most one equipped item occupies each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    RightHand,
    LeftHand,
    Body,
}

impl Slot {
    pub fn all() -> [Slot; 3] {
        [Slot::RightHand, Slot::LeftHand, Slot::Body]
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::RightHand => "right hand",
            Slot::LeftHand => "left hand",
            Slot::Body => "body",
        };
        write!(f, "{}", name)
    }
}

/// What happens when a fighter's HP drops to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathHandler {
    Player,
    Monster,
    Boss,
    Projectile,
}

/// Combat capability.
///
/// Only base values are stored. Effective power, defense, max HP and life
/// steal are computed on demand from these plus equipped gear, see
/// [`combat`](crate::game::combat).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub hp: i32,
    pub base_max_hp: i32,
    pub base_defense: i32,
    pub base_power: i32,
    /// Experience carried by this fighter. For monsters it is the award on
    /// death; for the player it is the accumulated total.
    pub xp: i32,
    pub death: DeathHandler,
}

impl Fighter {
    /// Creates a fighter at full health.
    pub fn new(hp: i32, defense: i32, power: i32, xp: i32, death: DeathHandler) -> Self {
        Self {
            hp,
            base_max_hp: hp,
            base_defense: defense,
            base_power: power,
            xp,
            death,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Gear capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub slot: Slot,
    pub is_ranged: bool,
    pub power_bonus: i32,
    pub defense_bonus: i32,
    pub max_hp_bonus: i32,
    pub life_steal_bonus: i32,
    pub is_equipped: bool,
}

impl Equipment {
    /// Unequipped gear with no bonuses.
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            is_ranged: false,
            power_bonus: 0,
            defense_bonus: 0,
            max_hp_bonus: 0,
            life_steal_bonus: 0,
            is_equipped: false,
        }
    }

    pub fn ranged(mut self) -> Self {
        self.is_ranged = true;
        self
    }

    pub fn with_power(mut self, bonus: i32) -> Self {
        self.power_bonus = bonus;
        self
    }

    pub fn with_defense(mut self, bonus: i32) -> Self {
        self.defense_bonus = bonus;
        self
    }

    pub fn with_life_steal(mut self, bonus: i32) -> Self {
        self.life_steal_bonus = bonus;
        self
    }
}

/// Effects an inventory item can apply when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseEffect {
    Heal,
    Confuse,
    Lightning,
    LifeSteal,
}

/// Result of applying a use effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// The effect happened; the item is consumed
    Used,
    /// No valid target or nothing to do; the item is kept
    Cancelled,
}

/// Inventory capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub collectable: bool,
    pub use_effect: Option<UseEffect>,
}

impl Item {
    pub fn new(use_effect: Option<UseEffect>) -> Self {
        Self {
            collectable: true,
            use_effect,
        }
    }

    /// An item that sits on the map but cannot be picked up.
    pub fn uncollectable() -> Self {
        Self {
            collectable: false,
            use_effect: None,
        }
    }
}
