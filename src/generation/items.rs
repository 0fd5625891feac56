//! # Item Generation
//!
//! Item spawn tables, magic bonus rolls and item construction.

use super::utils::{from_dungeon_level, random_choice};
use crate::{
    Color, Entity, Equipment, Item, NargylError, NargylResult, Position, RandomSource, Slot,
    UseEffect,
};

/// Upper bound of items per room, as `(count, from_level)` steps.
pub const MAX_ITEMS_TABLE: [(u32, u32); 2] = [(1, 1), (2, 4)];

/// Every kind of item that can lie in a standard room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    HealthPotion,
    ScrollOfLightning,
    ScrollOfConfuse,
    ScrollOfVampirism,
    Sword,
    Bow,
    Armor,
    Shield,
    MagicSword,
    MagicBow,
    MagicArmor,
    MagicShield,
}

impl ItemKind {
    pub fn all() -> [ItemKind; 12] {
        [
            ItemKind::HealthPotion,
            ItemKind::ScrollOfLightning,
            ItemKind::ScrollOfConfuse,
            ItemKind::ScrollOfVampirism,
            ItemKind::Sword,
            ItemKind::Bow,
            ItemKind::Armor,
            ItemKind::Shield,
            ItemKind::MagicSword,
            ItemKind::MagicBow,
            ItemKind::MagicArmor,
            ItemKind::MagicShield,
        ]
    }

    /// Spawn weight on a dungeon level.
    pub fn weight(self, dungeon_level: u32) -> u32 {
        let table: &[(u32, u32)] = match self {
            ItemKind::HealthPotion => return 35,
            ItemKind::ScrollOfLightning => &[(25, 2)],
            ItemKind::ScrollOfConfuse => &[(25, 6)],
            ItemKind::ScrollOfVampirism => &[(10, 3)],
            ItemKind::Sword => &[(5, 2)],
            ItemKind::Bow => &[(5, 2)],
            ItemKind::Armor => &[(7, 4)],
            ItemKind::Shield => &[(15, 6)],
            ItemKind::MagicSword => &[(5, 5)],
            ItemKind::MagicBow => &[(5, 7)],
            ItemKind::MagicArmor => &[(5, 6)],
            ItemKind::MagicShield => &[(5, 8)],
        };
        from_dungeon_level(table, dungeon_level)
    }

    /// The gear family of magic items, which carry a rolled bonus.
    pub fn magic_family(self) -> Option<GearFamily> {
        match self {
            ItemKind::MagicSword => Some(GearFamily::Sword),
            ItemKind::MagicBow => Some(GearFamily::Bow),
            ItemKind::MagicArmor => Some(GearFamily::Armor),
            ItemKind::MagicShield => Some(GearFamily::Shield),
            _ => None,
        }
    }
}

/// Weighted item table for a dungeon level, in a fixed order.
pub fn item_table(dungeon_level: u32) -> Vec<(ItemKind, u32)> {
    ItemKind::all()
        .into_iter()
        .map(|kind| (kind, kind.weight(dungeon_level)))
        .collect()
}

pub fn max_items_per_room(dungeon_level: u32) -> u32 {
    from_dungeon_level(&MAX_ITEMS_TABLE, dungeon_level)
}

/// The extra stat a magic item grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BonusStat {
    Health,
    Defense,
    Power,
    LifeSteal,
}

impl BonusStat {
    /// Weighted roll table.
    pub const TABLE: [(BonusStat, u32); 4] = [
        (BonusStat::Health, 30),
        (BonusStat::Defense, 40),
        (BonusStat::Power, 25),
        (BonusStat::LifeSteal, 5),
    ];

    pub fn label(self) -> &'static str {
        match self {
            BonusStat::Health => "Health",
            BonusStat::Defense => "Defense",
            BonusStat::Power => "Power",
            BonusStat::LifeSteal => "Lifesteal",
        }
    }

    /// Adds this stat's fixed magnitude to a piece of gear.
    pub fn apply(self, mut gear: Equipment) -> Equipment {
        match self {
            BonusStat::Health => gear.max_hp_bonus += 25,
            BonusStat::Defense => gear.defense_bonus += 2,
            BonusStat::Power => gear.power_bonus += 3,
            BonusStat::LifeSteal => gear.life_steal_bonus += 5,
        }
        gear
    }
}

/// Families of magic gear, each with stats it may not roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GearFamily {
    Sword,
    Bow,
    Armor,
    Shield,
}

impl GearFamily {
    pub fn name(self) -> &'static str {
        match self {
            GearFamily::Sword => "Sword",
            GearFamily::Bow => "Bow",
            GearFamily::Armor => "Armor",
            GearFamily::Shield => "Shield",
        }
    }

    /// Weapons never grant defense; armor and shields never grant power or life steal.
    pub fn allows(self, stat: BonusStat) -> bool {
        match self {
            GearFamily::Sword | GearFamily::Bow => stat != BonusStat::Defense,
            GearFamily::Armor | GearFamily::Shield => {
                !matches!(stat, BonusStat::Power | BonusStat::LifeSteal)
            }
        }
    }

    /// Base gear before the magic bonus.
    fn base(self) -> (Equipment, char) {
        match self {
            GearFamily::Sword => (Equipment::new(Slot::RightHand).with_power(3), 't'),
            GearFamily::Bow => (Equipment::new(Slot::RightHand).ranged().with_power(2), 'D'),
            GearFamily::Armor => (Equipment::new(Slot::Body).with_defense(3), 'A'),
            GearFamily::Shield => (Equipment::new(Slot::LeftHand).with_defense(2), ')'),
        }
    }
}

/// Rolls a bonus stat for `family`, rerolling stats the family forbids.
pub fn roll_bonus_stat(
    family: GearFamily,
    rng: &mut dyn RandomSource,
    max_rerolls: u32,
) -> NargylResult<BonusStat> {
    for _ in 0..=max_rerolls {
        if let Some(stat) = random_choice(&BonusStat::TABLE, rng) {
            if family.allows(stat) {
                return Ok(stat);
            }
        }
    }
    Err(NargylError::GenerationFailed(format!(
        "No allowed bonus stat for {} after {} rerolls",
        family.name(),
        max_rerolls
    )))
}

/// Builds an item of the given kind. Magic gear draws its bonus from `rng`.
pub fn spawn_item(
    kind: ItemKind,
    position: Position,
    rng: &mut dyn RandomSource,
    max_rerolls: u32,
) -> NargylResult<Entity> {
    let scroll = |name: &str, color: Color, effect: UseEffect| {
        Entity::new(position, '#', name, color).with_item(Item::new(Some(effect)))
    };
    let gear = |glyph: char, name: &str, equipment: Equipment| {
        Entity::new(position, glyph, name, Color::WHITE).with_equipment(equipment)
    };

    let entity = match kind {
        ItemKind::HealthPotion => Entity::new(position, '*', "health potion", Color::FUCHSIA)
            .always_visible()
            .with_item(Item::new(Some(UseEffect::Heal))),
        ItemKind::ScrollOfLightning => {
            scroll("Scroll of Lightning", Color::DARK_VIOLET, UseEffect::Lightning)
        }
        ItemKind::ScrollOfConfuse => scroll("Scroll of Confuse", Color::SEPIA, UseEffect::Confuse),
        ItemKind::ScrollOfVampirism => {
            scroll("Scroll of Vampirism", Color::DARK_CRIMSON, UseEffect::LifeSteal)
        }
        ItemKind::Sword => gear('t', "Sword", Equipment::new(Slot::RightHand).with_power(2)),
        ItemKind::Bow => gear('D', "Bow", Equipment::new(Slot::RightHand).ranged()),
        ItemKind::Armor => gear('A', "Armor", Equipment::new(Slot::Body).with_defense(3)),
        ItemKind::Shield => gear(')', "Shield", Equipment::new(Slot::LeftHand).with_defense(1)),
        ItemKind::MagicSword | ItemKind::MagicBow | ItemKind::MagicArmor | ItemKind::MagicShield => {
            let family = kind.magic_family().ok_or_else(|| {
                NargylError::GenerationFailed(format!("{:?} has no gear family", kind))
            })?;
            let stat = roll_bonus_stat(family, rng, max_rerolls)?;
            let (base, glyph) = family.base();
            let name = format!("{} of {}", family.name(), stat.label());
            Entity::new(position, glyph, name, Color::GREEN).with_equipment(stat.apply(base))
        }
    };
    Ok(entity)
}

/// The guaranteed reward lying next to the player in a boss arena.
pub fn bow_of_healing(position: Position) -> Entity {
    let equipment = Equipment::new(Slot::RightHand)
        .ranged()
        .with_power(4)
        .with_defense(5)
        .with_life_steal(6);
    Entity::new(position, 't', "Bow of Healing", Color::GOLD).with_equipment(equipment)
}
