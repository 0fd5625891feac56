//! # Combat Module
//!
//! Attack resolution, damage and death, healing, experience and leveling.
//!
//! Effective stats are never stored. They are recomputed from a fighter's
//! base values and the gear currently equipped every time they are read, so
//! equipping or removing an item takes effect immediately.

use crate::{
    capitalize, config, Color, DeathHandler, Entity, EntityId, Equipment, Fighter, GameState,
    GameStatus, NargylError, NargylResult,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Base power plus the power bonus of every piece of gear.
pub fn effective_power<'a>(fighter: &Fighter, gear: impl IntoIterator<Item = &'a Equipment>) -> i32 {
    fighter.base_power + gear.into_iter().map(|g| g.power_bonus).sum::<i32>()
}

pub fn effective_defense<'a>(
    fighter: &Fighter,
    gear: impl IntoIterator<Item = &'a Equipment>,
) -> i32 {
    fighter.base_defense + gear.into_iter().map(|g| g.defense_bonus).sum::<i32>()
}

pub fn effective_max_hp<'a>(
    fighter: &Fighter,
    gear: impl IntoIterator<Item = &'a Equipment>,
) -> i32 {
    fighter.base_max_hp + gear.into_iter().map(|g| g.max_hp_bonus).sum::<i32>()
}

/// Life steal has no base value; it comes from gear alone.
pub fn effective_life_steal<'a>(gear: impl IntoIterator<Item = &'a Equipment>) -> i32 {
    gear.into_iter().map(|g| g.life_steal_bonus).sum()
}

/// Experience needed to advance from `level` to the next one.
pub fn xp_to_next_level(level: u32) -> i32 {
    config::LEVEL_UP_BASE + level as i32 * config::LEVEL_UP_FACTOR
}

/// Result of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Hit { damage: i32 },
    NoEffect,
}

/// Stat raised when the player levels up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpChoice {
    /// +20 max HP
    Constitution,
    /// +1 power
    Strength,
    /// +1 defense
    Toughness,
}

impl LevelUpChoice {
    pub fn all() -> [LevelUpChoice; 3] {
        [
            LevelUpChoice::Constitution,
            LevelUpChoice::Strength,
            LevelUpChoice::Toughness,
        ]
    }

    pub fn from_index(index: usize) -> Option<LevelUpChoice> {
        Self::all().get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            LevelUpChoice::Constitution => "Constitution (+20 HP)",
            LevelUpChoice::Strength => "Strength (+1 attack)",
            LevelUpChoice::Toughness => "Toughness (+1 defense)",
        }
    }
}

impl GameState {
    fn fighter(&self, id: EntityId) -> Option<&Fighter> {
        self.entity(id).and_then(|entity| entity.fighter.as_ref())
    }

    fn fighter_mut(&mut self, id: EntityId) -> Option<&mut Fighter> {
        self.entity_mut(id).and_then(|entity| entity.fighter.as_mut())
    }

    /// Effective power of an entity; 0 without a fighter.
    pub fn power(&self, id: EntityId) -> i32 {
        self.fighter(id)
            .map_or(0, |fighter| effective_power(fighter, self.equipped_gear(id)))
    }

    pub fn defense(&self, id: EntityId) -> i32 {
        self.fighter(id)
            .map_or(0, |fighter| effective_defense(fighter, self.equipped_gear(id)))
    }

    pub fn max_hp(&self, id: EntityId) -> i32 {
        self.fighter(id)
            .map_or(0, |fighter| effective_max_hp(fighter, self.equipped_gear(id)))
    }

    pub fn life_steal(&self, id: EntityId) -> i32 {
        if self.fighter(id).is_none() {
            return 0;
        }
        effective_life_steal(self.equipped_gear(id))
    }

    pub fn hp(&self, id: EntityId) -> i32 {
        self.fighter(id).map_or(0, |fighter| fighter.hp)
    }

    /// One melee or ranged attack: attacker power minus defender defense.
    ///
    /// A damaging hit on anything but the player heals the player by its
    /// life steal.
    pub fn attack(&mut self, attacker: EntityId, defender: EntityId) -> NargylResult<AttackOutcome> {
        if self.fighter(attacker).is_none() {
            return Err(NargylError::InvalidAction(format!(
                "{} cannot attack",
                self.name_of(attacker)
            )));
        }
        if self.fighter(defender).is_none() {
            return Err(NargylError::InvalidAction(format!(
                "{} cannot be attacked",
                self.name_of(defender)
            )));
        }

        let damage = self.power(attacker) - self.defense(defender);
        let attacker_name = capitalize(&self.name_of(attacker));
        let defender_name = self.name_of(defender);

        if damage > 0 {
            self.message(
                format!(
                    "{} attacks {} for {} hit points.",
                    attacker_name, defender_name, damage
                ),
                Color::LIGHTEST_AZURE,
            );
            self.take_damage(defender, damage)?;
            if !self.is_player(defender) {
                let steal = self.life_steal(self.player_id);
                self.heal(self.player_id, steal);
            }
            Ok(AttackOutcome::Hit { damage })
        } else {
            self.message(
                format!(
                    "{} attacks {} but it has no effect!",
                    attacker_name, defender_name
                ),
                Color::DESATURATED_AZURE,
            );
            Ok(AttackOutcome::NoEffect)
        }
    }

    /// Removes HP. Crossing from positive HP to zero or below runs the
    /// death handler once and, unless the victim is the player, awards its
    /// experience to the player.
    pub fn take_damage(&mut self, id: EntityId, damage: i32) -> NargylResult<()> {
        if damage <= 0 {
            return Ok(());
        }
        let (was_alive, is_dead, xp, death) = match self.fighter_mut(id) {
            Some(fighter) => {
                let was_alive = fighter.is_alive();
                fighter.hp -= damage;
                (was_alive, !fighter.is_alive(), fighter.xp, fighter.death)
            }
            None => return Err(NargylError::EntityNotFound(id)),
        };

        if was_alive && is_dead {
            self.die(id, death, xp)?;
            if !self.is_player(id) {
                if let Some(fighter) = self.fighter_mut(self.player_id) {
                    fighter.xp += xp;
                }
            }
        }
        Ok(())
    }

    fn die(&mut self, id: EntityId, death: DeathHandler, xp: i32) -> NargylResult<()> {
        debug!("{} dies ({:?})", self.name_of(id), death);
        match death {
            DeathHandler::Player => {
                self.message("You died!", Color::RED);
                self.status = GameStatus::Dead;
                let player = self.entity_mut(id).ok_or(NargylError::EntityNotFound(id))?;
                player.glyph = 'x';
                player.color = Color::DARK_RED;
                info!("The player has died");
            }
            DeathHandler::Monster => {
                self.corpse(id, xp)?;
                self.send_to_back(id);
            }
            DeathHandler::Boss => {
                let position = self.corpse(id, xp)?;
                let stairs = self.add_entity(Entity::stairs(position));
                self.stairs_id = Some(stairs);
                self.send_to_back(stairs);
                self.send_to_back(id);
                info!("Boss defeated, stairs revealed at ({}, {})", position.x, position.y);
            }
            DeathHandler::Projectile => {
                let projectile = self.entity_mut(id).ok_or(NargylError::EntityNotFound(id))?;
                projectile.glyph = ' ';
                projectile.ai = None;
                projectile.fighter = None;
                self.send_to_back(id);
            }
        }
        Ok(())
    }

    /// Turns a dead monster into inert remains and returns where it lies.
    fn corpse(&mut self, id: EntityId, xp: i32) -> NargylResult<crate::Position> {
        let name = self.name_of(id);
        self.message(format!("{} is dead!", capitalize(&name)), Color::ORANGE);
        self.message(format!("{} experience points awarded!", xp), Color::WHITE);

        let entity = self.entity_mut(id).ok_or(NargylError::EntityNotFound(id))?;
        entity.glyph = 'x';
        entity.color = Color::DARK_RED;
        entity.blocks = false;
        entity.fighter = None;
        entity.ai = None;
        entity.name = format!("remains of {}", name);
        Ok(entity.position)
    }

    /// Adds HP, never above effective max HP.
    pub fn heal(&mut self, id: EntityId, amount: i32) {
        let max_hp = self.max_hp(id);
        if let Some(fighter) = self.fighter_mut(id) {
            fighter.hp = (fighter.hp + amount).min(max_hp);
        }
    }

    /// Whether the player has enough experience for the next level.
    pub fn level_up_pending(&self) -> bool {
        match self.player() {
            Ok(player) => player
                .fighter
                .as_ref()
                .map_or(false, |fighter| fighter.xp >= xp_to_next_level(player.level)),
            Err(_) => false,
        }
    }

    /// Advances the player one level if enough experience has been gathered.
    ///
    /// Heals by half of max HP, increments the level and
    /// subtracts the threshold, so excess experience carries over. The stat
    /// increase is applied separately through [`GameState::apply_level_up_choice`].
    pub fn level_up(&mut self) -> NargylResult<bool> {
        if !self.level_up_pending() {
            return Ok(false);
        }
        let half = self.max_hp(self.player_id) / 2;
        let player = self.player_mut()?;
        let threshold = xp_to_next_level(player.level);
        player.level += 1;
        let level = player.level;
        if let Some(fighter) = player.fighter.as_mut() {
            fighter.xp -= threshold;
        }
        self.heal(self.player_id, half);

        self.message(
            format!(
                "You can feel yourself growing stronger! You have reached level {}!",
                level
            ),
            Color::YELLOW,
        );
        info!("Player reached level {}", level);
        Ok(true)
    }

    pub fn apply_level_up_choice(&mut self, choice: LevelUpChoice) -> NargylResult<()> {
        let id = self.player_id;
        let fighter = self
            .fighter_mut(id)
            .ok_or(NargylError::EntityNotFound(id))?;
        match choice {
            LevelUpChoice::Constitution => fighter.base_max_hp += 20,
            LevelUpChoice::Strength => fighter.base_power += 1,
            LevelUpChoice::Toughness => fighter.base_defense += 1,
        }
        debug!("Level-up choice: {:?}", choice);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{monster, open_state, sword};
    use crate::{Ai, Position, Slot};

    #[test]
    fn test_attack_formula() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(6, 5)));
        state.entity_mut(id).unwrap().fighter.as_mut().unwrap().base_defense = 4;
        state.player_mut().unwrap().fighter.as_mut().unwrap().base_power = 10;

        let outcome = state.attack(state.player_id, id).unwrap();
        assert_eq!(outcome, AttackOutcome::Hit { damage: 6 });
        assert_eq!(state.hp(id), 4);
        assert!(state.messages.contains("Player attacks Alien Weakling for 6 hit points."));
    }

    #[test]
    fn test_attack_without_effect() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(6, 5)));
        state.entity_mut(id).unwrap().fighter.as_mut().unwrap().base_defense = 5;
        state.player_mut().unwrap().fighter.as_mut().unwrap().base_power = 3;

        let outcome = state.attack(state.player_id, id).unwrap();
        assert_eq!(outcome, AttackOutcome::NoEffect);
        assert_eq!(state.hp(id), 10);
        assert!(state.messages.contains("but it has no effect!"));
    }

    #[test]
    fn test_overkill_kills_once() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(6, 5)));
        state.entity_mut(id).unwrap().fighter.as_mut().unwrap().hp = 5;

        state.take_damage(id, 8).unwrap();
        let remains = state.entity(id).unwrap();
        assert_eq!(remains.name, "remains of Alien Weakling");
        assert!(remains.fighter.is_none());
        assert!(remains.ai.is_none());
        assert!(!remains.blocks);
        assert_eq!(state.index_of(id), Some(0));

        let player_xp = state.player().unwrap().fighter.as_ref().unwrap().xp;
        assert_eq!(player_xp, 20);
    }

    #[test]
    fn test_player_death() {
        let mut state = open_state();
        let player_id = state.player_id;
        state.take_damage(player_id, 150).unwrap();
        assert_eq!(state.status, GameStatus::Dead);
        assert_eq!(state.player().unwrap().glyph, 'x');

        // Further damage never re-runs the handler
        state.take_damage(player_id, 10).unwrap();
        let deaths = state.messages.iter().filter(|m| m.text == "You died!").count();
        assert_eq!(deaths, 1);
        assert_eq!(state.player().unwrap().fighter.as_ref().unwrap().xp, 0);
    }

    #[test]
    fn test_boss_death_reveals_stairs() {
        let mut state = open_state();
        let boss = Entity::new(Position::new(9, 9), 'X', "Alien Champion", Color::BLACK)
            .blocking()
            .with_fighter(Fighter::new(5, 0, 6, 100, DeathHandler::Boss))
            .with_ai(Ai::Boss);
        let id = state.add_entity(boss);

        state.take_damage(id, 5).unwrap();
        let stairs_id = state.stairs_id.unwrap();
        let stairs = state.entity(stairs_id).unwrap();
        assert_eq!(stairs.position, Position::new(9, 9));
        assert_eq!(state.index_of(id), Some(0));
        assert_eq!(state.index_of(stairs_id), Some(1));
    }

    #[test]
    fn test_life_steal_only_when_player_hits() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(6, 5)));
        let mut fang = crate::game::test_support::gear(
            "Fang",
            Equipment::new(Slot::RightHand).with_life_steal(5),
        );
        fang.equipment.as_mut().unwrap().is_equipped = true;
        state.inventory.push(fang);
        state.player_mut().unwrap().fighter.as_mut().unwrap().hp = 50;

        state.attack(state.player_id, id).unwrap();
        assert_eq!(state.hp(state.player_id), 55);

        state.entity_mut(id).unwrap().fighter.as_mut().unwrap().base_power = 10;
        state.attack(id, state.player_id).unwrap();
        // 10 power - 2 defense
        assert_eq!(state.hp(state.player_id), 47);
        assert_eq!(state.hp(id), 10 - 5);
    }

    #[test]
    fn test_stats_follow_equipment() {
        let mut state = open_state();
        state.inventory.push(sword());
        assert_eq!(state.power(state.player_id), 5);
        state.inventory[0].equipment.as_mut().unwrap().is_equipped = true;
        assert_eq!(state.power(state.player_id), 7);
        state.inventory[0].equipment.as_mut().unwrap().is_equipped = false;
        assert_eq!(state.power(state.player_id), 5);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut state = open_state();
        let player_id = state.player_id;
        state.player_mut().unwrap().fighter.as_mut().unwrap().hp = 90;
        state.heal(player_id, 30);
        assert_eq!(state.hp(player_id), 100);
    }

    #[test]
    fn test_level_up_threshold() {
        assert_eq!(xp_to_next_level(1), 350);
        assert_eq!(xp_to_next_level(2), 500);

        let mut state = open_state();
        {
            let fighter = state.player_mut().unwrap().fighter.as_mut().unwrap();
            fighter.xp = 360;
            fighter.hp = 10;
        }
        assert!(state.level_up().unwrap());
        let player = state.player().unwrap();
        assert_eq!(player.level, 2);
        assert_eq!(player.fighter.as_ref().unwrap().xp, 10);
        assert_eq!(player.fighter.as_ref().unwrap().hp, 60);
        assert!(!state.level_up().unwrap());
    }

    #[test]
    fn test_level_up_heal_is_clamped() {
        let mut state = open_state();
        {
            let fighter = state.player_mut().unwrap().fighter.as_mut().unwrap();
            fighter.xp = xp_to_next_level(1);
            fighter.hp = 80;
        }
        assert!(state.level_up().unwrap());
        assert_eq!(state.hp(state.player_id), 100);
    }

    #[test]
    fn test_level_up_choices() {
        let mut state = open_state();
        state.apply_level_up_choice(LevelUpChoice::Constitution).unwrap();
        state.apply_level_up_choice(LevelUpChoice::Strength).unwrap();
        state.apply_level_up_choice(LevelUpChoice::Toughness).unwrap();
        assert_eq!(state.max_hp(state.player_id), 120);
        assert_eq!(state.power(state.player_id), 6);
        assert_eq!(state.defense(state.player_id), 3);
        assert_eq!(LevelUpChoice::from_index(3), None);
    }
}
