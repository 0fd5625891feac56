//! # AI Module
//!
//! Per-entity behaviors, run once per turn for every entity that has one.
//!
//! The confused state wraps the behavior it replaced and hands it back
//! unchanged when it wears off.

use crate::{
    cast_fireball, config, unit_step, Color, EntityId, GameState, NargylResult, Position,
    RandomSource,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Behavior variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Chases and melees the player while in sight
    Basic,
    /// Casts fireballs from afar, melees up close
    Boss,
    /// Stumbles randomly, then reverts to `previous`
    Confused { previous: Box<Ai>, turns_left: u32 },
    /// Flies toward a fixed tile and bursts on the player
    Projectile { target: Position },
}

impl Ai {
    /// Wraps `previous` in a confusion overlay lasting `turns` turns.
    pub fn confused(previous: Ai, turns: u32) -> Ai {
        Ai::Confused {
            previous: Box::new(previous),
            turns_left: turns,
        }
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self, Ai::Projectile { .. })
    }
}

/// Runs one turn of the AI attached to `id`. Entities without an AI are skipped.
pub fn take_turn(state: &mut GameState, id: EntityId, rng: &mut dyn RandomSource) -> NargylResult<()> {
    let ai = match state.entity(id).and_then(|entity| entity.ai.clone()) {
        Some(ai) => ai,
        None => return Ok(()),
    };

    match ai {
        Ai::Basic => basic_turn(state, id),
        Ai::Boss => boss_turn(state, id),
        Ai::Confused {
            previous,
            turns_left,
        } => {
            confused_turn(state, id, *previous, turns_left, rng);
            Ok(())
        }
        Ai::Projectile { target } => projectile_turn(state, id, target),
    }
}

/// Where the entity stands, its distance to the player and whether the
/// player can see it.
fn bearings(state: &GameState, id: EntityId) -> NargylResult<Option<(Position, Position, f64)>> {
    let player = state.player()?;
    Ok(state.entity(id).and_then(|entity| {
        if state.is_visible(entity.position) {
            Some((entity.position, player.position, entity.distance_to(player)))
        } else {
            None
        }
    }))
}

fn basic_turn(state: &mut GameState, id: EntityId) -> NargylResult<()> {
    // If you can see it, it can see you
    let Some((_, player, distance)) = bearings(state, id)? else {
        return Ok(());
    };

    if distance >= 2.0 {
        state.move_towards(id, player);
    } else if state.hp(state.player_id) > 0 {
        state.attack(id, state.player_id)?;
    }
    Ok(())
}

fn boss_turn(state: &mut GameState, id: EntityId) -> NargylResult<()> {
    let Some((position, player, distance)) = bearings(state, id)? else {
        return Ok(());
    };

    if distance >= 5.0 {
        let name = crate::capitalize(&state.name_of(id));
        state.message(format!("The {} begins casting Fireball!", name), Color::RED);
        cast_fireball(state, position, player);
    } else if distance >= 2.0 {
        state.move_towards(id, player);
    } else {
        state.attack(id, state.player_id)?;
    }
    Ok(())
}

fn confused_turn(
    state: &mut GameState,
    id: EntityId,
    previous: Ai,
    turns_left: u32,
    rng: &mut dyn RandomSource,
) {
    if turns_left > 0 {
        let dx = rng.random_int(-1, 1);
        let dy = rng.random_int(-1, 1);
        state.move_by(id, Position::new(dx, dy));
        if let Some(entity) = state.entity_mut(id) {
            entity.ai = Some(Ai::confused(previous, turns_left - 1));
        }
    } else {
        let name = state.name_of(id);
        if let Some(entity) = state.entity_mut(id) {
            entity.ai = Some(previous);
        }
        state.message(format!("The {} is no longer confused!", name), Color::RED);
    }
}

fn projectile_turn(state: &mut GameState, id: EntityId, target: Position) -> NargylResult<()> {
    let position = match state.entity(id) {
        Some(entity) => entity.position,
        None => return Ok(()),
    };
    let next = position + unit_step(position, target);
    let player = state.player()?.position;

    if next == player {
        debug!("Fireball hits the player at ({}, {})", next.x, next.y);
        state.message("The fireball engulfs you!", Color::ORANGE);
        state.take_damage(state.player_id, config::FIREBALL_DAMAGE)?;
        state.take_damage(id, 1)
    } else if position == target || state.map.is_blocked(next) {
        state.take_damage(id, 1)
    } else {
        if let Some(entity) = state.entity_mut(id) {
            entity.position = next;
        }
        if next == target {
            state.take_damage(id, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{monster, open_state};
    use crate::ScriptedRandom;

    #[test]
    fn test_basic_monster_idle_when_unseen() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(10, 5)));
        state.visible.clear();
        take_turn(&mut state, id, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(state.entity(id).unwrap().position, Position::new(10, 5));
    }

    #[test]
    fn test_basic_monster_pursues_then_attacks() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(8, 5)));
        let mut rng = ScriptedRandom::default();

        take_turn(&mut state, id, &mut rng).unwrap();
        assert_eq!(state.entity(id).unwrap().position, Position::new(7, 5));

        take_turn(&mut state, id, &mut rng).unwrap();
        assert_eq!(state.entity(id).unwrap().position, Position::new(6, 5));

        take_turn(&mut state, id, &mut rng).unwrap();
        // 3 power against 2 defense
        assert_eq!(state.hp(state.player_id), 99);
    }

    #[test]
    fn test_confusion_restores_previous_ai() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(10, 10)));
        state.entity_mut(id).unwrap().ai = Some(Ai::confused(Ai::Basic, 3));
        let mut rng = ScriptedRandom::new([1, 0, 1, 0, 1, 0]);

        for _ in 0..3 {
            take_turn(&mut state, id, &mut rng).unwrap();
            assert!(matches!(state.entity(id).unwrap().ai, Some(Ai::Confused { .. })));
        }
        assert_eq!(state.entity(id).unwrap().position, Position::new(13, 10));
        assert_eq!(rng.remaining(), 0);

        take_turn(&mut state, id, &mut rng).unwrap();
        assert_eq!(state.entity(id).unwrap().ai, Some(Ai::Basic));
        assert_eq!(state.entity(id).unwrap().position, Position::new(13, 10));
        assert!(state.messages.contains("is no longer confused!"));
    }

    #[test]
    fn test_boss_casts_from_range() {
        let mut state = open_state();
        let boss = monster(Position::new(12, 5)).with_ai(Ai::Boss);
        let id = state.add_entity(boss);
        let before = state.entities.len();

        take_turn(&mut state, id, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(state.entities.len(), before + 1);
        let fireball = state.entities.last().unwrap();
        assert_eq!(fireball.ai, Some(Ai::Projectile { target: Position::new(5, 5) }));
        assert!(state.messages.contains("begins casting Fireball!"));
    }

    #[test]
    fn test_projectile_hits_player() {
        let mut state = open_state();
        let id = cast_fireball(&mut state, Position::new(8, 5), Position::new(5, 5));
        let mut rng = ScriptedRandom::default();

        take_turn(&mut state, id, &mut rng).unwrap();
        take_turn(&mut state, id, &mut rng).unwrap();
        assert_eq!(state.entity(id).unwrap().position, Position::new(6, 5));
        assert_eq!(state.hp(state.player_id), 100);

        take_turn(&mut state, id, &mut rng).unwrap();
        assert_eq!(state.hp(state.player_id), 100 - config::FIREBALL_DAMAGE);
        let spent = state.entity(id).unwrap();
        assert!(spent.ai.is_none());
        assert!(spent.fighter.is_none());
    }

    #[test]
    fn test_projectile_can_be_dodged() {
        let mut state = open_state();
        let id = cast_fireball(&mut state, Position::new(8, 5), Position::new(5, 5));
        state.player_mut().unwrap().position = Position::new(5, 8);
        let mut rng = ScriptedRandom::default();

        for _ in 0..3 {
            take_turn(&mut state, id, &mut rng).unwrap();
        }
        assert_eq!(state.hp(state.player_id), 100);
        assert!(state.entity(id).unwrap().ai.is_none());
    }

    #[test]
    fn test_projectile_bursts_on_wall() {
        let mut state = open_state();
        let id = cast_fireball(&mut state, Position::new(1, 5), Position::new(-4, 5));
        take_turn(&mut state, id, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(state.entity(id).unwrap().position, Position::new(1, 5));
        assert!(state.entity(id).unwrap().fighter.is_none());
    }
}
