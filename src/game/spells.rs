//! # Spells Module
//!
//! Targeting and the effects of usable items.

use crate::{
    config, Ai, Color, Entity, EntityId, GameState, NargylError, NargylResult, Position,
    UseEffect, UseOutcome,
};
use log::debug;

/// The nearest hostile the player can see within `range`.
///
/// Projectiles and the player are never targets.
pub fn closest_hostile(state: &GameState, range: i32) -> Option<EntityId> {
    let origin = state.player().ok()?.position;
    let mut closest = None;
    let mut closest_distance = range as f64 + 1.0;

    for entity in &state.entities {
        if state.is_player(entity.id) || !entity.is_hostile() || !state.is_visible(entity.position) {
            continue;
        }
        let distance = origin.euclidean_distance(entity.position);
        if distance < closest_distance {
            closest = Some(entity.id);
            closest_distance = distance;
        }
    }
    closest
}

/// Spell magnitude scaled by the player's character level.
fn scaled(state: &GameState, base: i32) -> NargylResult<i32> {
    let level = state.player()?.level as i32;
    Ok(base + config::SPELL_LEVEL_SCALING * level)
}

pub fn cast_heal(state: &mut GameState) -> NargylResult<UseOutcome> {
    let player_id = state.player_id;
    if state.hp(player_id) >= state.max_hp(player_id) {
        state.message("You are already at full health!", Color::RED);
        return Ok(UseOutcome::Cancelled);
    }

    let amount = scaled(state, config::HEAL_AMOUNT)?;
    state.message("You feel your wounds begin to heal!", Color::FUCHSIA);
    state.message(
        format!("You have regained {} hit points!", amount),
        Color::FUCHSIA,
    );
    state.heal(player_id, amount);
    Ok(UseOutcome::Used)
}

pub fn cast_confuse(state: &mut GameState) -> NargylResult<UseOutcome> {
    let Some(target) = closest_hostile(state, config::CONFUSE_RANGE) else {
        state.message("No enemy is close enough to confuse!", Color::RED);
        return Ok(UseOutcome::Cancelled);
    };

    let entity = state
        .entity_mut(target)
        .ok_or(NargylError::EntityNotFound(target))?;
    let previous = entity.ai.take().unwrap_or(Ai::Basic);
    entity.ai = Some(Ai::confused(previous, config::CONFUSE_NUM_TURNS));
    let name = entity.name.clone();

    state.message(
        format!(
            "The eyes of the {} look vacant, as it starts to stumble around!",
            name
        ),
        Color::SEPIA,
    );
    Ok(UseOutcome::Used)
}

pub fn cast_lightning(state: &mut GameState) -> NargylResult<UseOutcome> {
    let Some(target) = closest_hostile(state, config::LIGHTNING_RANGE) else {
        state.message(
            "No enemies are close enough to hit with lightning!",
            Color::RED,
        );
        return Ok(UseOutcome::Cancelled);
    };

    let damage = scaled(state, config::LIGHTNING_DAMAGE)?;
    let name = state.name_of(target);
    state.message(
        format!("The {} jolts as electricity courses through it!", name),
        Color::DARK_VIOLET,
    );
    state.take_damage(target, damage)?;
    Ok(UseOutcome::Used)
}

pub fn cast_lifesteal(state: &mut GameState) -> NargylResult<UseOutcome> {
    let Some(target) = closest_hostile(state, config::LIFESTEAL_RANGE) else {
        state.message("No enemy is close enough to steal life from!", Color::RED);
        return Ok(UseOutcome::Cancelled);
    };

    let amount = scaled(state, config::LIFESTEAL_DAMAGE)?;
    let name = state.name_of(target);
    state.message(
        format!("The {} begins to quiver as its lifeforce is drained!", name),
        Color::DARK_CRIMSON,
    );
    state.take_damage(target, amount)?;
    state.heal(state.player_id, amount);
    Ok(UseOutcome::Used)
}

/// Launches a fireball from `origin` toward the tile `target`.
///
/// The projectile aims at where the target stood when cast and moves on the
/// next AI pass.
pub fn cast_fireball(state: &mut GameState, origin: Position, target: Position) -> EntityId {
    debug!(
        "Fireball launched from ({}, {}) at ({}, {})",
        origin.x, origin.y, target.x, target.y
    );
    state.add_entity(Entity::fireball(origin, target))
}

/// Applies an item's use effect.
pub fn apply_effect(state: &mut GameState, effect: UseEffect) -> NargylResult<UseOutcome> {
    match effect {
        UseEffect::Heal => cast_heal(state),
        UseEffect::Confuse => cast_confuse(state),
        UseEffect::Lightning => cast_lightning(state),
        UseEffect::LifeSteal => cast_lifesteal(state),
    }
}
