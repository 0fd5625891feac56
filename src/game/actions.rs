//! # Actions Module
//!
//! Player intents and their resolution against the game state.

use crate::{
    closest_hostile, config, line_of_sight, Color, Direction, FieldOfView, GameState, GameStatus,
    GeneratedLevel, Generator, NargylResult, RandomSource,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Something the player can do on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Step in a direction, attacking whatever hostile stands there
    Move(Direction),
    /// Shoot the nearest visible hostile with an equipped ranged weapon
    RangedAttack,
    /// Take the stairs under the player
    Descend,
    /// Pick up every item on the player's tile
    PickUp,
    UseItem(usize),
    DropItem(usize),
}

/// Whether the AI gets to act after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    TookTurn,
    DidntTakeTurn,
    Exit,
}

impl GameState {
    /// Resolves one player action.
    ///
    /// Rejected actions leave a notice in the message log and cost no turn.
    pub fn resolve_action(
        &mut self,
        action: PlayerAction,
        generator: &dyn Generator<GeneratedLevel>,
        rng: &mut dyn RandomSource,
        fov: &dyn FieldOfView,
    ) -> NargylResult<ActionOutcome> {
        if self.status != GameStatus::Playing {
            return Ok(ActionOutcome::DidntTakeTurn);
        }
        debug!("Player action: {:?}", action);

        match action {
            PlayerAction::Move(direction) => self.move_or_attack(direction),
            PlayerAction::RangedAttack => self.ranged_attack(),
            PlayerAction::Descend => {
                let on_stairs = match self.stairs_id.and_then(|id| self.entity(id)) {
                    Some(stairs) => stairs.position == self.player_position()?,
                    None => false,
                };
                if !on_stairs {
                    self.message("There are no stairs here.", Color::WHITE);
                    return Ok(ActionOutcome::DidntTakeTurn);
                }
                self.next_level(generator, rng, fov)?;
                Ok(ActionOutcome::TookTurn)
            }
            PlayerAction::PickUp => self.pick_up_here(),
            PlayerAction::UseItem(index) => {
                self.use_item(index)?;
                Ok(ActionOutcome::DidntTakeTurn)
            }
            PlayerAction::DropItem(index) => {
                self.drop_item(index)?;
                Ok(ActionOutcome::DidntTakeTurn)
            }
        }
    }

    fn move_or_attack(&mut self, direction: Direction) -> NargylResult<ActionOutcome> {
        let destination = self.player_position()? + direction.to_delta();
        let target = self
            .entities_at(destination)
            .find(|entity| entity.is_hostile())
            .map(|entity| entity.id);

        match target {
            Some(target) => {
                self.attack(self.player_id, target)?;
            }
            None => {
                self.move_by(self.player_id, direction.to_delta());
            }
        }
        Ok(ActionOutcome::TookTurn)
    }

    fn ranged_attack(&mut self) -> NargylResult<ActionOutcome> {
        if !self.has_ranged_weapon() {
            self.message("You do not have a ranged weapon equipped!", Color::RED);
            return Ok(ActionOutcome::DidntTakeTurn);
        }
        let Some(target) = closest_hostile(self, config::RANGED_ATTACK_RANGE) else {
            self.message("No monster is close enough to attack!", Color::RED);
            return Ok(ActionOutcome::DidntTakeTurn);
        };

        let origin = self.player_position()?;
        let (target_position, target_name) = match self.entity(target) {
            Some(entity) => (entity.position, entity.name.clone()),
            None => return Ok(ActionOutcome::DidntTakeTurn),
        };
        if !line_of_sight(&self.map, origin, target_position) {
            self.message(
                format!("{} is not in your line of sight!", target_name),
                Color::RED,
            );
            return Ok(ActionOutcome::DidntTakeTurn);
        }

        self.attack(self.player_id, target)?;
        Ok(ActionOutcome::TookTurn)
    }

    fn pick_up_here(&mut self) -> NargylResult<ActionOutcome> {
        let position = self.player_position()?;
        let items: Vec<_> = self
            .entities_at(position)
            .filter(|entity| entity.item.is_some() && !self.is_player(entity.id))
            .map(|entity| entity.id)
            .collect();

        if items.is_empty() {
            self.message("There is nothing here to pick up.", Color::WHITE);
            return Ok(ActionOutcome::DidntTakeTurn);
        }

        let mut picked_any = false;
        for id in items {
            picked_any |= self.pick_up(id)?;
        }
        Ok(if picked_any {
            ActionOutcome::TookTurn
        } else {
            ActionOutcome::DidntTakeTurn
        })
    }
}
