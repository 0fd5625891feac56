//! # Inventory Module
//!
//! Picking up, dropping, using and equipping items.
//!
//! Equipped gear lives in the player's inventory with its `is_equipped` flag
//! set. Each slot holds at most one equipped item; equipping into an occupied
//! slot first takes the old item off.

use crate::{
    apply_effect, config, Color, EntityId, GameState, NargylError, NargylResult, Slot,
    UseOutcome, EQUIPPED_MARKER,
};
use log::debug;

impl GameState {
    fn inventory_index(&self, index: usize) -> NargylResult<()> {
        if index < self.inventory.len() {
            Ok(())
        } else {
            Err(NargylError::InvalidAction(format!(
                "No inventory item at index {}",
                index
            )))
        }
    }

    /// Moves an item from the map into the inventory.
    ///
    /// Returns whether the item was taken. Gear goes on straight away when
    /// its slot is free.
    pub fn pick_up(&mut self, id: EntityId) -> NargylResult<bool> {
        let index = self.index_of(id).ok_or(NargylError::EntityNotFound(id))?;
        let name = self.entities[index].name.clone();
        let collectable = match self.entities[index].item.as_ref() {
            Some(item) => item.collectable,
            None => {
                return Err(NargylError::InvalidAction(format!(
                    "{} is not an item",
                    name
                )))
            }
        };

        if self.inventory.len() >= config::INVENTORY_CAPACITY {
            self.message(
                format!("Your inventory is full. Can not pick up {}.", name),
                Color::YELLOW,
            );
            return Ok(false);
        }
        if !collectable {
            self.message("That object is not collectable.", Color::RED);
            return Ok(false);
        }

        let entity = self.entities.remove(index);
        let slot = entity.equipment.as_ref().map(|gear| gear.slot);
        self.inventory.push(entity);
        self.message(format!("You picked up a {}!", name), Color::GREEN);

        if let Some(slot) = slot {
            if self.equipped_in_slot(slot).is_none() {
                self.equip(self.inventory.len() - 1)?;
            }
        }
        Ok(true)
    }

    /// Puts an inventory item down at the player's feet, taking it off first.
    pub fn drop_item(&mut self, index: usize) -> NargylResult<()> {
        self.inventory_index(index)?;
        if self.inventory[index].is_equipped() {
            self.dequip(index)?;
        }

        let position = self.player_position()?;
        let mut entity = self.inventory.remove(index);
        entity.position = position;
        let name = entity.name.clone();
        self.entities.push(entity);
        self.message(format!("You dropped a {}.", name), Color::YELLOW);
        Ok(())
    }

    /// Uses an inventory item.
    ///
    /// Gear toggles between worn and carried. Anything else applies its
    /// effect and is consumed unless the effect was cancelled.
    pub fn use_item(&mut self, index: usize) -> NargylResult<UseOutcome> {
        self.inventory_index(index)?;
        let entity = &self.inventory[index];
        if entity.equipment.is_some() {
            self.toggle_equip(index)?;
            return Ok(UseOutcome::Used);
        }

        let effect = entity.item.as_ref().and_then(|item| item.use_effect);
        let Some(effect) = effect else {
            let name = entity.name.clone();
            self.message(format!("The {} cannot be used.", name), Color::WHITE);
            return Ok(UseOutcome::Cancelled);
        };

        let id = entity.id;
        let outcome = apply_effect(self, effect)?;
        if outcome == UseOutcome::Used {
            if let Some(position) = self.inventory.iter().position(|item| item.id == id) {
                self.inventory.remove(position);
            }
        }
        debug!("Used {:?}: {:?}", effect, outcome);
        Ok(outcome)
    }

    pub fn toggle_equip(&mut self, index: usize) -> NargylResult<()> {
        if self.inventory.get(index).map_or(false, |entity| entity.is_equipped()) {
            self.dequip(index)
        } else {
            self.equip(index)
        }
    }

    /// Equips an inventory item, replacing whatever occupies its slot.
    pub fn equip(&mut self, index: usize) -> NargylResult<()> {
        self.inventory_index(index)?;
        let slot = match self.inventory[index].equipment.as_ref() {
            Some(gear) if gear.is_equipped => return Ok(()),
            Some(gear) => gear.slot,
            None => {
                return Err(NargylError::InvalidAction(format!(
                    "{} cannot be equipped",
                    self.inventory[index].name
                )))
            }
        };

        if let Some(current) = self.equipped_in_slot(slot) {
            self.dequip(current)?;
        }

        let entity = &mut self.inventory[index];
        if let Some(gear) = entity.equipment.as_mut() {
            gear.is_equipped = true;
        }
        let name = entity.name.clone();
        entity.name.push_str(EQUIPPED_MARKER);
        self.message(format!("You have equipped {}!", name), Color::LIGHT_GREEN);
        Ok(())
    }

    /// Takes an item off. Does nothing if it is not equipped.
    pub fn dequip(&mut self, index: usize) -> NargylResult<()> {
        self.inventory_index(index)?;
        let entity = &mut self.inventory[index];
        match entity.equipment.as_mut() {
            Some(gear) if gear.is_equipped => gear.is_equipped = false,
            _ => return Ok(()),
        }
        if let Some(stripped) = entity.name.strip_suffix(EQUIPPED_MARKER) {
            entity.name = stripped.to_string();
        }
        let name = entity.name.clone();
        self.message(
            format!("You are no longer using {}!", name),
            Color::LIGHT_YELLOW,
        );
        Ok(())
    }

    /// Inventory index of the item equipped in `slot`, if any.
    pub fn equipped_in_slot(&self, slot: Slot) -> Option<usize> {
        self.inventory.iter().position(|entity| {
            entity
                .equipment
                .as_ref()
                .map_or(false, |gear| gear.slot == slot && gear.is_equipped)
        })
    }

    /// Whether the player wears any ranged weapon.
    pub fn has_ranged_weapon(&self) -> bool {
        self.equipped_gear(self.player_id).any(|gear| gear.is_ranged)
    }
}
