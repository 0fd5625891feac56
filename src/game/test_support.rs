//! Fixtures shared by the unit tests of the game modules.

use crate::{
    Ai, Color, DeathHandler, Entity, Equipment, Fighter, GameState, GameStatus, MessageLog,
    Position, Slot, TileGrid,
};
use std::collections::HashSet;

/// A 20x20 state with an open 18x18 room and the player at (5, 5).
/// Every floor tile is visible.
pub(crate) fn open_state() -> GameState {
    let mut map = TileGrid::new(20, 20);
    for pos in map.positions().collect::<Vec<_>>() {
        if pos.x > 0 && pos.y > 0 && pos.x < 19 && pos.y < 19 {
            map.carve(pos);
        }
    }
    let visible: HashSet<Position> = map.positions().collect();
    let player = Entity::player(Position::new(5, 5));
    GameState {
        dungeon_level: 1,
        map,
        player_id: player.id,
        entities: vec![player],
        stairs_id: None,
        inventory: Vec::new(),
        messages: MessageLog::default(),
        status: GameStatus::Playing,
        visible,
    }
}

/// A basic monster with 10 HP, defense 0, power 3 and 20 XP.
pub(crate) fn monster(pos: Position) -> Entity {
    Entity::new(pos, 'X', "Alien Weakling", Color::DESATURATED_GREEN)
        .blocking()
        .with_fighter(Fighter::new(10, 0, 3, 20, DeathHandler::Monster))
        .with_ai(Ai::Basic)
}

/// An unequipped piece of gear lying at the origin.
pub(crate) fn gear(name: &str, equipment: Equipment) -> Entity {
    Entity::new(Position::origin(), 't', name, Color::WHITE).with_equipment(equipment)
}

pub(crate) fn sword() -> Entity {
    gear("Sword", Equipment::new(Slot::RightHand).with_power(2))
}
