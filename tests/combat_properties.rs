//! Integration tests for combat, progression and equipment.

use nargyl::{
    effective_power, xp_to_next_level, Ai, AttackOutcome, Color, DeathHandler, Entity, Equipment,
    Fighter, GameState, GameStatus, MessageLog, Position, Slot, TileGrid,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn arena() -> GameState {
    let mut map = TileGrid::new(12, 12);
    let positions: Vec<Position> = map.positions().collect();
    for pos in &positions {
        if pos.x > 0 && pos.y > 0 && pos.x < 11 && pos.y < 11 {
            map.carve(*pos);
        }
    }
    let player = Entity::player(Position::new(3, 3));
    GameState {
        dungeon_level: 1,
        map,
        player_id: player.id,
        entities: vec![player],
        stairs_id: None,
        inventory: Vec::new(),
        messages: MessageLog::default(),
        status: GameStatus::Playing,
        visible: positions.into_iter().collect::<HashSet<_>>(),
    }
}

fn brute(pos: Position, hp: i32, defense: i32, power: i32) -> Entity {
    Entity::new(pos, 'X', "Alien Invader", Color::DARKEST_GREEN)
        .blocking()
        .with_fighter(Fighter::new(hp, defense, power, 50, DeathHandler::Monster))
        .with_ai(Ai::Basic)
}

fn gear(name: &str, equipment: Equipment) -> Entity {
    Entity::new(Position::origin(), 't', name, Color::WHITE).with_equipment(equipment)
}

#[test]
fn attack_formula() {
    let mut state = arena();
    let strong = state.add_entity(brute(Position::new(4, 3), 50, 0, 10));
    let target = state.add_entity(brute(Position::new(5, 3), 50, 4, 3));

    assert_eq!(
        state.attack(strong, target).unwrap(),
        AttackOutcome::Hit { damage: 6 }
    );
    assert_eq!(state.hp(target), 44);

    state.entity_mut(strong).unwrap().fighter.as_mut().unwrap().base_defense = 5;
    assert_eq!(state.attack(target, strong).unwrap(), AttackOutcome::NoEffect);
    assert_eq!(state.hp(strong), 50);
    assert!(state.messages.contains("but it has no effect!"));
}

#[test]
fn overkill_kills_exactly_once() {
    let mut state = arena();
    let id = state.add_entity(brute(Position::new(4, 3), 5, 0, 1));
    state.take_damage(id, 8).unwrap();
    // The corpse has no fighter left to damage
    assert!(state.take_damage(id, 8).is_err());

    let remains = state.entity(id).unwrap();
    assert_eq!(remains.name, "remains of Alien Invader");
    assert!(remains.fighter.is_none());
    assert!(!remains.blocks);
    assert_eq!(state.entities[0].id, id);

    let player = state.player().unwrap();
    assert_eq!(player.fighter.as_ref().unwrap().xp, 50);
}

#[test]
fn life_steal_only_heals_on_player_hits() {
    let mut state = arena();
    state.inventory.push(gear(
        "Bow of Healing",
        Equipment::new(Slot::RightHand).with_life_steal(6),
    ));
    state.equip(0).unwrap();
    state.player_mut().unwrap().fighter.as_mut().unwrap().hp = 50;
    let monster = state.add_entity(brute(Position::new(4, 3), 100, 0, 7));

    state.attack(state.player_id, monster).unwrap();
    assert_eq!(state.hp(state.player_id), 56);

    state.attack(monster, state.player_id).unwrap();
    assert_eq!(state.hp(state.player_id), 51);
}

#[test]
fn level_up_keeps_excess_experience() {
    let mut state = arena();
    let threshold = xp_to_next_level(1);
    {
        let fighter = state.player_mut().unwrap().fighter.as_mut().unwrap();
        fighter.xp = threshold + 15;
        fighter.hp = 30;
    }
    assert!(state.level_up().unwrap());
    let player = state.player().unwrap();
    assert_eq!(player.level, 2);
    assert_eq!(player.fighter.as_ref().unwrap().xp, 15);
    assert_eq!(player.fighter.as_ref().unwrap().hp, 80);
    assert!(!state.level_up().unwrap());
}

#[test]
fn player_death_is_terminal() {
    let mut state = arena();
    state.take_damage(state.player_id, 150).unwrap();
    assert_eq!(state.status, GameStatus::Dead);
    assert!(state.messages.contains("You died!"));
    assert_eq!(state.player().unwrap().glyph, 'x');
}

fn slot_strategy() -> impl Strategy<Value = Slot> {
    prop_oneof![Just(Slot::RightHand), Just(Slot::LeftHand), Just(Slot::Body)]
}

proptest! {
    #[test]
    fn at_most_one_item_equipped_per_slot(
        slots in prop::collection::vec((slot_strategy(), 0i32..5), 1..8),
        toggles in prop::collection::vec(0usize..8, 0..20),
    ) {
        let mut state = arena();
        for (i, (slot, power)) in slots.iter().enumerate() {
            let item = gear(&format!("Gear {}", i), Equipment::new(*slot).with_power(*power));
            state.inventory.push(item);
        }
        for index in toggles {
            if index < state.inventory.len() {
                state.toggle_equip(index).unwrap();
            }
        }

        for slot in Slot::all() {
            let worn = state
                .inventory
                .iter()
                .filter_map(|e| e.equipment.as_ref())
                .filter(|g| g.slot == slot && g.is_equipped)
                .count();
            prop_assert!(worn <= 1);
        }

        let player = state.player().unwrap();
        let worn_gear = state
            .inventory
            .iter()
            .filter_map(|e| e.equipment.as_ref())
            .filter(|g| g.is_equipped);
        let expected = effective_power(player.fighter.as_ref().unwrap(), worn_gear);
        prop_assert_eq!(state.power(state.player_id), expected);

        for item in &state.inventory {
            prop_assert_eq!(item.name.ends_with(" *"), item.is_equipped());
        }
    }
}
