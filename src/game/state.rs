//! # Game State Module
//!
//! The aggregate root of a running game.
//!
//! [`GameState`] owns the tile grid, the live entity list, the player's
//! inventory, the message log and the status flag. Every rule in the engine
//! takes it by reference; nothing lives in globals, so independent games can
//! be built side by side in tests.

use crate::{
    capitalize, config, unit_step, Color, Entity, EntityId, Equipment, FieldOfView, GeneratedLevel,
    Generator, LevelRequest, NargylError, NargylResult, Position, RandomSource, TileGrid,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Whether turns are still being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Dead,
}

/// One line of the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub color: Color,
}

/// Bounded log of the most recent message lines.
///
/// Messages longer than the log width are word-wrapped; every wrapped line
/// is a separate entry. When full, the oldest line is evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredMessageLog")]
pub struct MessageLog {
    lines: VecDeque<Message>,
    capacity: usize,
    width: usize,
}

/// Saved form of a [`MessageLog`], bounds not yet enforced.
#[derive(Deserialize)]
struct StoredMessageLog {
    lines: VecDeque<Message>,
    capacity: usize,
    width: usize,
}

impl From<StoredMessageLog> for MessageLog {
    fn from(stored: StoredMessageLog) -> Self {
        let mut log = MessageLog::new(stored.capacity, stored.width);
        let skip = stored.lines.len().saturating_sub(log.capacity);
        log.lines.extend(stored.lines.into_iter().skip(skip));
        log
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(config::MESSAGE_LOG_HEIGHT, config::MESSAGE_LOG_WIDTH)
    }
}

impl MessageLog {
    pub fn new(capacity: usize, width: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            width: width.max(1),
        }
    }

    pub fn add(&mut self, text: &str, color: Color) {
        for line in wrap(text, self.width) {
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
            }
            self.lines.push_back(Message { text: line, color });
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.lines.back()
    }

    /// Whether any retained line contains `fragment`.
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.iter().any(|message| message.text.contains(fragment))
    }
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let current_len = current.chars().count();
        if current.is_empty() {
            current = word;
        } else if current_len + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// The complete state of a game in progress.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Depth counter; starts at 1 and only ever grows
    pub dungeon_level: u32,
    pub map: TileGrid,
    /// Live entities in draw order (index 0 is drawn first)
    pub entities: Vec<Entity>,
    pub player_id: EntityId,
    /// Absent on a boss level until the boss dies
    pub stairs_id: Option<EntityId>,
    pub inventory: Vec<Entity>,
    pub messages: MessageLog,
    pub status: GameStatus,
    /// Tiles in the player's current field of view. Recomputed, never saved.
    pub visible: HashSet<Position>,
}

impl GameState {
    /// Starts a new game on dungeon level 1.
    pub fn new_game(
        generator: &dyn Generator<GeneratedLevel>,
        rng: &mut dyn RandomSource,
        fov: &dyn FieldOfView,
    ) -> NargylResult<Self> {
        let player = Entity::player(Position::origin());
        let player_id = player.id;
        let request = LevelRequest {
            dungeon_level: 1,
            player,
        };
        let level = generator.generate(&request, rng)?;

        let mut state = Self {
            dungeon_level: 1,
            map: TileGrid::new(level.map.width, level.map.height),
            entities: Vec::new(),
            player_id,
            stairs_id: None,
            inventory: Vec::new(),
            messages: MessageLog::default(),
            status: GameStatus::Playing,
            visible: HashSet::new(),
        };
        state.install_level(level)?;
        state.update_fov(fov)?;
        state.message(
            "Welcome Stranger! Prepare to battle with the Aliens of Nar'Gyl!",
            Color::RED,
        );
        info!("Started a new game with {} entities", state.entities.len());
        Ok(state)
    }

    /// Replaces the map and entity list with a freshly generated level.
    ///
    /// The generated entity list must contain the player.
    pub fn install_level(&mut self, level: GeneratedLevel) -> NargylResult<()> {
        if !level.entities.iter().any(|entity| entity.id == self.player_id) {
            return Err(NargylError::InvalidState(
                "Generated level does not contain the player".to_string(),
            ));
        }
        self.map = level.map;
        self.entities = level.entities;
        self.stairs_id = level.stairs_id;
        self.visible.clear();
        Ok(())
    }

    /// Rests, then descends to the next dungeon level keeping the player,
    /// its inventory and progression.
    ///
    /// The state is left untouched if generation fails.
    pub fn next_level(
        &mut self,
        generator: &dyn Generator<GeneratedLevel>,
        rng: &mut dyn RandomSource,
        fov: &dyn FieldOfView,
    ) -> NargylResult<()> {
        let request = LevelRequest {
            dungeon_level: self.dungeon_level + 1,
            player: self.player()?.clone(),
        };
        let level = generator.generate(&request, rng)?;
        self.install_level(level)?;
        self.dungeon_level = request.dungeon_level;

        self.message(
            "You take a moment to rest and recover your strength.",
            Color::LIGHT_VIOLET,
        );
        let half = self.max_hp(self.player_id) / 2;
        self.heal(self.player_id, half);
        self.message(
            "After a moment of peace, you venture further into the mine..",
            Color::LIGHT_VIOLET,
        );

        self.update_fov(fov)?;
        info!("Descended to dungeon level {}", self.dungeon_level);
        Ok(())
    }

    pub fn player(&self) -> NargylResult<&Entity> {
        self.entity(self.player_id)
            .ok_or(NargylError::EntityNotFound(self.player_id))
    }

    pub fn player_mut(&mut self) -> NargylResult<&mut Entity> {
        let id = self.player_id;
        self.entity_mut(id).ok_or(NargylError::EntityNotFound(id))
    }

    pub fn player_position(&self) -> NargylResult<Position> {
        Ok(self.player()?.position)
    }

    pub fn is_player(&self, id: EntityId) -> bool {
        id == self.player_id
    }

    /// Looks up a live (on-map) entity.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id == id)
    }

    pub fn name_of(&self, id: EntityId) -> String {
        self.entity(id)
            .map(|entity| entity.name.clone())
            .unwrap_or_default()
    }

    /// Entities standing on a tile, in draw order.
    pub fn entities_at(&self, pos: Position) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |entity| entity.position == pos)
    }

    /// Appends an entity to the live list and returns its id.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Moves an entity to the front of the draw order so later entities render over it.
    pub fn send_to_back(&mut self, id: EntityId) {
        if let Some(index) = self.index_of(id) {
            let entity = self.entities.remove(index);
            self.entities.insert(0, entity);
        }
    }

    /// Whether a tile is impassable or holds a blocking entity.
    pub fn is_blocked(&self, pos: Position) -> bool {
        position_blocked(&self.map, &self.entities, pos)
    }

    /// Moves an entity by a delta unless the destination is blocked.
    /// Returns whether the entity moved.
    pub fn move_by(&mut self, id: EntityId, delta: Position) -> bool {
        let destination = match self.entity(id) {
            Some(entity) => entity.position + delta,
            None => return false,
        };
        if self.is_blocked(destination) {
            return false;
        }
        match self.entity_mut(id) {
            Some(entity) => {
                entity.position = destination;
                true
            }
            None => false,
        }
    }

    /// Takes one step toward `target`.
    ///
    /// The step is the rounded unit vector. When the horizontal part of the
    /// step runs into a wall the entity tries a vertical step instead, and
    /// the other way around.
    pub fn move_towards(&mut self, id: EntityId, target: Position) -> bool {
        let position = match self.entity(id) {
            Some(entity) => entity.position,
            None => return false,
        };
        if position == target {
            return false;
        }
        let delta = target - position;
        let step = unit_step(position, target);

        if self.map.is_blocked(Position::new(position.x + step.x, position.y)) {
            delta.y != 0 && self.move_by(id, Position::new(0, delta.y.signum()))
        } else if self.map.is_blocked(Position::new(position.x, position.y + step.y)) {
            delta.x != 0 && self.move_by(id, Position::new(delta.x.signum(), 0))
        } else {
            self.move_by(id, step)
        }
    }

    /// Appends a line to the message log.
    pub fn message(&mut self, text: impl AsRef<str>, color: Color) {
        let text = text.as_ref();
        debug!("log: {}", text);
        self.messages.add(text, color);
    }

    /// Recomputes the player's field of view and marks newly seen tiles explored.
    pub fn update_fov(&mut self, fov: &dyn FieldOfView) -> NargylResult<()> {
        let origin = self.player_position()?;
        self.visible = fov.compute(&self.map, origin, config::TORCH_RADIUS);
        for pos in &self.visible {
            self.map.mark_explored(*pos);
        }
        Ok(())
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.visible.contains(&pos)
    }

    /// Equipped gear counted toward an entity's stats.
    ///
    /// Only the player wears gear; every other entity yields nothing.
    pub fn equipped_gear(&self, id: EntityId) -> impl Iterator<Item = &Equipment> {
        let wears_gear = self.is_player(id);
        self.inventory
            .iter()
            .filter(move |_| wears_gear)
            .filter_map(|entity| entity.equipment.as_ref())
            .filter(|gear| gear.is_equipped)
    }

    /// Names of visible entities on the player's tile, for the status panel.
    pub fn names_under_player(&self) -> String {
        let Ok(origin) = self.player_position() else {
            return String::new();
        };
        let names: Vec<&str> = self
            .entities_at(origin)
            .filter(|entity| !self.is_player(entity.id) && self.is_visible(entity.position))
            .map(|entity| entity.name.as_str())
            .collect();
        capitalize(&names.join(", "))
    }
}

/// Whether `pos` is blocked by the grid or by any blocking entity in `entities`.
pub fn position_blocked(map: &TileGrid, entities: &[Entity], pos: Position) -> bool {
    map.is_blocked(pos)
        || entities
            .iter()
            .any(|entity| entity.blocks && entity.position == pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{monster, open_state};
    use crate::{seeded, RayCastFov};

    struct FailingGenerator;

    impl Generator<GeneratedLevel> for FailingGenerator {
        fn generate(
            &self,
            _request: &LevelRequest,
            _rng: &mut dyn RandomSource,
        ) -> NargylResult<GeneratedLevel> {
            Err(NargylError::GenerationFailed("out of rerolls".to_string()))
        }

        fn validate(&self, _content: &GeneratedLevel, _request: &LevelRequest) -> NargylResult<()> {
            Ok(())
        }

        fn generator_type(&self) -> &'static str {
            "FailingGenerator"
        }
    }

    #[test]
    fn test_message_log_wraps_and_evicts() {
        let mut log = MessageLog::new(3, 10);
        log.add("one two three four five", Color::WHITE);
        assert_eq!(log.len(), 3);
        let lines: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(lines, vec!["one two", "three four", "five"]);

        log.add("six", Color::RED);
        assert_eq!(log.len(), 3);
        assert_eq!(log.iter().next().unwrap().text, "three four");
        assert_eq!(log.last().unwrap().color, Color::RED);
    }

    #[test]
    fn test_loaded_log_is_bounded() {
        let json = r#"{"lines":[
            {"text":"a","color":{"r":0,"g":0,"b":0}},
            {"text":"b","color":{"r":0,"g":0,"b":0}}
        ],"capacity":0,"width":0}"#;
        let mut log: MessageLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().text, "b");

        log.add("c d", Color::WHITE);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().text, "d");
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert!(wrap("   ", 5).is_empty());
    }

    #[test]
    fn test_move_by_respects_walls_and_blockers() {
        let mut state = open_state();
        let player_id = state.player_id;
        assert!(state.move_by(player_id, Position::new(1, 0)));
        assert_eq!(state.player_position().unwrap(), Position::new(6, 5));

        state.add_entity(monster(Position::new(7, 5)));
        assert!(!state.move_by(player_id, Position::new(1, 0)));

        state.player_mut().unwrap().position = Position::new(1, 1);
        assert!(!state.move_by(player_id, Position::new(-1, 0)));
    }

    #[test]
    fn test_move_towards_takes_diagonal() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(10, 10)));
        assert!(state.move_towards(id, Position::new(5, 5)));
        assert_eq!(state.entity(id).unwrap().position, Position::new(9, 9));
    }

    #[test]
    fn test_move_towards_slides_along_wall() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(1, 10)));
        // Target is up and to the left, but x = 0 is wall
        assert!(state.move_towards(id, Position::new(-3, 6)));
        assert_eq!(state.entity(id).unwrap().position, Position::new(1, 9));
    }

    #[test]
    fn test_send_to_back() {
        let mut state = open_state();
        let id = state.add_entity(monster(Position::new(8, 8)));
        assert_eq!(state.index_of(id), Some(1));
        state.send_to_back(id);
        assert_eq!(state.index_of(id), Some(0));
        assert_eq!(state.index_of(state.player_id), Some(1));
    }

    #[test]
    fn test_gear_only_counts_for_player() {
        let mut state = open_state();
        let mut sword = Entity::new(Position::origin(), 't', "Sword", Color::WHITE)
            .with_equipment(Equipment::new(crate::Slot::RightHand).with_power(2));
        if let Some(gear) = sword.equipment.as_mut() {
            gear.is_equipped = true;
        }
        state.inventory.push(sword);
        let monster_id = state.add_entity(monster(Position::new(8, 8)));

        assert_eq!(state.equipped_gear(state.player_id).count(), 1);
        assert_eq!(state.equipped_gear(monster_id).count(), 0);
    }

    #[test]
    fn test_failed_descent_leaves_state_untouched() {
        let mut state = open_state();
        if let Some(fighter) = state.player_mut().unwrap().fighter.as_mut() {
            fighter.hp = 10;
        }
        let before_map = state.map.clone();
        let before_messages = state.messages.clone();

        let result = state.next_level(&FailingGenerator, &mut seeded(1), &RayCastFov::new());

        assert!(matches!(result, Err(NargylError::GenerationFailed(_))));
        assert_eq!(state.dungeon_level, 1);
        assert_eq!(state.player().unwrap().fighter.as_ref().unwrap().hp, 10);
        assert_eq!(state.map, before_map);
        assert_eq!(state.messages, before_messages);
    }
}
