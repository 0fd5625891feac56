//! # Dungeon Generation
//!
//! Room-and-corridor layouts for standard levels and a single open arena for
//! boss levels.
//!
//! Standard levels are built by:
//! 1. Trying a level-scaled number of random rooms, rejecting any that touch
//!    an accepted room
//! 2. Joining each new room to the previous one with an L-shaped corridor
//! 3. Populating every room but the first from the spawn tables
//! 4. Putting the stairs in the centre of the last room

use super::utils::random_choice;
use super::{
    bow_of_healing, item_table, max_items_per_room, max_monsters_per_room, monster_table,
    spawn_boss, spawn_item, GeneratedLevel, GenerationConfig, Generator, LevelRequest, Room,
};
use crate::{
    position_blocked, reachable_from, Entity, EntityId, NargylError, NargylResult, Position,
    RandomSource, Tile, TileGrid,
};
use log::{debug, info};

/// Level generator used by the game.
///
/// Chooses the boss arena on every `boss_level_interval`-th level and the
/// room-and-corridor layout otherwise.
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    pub config: GenerationConfig,
}

/// A level under construction.
struct LevelBuilder {
    map: TileGrid,
    entities: Vec<Entity>,
    rooms: Vec<Room>,
}

impl LevelBuilder {
    fn new(config: &GenerationConfig) -> Self {
        Self {
            map: TileGrid::new(config.map_width, config.map_height),
            entities: Vec::new(),
            rooms: Vec::new(),
        }
    }

    fn is_blocked(&self, pos: Position) -> bool {
        position_blocked(&self.map, &self.entities, pos)
    }

    fn carve_room(&mut self, room: &Room) {
        for pos in room.interior_positions() {
            self.map.carve(pos);
        }
    }

    fn carve_h_tunnel(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.map.carve(Position::new(x, y));
        }
    }

    fn carve_v_tunnel(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.map.carve(Position::new(x, y));
        }
    }

    /// Places an entity under everything already on the level.
    fn push_back(&mut self, entity: Entity) {
        self.entities.insert(0, entity);
    }

    fn finish(self, stairs_id: Option<EntityId>) -> GeneratedLevel {
        GeneratedLevel {
            map: self.map,
            entities: self.entities,
            stairs_id,
            rooms: self.rooms,
        }
    }
}

impl DungeonGenerator {
    /// Creates a generator for the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use nargyl::{DungeonGenerator, GenerationConfig, Generator};
    ///
    /// let generator = DungeonGenerator::new(GenerationConfig::new(1));
    /// assert_eq!(generator.generator_type(), "DungeonGenerator");
    /// ```
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    fn generate_standard(
        &self,
        request: &LevelRequest,
        rng: &mut dyn RandomSource,
    ) -> NargylResult<GeneratedLevel> {
        let config = &self.config;
        let mut level = LevelBuilder::new(config);
        let width = config.map_width as i32;
        let height = config.map_height as i32;

        for _ in 0..config.room_attempts(request.dungeon_level) {
            let w = rng.random_int(config.room_min_size, config.room_max_size);
            let h = rng.random_int(config.room_min_size, config.room_max_size);
            let x = rng.random_int(0, width - w - 1);
            let y = rng.random_int(0, height - h - 1);
            let room = Room::new(x, y, w, h);

            if level.rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }
            level.carve_room(&room);
            let center = room.center();

            match level.rooms.last().map(Room::center) {
                None => {
                    let mut player = request.player.clone();
                    player.position = center;
                    level.entities.push(Entity::start_marker(center));
                    level.entities.push(player);
                }
                Some(prev) => {
                    if rng.random_int(0, 1) == 1 {
                        level.carve_h_tunnel(prev.x, center.x, prev.y);
                        level.carve_v_tunnel(prev.y, center.y, center.x);
                    } else {
                        level.carve_v_tunnel(prev.y, center.y, prev.x);
                        level.carve_h_tunnel(prev.x, center.x, center.y);
                    }
                    self.populate(&mut level, &room, request, rng)?;
                }
            }
            debug!("Placed room {:?}", room);
            level.rooms.push(room);
        }

        let last = level.rooms.last().copied().ok_or_else(|| {
            NargylError::GenerationFailed("No room could be placed".to_string())
        })?;
        let stairs = Entity::stairs(last.center());
        let stairs_id = stairs.id;
        level.push_back(stairs);

        Ok(level.finish(Some(stairs_id)))
    }

    /// Fills a room with monsters and items from the level-scaled tables.
    ///
    /// A draw that lands on a blocked tile places nothing.
    fn populate(
        &self,
        level: &mut LevelBuilder,
        room: &Room,
        request: &LevelRequest,
        rng: &mut dyn RandomSource,
    ) -> NargylResult<()> {
        let dungeon_level = request.dungeon_level;

        let monsters = rng.random_int(0, max_monsters_per_room(dungeon_level) as i32);
        let table = monster_table(dungeon_level);
        for _ in 0..monsters {
            let x = rng.random_int(room.x1 + 3, room.x2 - 3);
            let y = rng.random_int(room.y1 + 3, room.y2 - 3);
            let pos = Position::new(x, y);
            if level.is_blocked(pos) {
                continue;
            }
            if let Some(kind) = random_choice(&table, rng) {
                level.entities.push(kind.spawn(pos, request.player.level));
            }
        }

        let items = rng.random_int(0, max_items_per_room(dungeon_level) as i32);
        let table = item_table(dungeon_level);
        for _ in 0..items {
            let x = rng.random_int(room.x1 + 1, room.x2 - 1);
            let y = rng.random_int(room.y1 + 1, room.y2 - 1);
            let pos = Position::new(x, y);
            if level.is_blocked(pos) {
                continue;
            }
            if let Some(kind) = random_choice(&table, rng) {
                let item = spawn_item(kind, pos, rng, self.config.max_rerolls)?;
                level.push_back(item);
            }
        }
        Ok(())
    }

    fn generate_boss(
        &self,
        request: &LevelRequest,
        rng: &mut dyn RandomSource,
    ) -> NargylResult<GeneratedLevel> {
        let config = &self.config;
        let mut level = LevelBuilder::new(config);

        let w = rng.random_int(config.boss_room_min_width, config.boss_room_max_width);
        let h = rng.random_int(config.boss_room_min_height, config.boss_room_max_height);
        let anchor = config.boss_room_anchor;
        let room = Room::new(anchor.x, anchor.y, w, h);
        if !level.map.is_valid_position(Position::new(room.x2, room.y2)) {
            return Err(NargylError::GenerationFailed(format!(
                "Boss arena {:?} does not fit the map",
                room
            )));
        }
        level.carve_room(&room);

        let center = room.center();
        let mut player = request.player.clone();
        player.position = center;
        level.push_back(bow_of_healing(Position::new(center.x + 1, center.y)));
        level.entities.push(player);

        let boss_position = self.place_boss(&level, &room, rng)?;
        level
            .entities
            .push(spawn_boss(boss_position, request.player.level));

        for _ in 0..config.pillar_count {
            let x = self.reroll_axis(rng, room.x1 + 1, room.x2 - 1, [center.x, boss_position.x])?;
            let y = self.reroll_axis(rng, room.y1 + 1, room.y2 - 1, [center.y, boss_position.y])?;
            level.map.set_tile(Position::new(x, y), Tile::pillar())?;
        }

        level.rooms.push(room);
        Ok(level.finish(None))
    }

    /// Draws boss coordinates at least 3 tiles inside the arena until one is free.
    fn place_boss(
        &self,
        level: &LevelBuilder,
        room: &Room,
        rng: &mut dyn RandomSource,
    ) -> NargylResult<Position> {
        for _ in 0..=self.config.max_rerolls {
            let x = rng.random_int(room.x1 + 3, room.x2 - 3);
            let y = rng.random_int(room.y1 + 3, room.y2 - 3);
            let pos = Position::new(x, y);
            if !level.is_blocked(pos) {
                return Ok(pos);
            }
        }
        Err(NargylError::GenerationFailed(
            "No free tile for the boss".to_string(),
        ))
    }

    /// Draws a coordinate in `min..=max` that avoids every value in `avoid`.
    fn reroll_axis(
        &self,
        rng: &mut dyn RandomSource,
        min: i32,
        max: i32,
        avoid: [i32; 2],
    ) -> NargylResult<i32> {
        for _ in 0..=self.config.max_rerolls {
            let value = rng.random_int(min, max);
            if !avoid.contains(&value) {
                return Ok(value);
            }
        }
        Err(NargylError::GenerationFailed(format!(
            "No pillar coordinate in {}..={} avoids {:?}",
            min, max, avoid
        )))
    }
}

impl Generator<GeneratedLevel> for DungeonGenerator {
    fn generate(
        &self,
        request: &LevelRequest,
        rng: &mut dyn RandomSource,
    ) -> NargylResult<GeneratedLevel> {
        let level = if self.config.is_boss_level(request.dungeon_level) {
            self.generate_boss(request, rng)?
        } else {
            self.generate_standard(request, rng)?
        };
        self.validate(&level, request)?;

        info!(
            "Generated dungeon level {} ({} rooms, {} entities)",
            request.dungeon_level,
            level.rooms.len(),
            level.entities.len()
        );
        Ok(level)
    }

    fn validate(&self, level: &GeneratedLevel, request: &LevelRequest) -> NargylResult<()> {
        let player = level.entity(request.player.id).ok_or_else(|| {
            NargylError::GenerationFailed("Player was not placed".to_string())
        })?;
        if level.map.is_blocked(player.position) {
            return Err(NargylError::GenerationFailed(
                "Player stands on a blocked tile".to_string(),
            ));
        }

        let reachable = reachable_from(&level.map, player.position);
        for room in &level.rooms {
            if !reachable.contains(&room.center()) {
                return Err(NargylError::GenerationFailed(format!(
                    "Room {:?} is not connected to the start",
                    room
                )));
            }
        }
        if let Some(stairs) = level.stairs_id.and_then(|id| level.entity(id)) {
            if !reachable.contains(&stairs.position) {
                return Err(NargylError::GenerationFailed(
                    "Stairs are unreachable".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

impl Default for DungeonGenerator {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}
