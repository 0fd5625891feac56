//! # Persistence Module
//!
//! The saved form of a game and the single save slot it is written to.
//!
//! On disk, the player and stairs are referenced by their index in the
//! entity list. Loading re-links them and replaces the whole state at once.

use crate::{Entity, GameState, GameStatus, MessageLog, NargylError, NargylResult, TileGrid};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Everything needed to resume a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub dungeon_level: u32,
    pub map: TileGrid,
    pub entities: Vec<Entity>,
    pub player_index: usize,
    pub stairs_index: Option<usize>,
    pub inventory: Vec<Entity>,
    pub messages: MessageLog,
    pub status: GameStatus,
}

impl SaveData {
    /// Snapshots a game state.
    pub fn capture(state: &GameState) -> NargylResult<Self> {
        let player_index = state
            .index_of(state.player_id)
            .ok_or(NargylError::EntityNotFound(state.player_id))?;
        let stairs_index = state.stairs_id.and_then(|id| state.index_of(id));

        Ok(Self {
            version: SAVE_VERSION,
            dungeon_level: state.dungeon_level,
            map: state.map.clone(),
            entities: state.entities.clone(),
            player_index,
            stairs_index,
            inventory: state.inventory.clone(),
            messages: state.messages.clone(),
            status: state.status,
        })
    }

    /// Rebuilds the game state. The field of view starts empty.
    pub fn restore(self) -> NargylResult<GameState> {
        if self.version != SAVE_VERSION {
            return Err(NargylError::InvalidState(format!(
                "Unsupported save version {} (expected {})",
                self.version, SAVE_VERSION
            )));
        }
        let player_id = self
            .entities
            .get(self.player_index)
            .map(|entity| entity.id)
            .ok_or_else(|| {
                NargylError::InvalidState(format!("Player index {} out of range", self.player_index))
            })?;
        let stairs_id = match self.stairs_index {
            Some(index) => Some(self.entities.get(index).map(|entity| entity.id).ok_or_else(
                || NargylError::InvalidState(format!("Stairs index {} out of range", index)),
            )?),
            None => None,
        };

        Ok(GameState {
            dungeon_level: self.dungeon_level,
            map: self.map,
            entities: self.entities,
            player_id,
            stairs_id,
            inventory: self.inventory,
            messages: self.messages,
            status: self.status,
            visible: HashSet::new(),
        })
    }
}

/// A named place a game can be saved to and loaded from.
pub trait SaveSlot {
    fn save(&self, data: &SaveData) -> NargylResult<()>;

    /// Loads the saved game, or `NargylError::NoSavedGame` if there is none.
    fn load(&self) -> NargylResult<SaveData>;

    fn exists(&self) -> bool;
}

/// Save slot backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveSlot for JsonFileSlot {
    fn save(&self, data: &SaveData) -> NargylResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Replace the slot atomically
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(data)?)?;
        fs::rename(&tmp, &self.path)?;
        info!("Saved game to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> NargylResult<SaveData> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("No save file at {}", self.path.display());
                return Err(NargylError::NoSavedGame);
            }
            Err(err) => return Err(err.into()),
        };
        let data = serde_json::from_slice(&bytes)?;
        info!("Loaded game from {}", self.path.display());
        Ok(data)
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl GameState {
    /// Saves the game state to JSON.
    pub fn save_to_json(&self) -> NargylResult<String> {
        Ok(serde_json::to_string_pretty(&SaveData::capture(self)?)?)
    }

    /// Loads game state from JSON.
    pub fn load_from_json(json: &str) -> NargylResult<Self> {
        let data: SaveData = serde_json::from_str(json)?;
        data.restore()
    }
}
