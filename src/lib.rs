//! # Nargyl
//!
//! Simulation engine for the Mines of Nar'Gyl, a turn-based dungeon crawler.
//!
//! ## Architecture Overview
//!
//! The engine owns the rules of the game and nothing else. Drawing, key polling,
//! field-of-view computation, randomness and the save transport are collaborators
//! reached through narrow traits, so the whole simulation can be driven from tests.
//!
//! - **Game State**: one explicit aggregate ([`GameState`]) holding the tile grid,
//!   entity list, inventory, message log and status flag
//! - **Entity Model**: a generic [`Entity`] record with optional capabilities
//!   (fighter, AI, item, equipment)
//! - **Combat & Progression**: attack resolution, death handlers, experience and
//!   leveling, stats derived from equipped gear
//! - **Generation**: room-and-corridor levels with level-scaled spawn tables and a
//!   boss arena every fifth level
//! - **Scheduler**: the synchronous player-turn / AI-pass loop ([`Game`])

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

// Explicit re-exports for commonly used types
pub use game::{
    // From actions
    ActionOutcome,
    PlayerAction,
    // From ai
    Ai,
    // From combat
    AttackOutcome,
    LevelUpChoice,
    // From components
    DeathHandler,
    Equipment,
    Fighter,
    Item,
    Slot,
    UseEffect,
    UseOutcome,
    // From entities
    Entity,
    // From persistence
    JsonFileSlot,
    SaveData,
    SaveSlot,
    // From scheduler
    Game,
    // From state
    GameState,
    GameStatus,
    Message,
    MessageLog,
    // From world
    Tile,
    TileGrid,
};

pub use generation::{DungeonGenerator, GeneratedLevel, GenerationConfig, Generator, LevelRequest, Room};

pub use rendering::{Frontend, MenuPresenter, Renderer, TerminalDisplay};

/// Core error type for the Nargyl engine.
#[derive(thiserror::Error, Debug)]
pub enum NargylError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The save slot holds no game
    #[error("No saved game to load")]
    NoSavedGame,

    /// An entity reference did not resolve
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),
}

/// Result type used throughout the Nargyl codebase.
pub type NargylResult<T> = Result<T, NargylError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Dungeon width in tiles
    pub const MAP_WIDTH: u32 = 80;

    /// Dungeon height in tiles
    pub const MAP_HEIGHT: u32 = 45;

    /// Smallest side of a standard room
    pub const ROOM_MIN_SIZE: i32 = 6;

    /// Largest side of a standard room
    pub const ROOM_MAX_SIZE: i32 = 10;

    /// Room placement attempts on every level, before the per-level increase
    pub const BASE_ROOMS: u32 = 5;

    /// Extra room placement attempts per dungeon level
    pub const ROOMS_PER_LEVEL: u32 = 5;

    /// Every n-th dungeon level is a boss arena
    pub const BOSS_LEVEL_INTERVAL: u32 = 5;

    /// Boss arena width range
    pub const BOSS_ROOM_MIN_WIDTH: i32 = 30;
    pub const BOSS_ROOM_MAX_WIDTH: i32 = 50;

    /// Boss arena height range
    pub const BOSS_ROOM_MIN_HEIGHT: i32 = 10;
    pub const BOSS_ROOM_MAX_HEIGHT: i32 = 30;

    /// Top-left corner of the boss arena
    pub const BOSS_ROOM_ANCHOR: (i32, i32) = (20, 10);

    /// Obstruction tiles scattered across the boss arena
    pub const PILLAR_COUNT: u32 = 16;

    /// Upper bound for every reroll loop in generation
    pub const MAX_REROLLS: u32 = 1000;

    /// Sight radius of the player
    pub const TORCH_RADIUS: i32 = 10;

    /// Experience needed for level `n + 1` is `LEVEL_UP_BASE + n * LEVEL_UP_FACTOR`
    pub const LEVEL_UP_BASE: i32 = 200;
    pub const LEVEL_UP_FACTOR: i32 = 150;

    /// Confusion spell
    pub const CONFUSE_NUM_TURNS: u32 = 5;
    pub const CONFUSE_RANGE: i32 = 8;

    /// Lightning spell
    pub const LIGHTNING_RANGE: i32 = 5;
    pub const LIGHTNING_DAMAGE: i32 = 30;

    /// Vampirism spell
    pub const LIFESTEAL_RANGE: i32 = 8;
    pub const LIFESTEAL_DAMAGE: i32 = 25;

    /// Healing potion base amount
    pub const HEAL_AMOUNT: i32 = 20;

    /// Spell magnitudes grow by this much per character level
    pub const SPELL_LEVEL_SCALING: i32 = 10;

    /// Maximum distance for attacks with a ranged weapon
    pub const RANGED_ATTACK_RANGE: i32 = 10;

    /// Damage dealt by a fireball that reaches the player
    pub const FIREBALL_DAMAGE: i32 = 15;

    /// Inventory capacity (one slot per letter)
    pub const INVENTORY_CAPACITY: usize = 26;

    /// Lines kept in the message log
    pub const MESSAGE_LOG_HEIGHT: usize = 6;

    /// Width at which log messages are wrapped
    pub const MESSAGE_LOG_WIDTH: usize = 68;

    /// Menu widths
    pub const INVENTORY_WIDTH: usize = 50;
    pub const LEVEL_SCREEN_WIDTH: usize = 40;
    pub const CHARACTER_SCREEN_WIDTH: usize = 30;
    pub const MAIN_MENU_WIDTH: usize = 24;
}
