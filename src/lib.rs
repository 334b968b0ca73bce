//! # Gloom
//!
//! The game-state and turn-resolution core of a turn-based dungeon crawler.
//!
//! ## Architecture Overview
//!
//! Everything the game knows lives in one [`GameState`] aggregate, and every
//! player input is turned into an [`Action`] that [`Game::apply`] resolves into
//! a full turn. The main pieces are:
//!
//! - **Entity Store**: id-keyed registry of the player, monsters, items, corpses and stairs
//! - **Dungeon Generator**: room-and-corridor carving plus level-scaled population
//! - **Visibility Engine**: precise shadowcasting producing per-tile light fractions
//! - **Turn Engine**: player actions, combat, items, leveling and monster AI
//! - **Save/Load Codec**: a flat JSON blob stored in a single save slot
//!
//! Drawing is left to whoever consumes a [`Frame`]; the core only describes what
//! should be on screen.

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

/// Core error type for the Gloom game core.
///
/// Only conditions that indicate a bug or a broken environment are errors.
/// Expected gameplay failures (nothing to pick up, no target in sight) are
/// reported through the message log instead.
#[derive(thiserror::Error, Debug)]
pub enum GloomError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// An internal consistency rule was broken (slot mismatch, stacked blockers, ...)
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Gloom codebase.
pub type GloomResult<T> = Result<T, GloomError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 80;

    /// Default dungeon height in tiles
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 40;

    /// Radius of the player's field of view
    pub const FOV_RADIUS: i32 = 8;

    /// Number of inventory slots (one per letter a-z)
    pub const INVENTORY_CAPACITY: usize = 26;

    /// Maximum number of messages kept in the log
    pub const MESSAGE_LOG_CAPACITY: usize = 100;

    /// Hit points restored by a healing potion
    pub const HEALING_AMOUNT: i32 = 4;

    /// Damage dealt by a lightning bolt
    pub const LIGHTNING_DAMAGE: i32 = 20;

    /// Maximum distance a lightning bolt can reach
    pub const LIGHTNING_RANGE: f64 = 5.0;

    /// Damage dealt to everything caught in a fireball
    pub const FIREBALL_DAMAGE: i32 = 25;

    /// Blast radius of a fireball
    pub const FIREBALL_RADIUS: i32 = 3;

    /// Number of enemy phases a confusion scroll lasts
    pub const CONFUSION_TURNS: u32 = 10;

    /// Bonus applied by the "hit points" level-up choice
    pub const LEVEL_UP_HP_BONUS: i32 = 20;
}
