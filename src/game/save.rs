//! # Save and Load
//!
//! The whole game state as one JSON blob, and the single slot it lives in.
//!
//! Entity traits are never written out: they are looked up from each
//! entity's kind again after loading. The random source is saved with its
//! full internal state, so a loaded game makes exactly the same random
//! decisions the saved one would have.

use crate::game::{
    Entity, EntityId, EntityStore, GameMap, GameState, GameStatistics, MessageLog, UiMode,
};
use crate::generation::GenerationConfig;
use crate::utils::{GameRng, RngState};
use crate::{GloomError, GloomResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Flat, self-contained snapshot of a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    /// Every entity, in id order
    pub entities: Vec<Entity>,
    pub player_id: EntityId,
    pub map: GameMap,
    pub messages: MessageLog,
    /// The entity store's id counter
    pub next_id: u64,
    pub rng: RngState,
    pub turn_number: u64,
    pub config: GenerationConfig,
    pub statistics: GameStatistics,
}

impl SaveGame {
    /// Captures a snapshot of the game state.
    pub fn capture(state: &GameState) -> Self {
        Self {
            entities: state.store.iter().cloned().collect(),
            player_id: state.player_id,
            map: state.map.clone(),
            messages: state.messages.clone(),
            next_id: state.store.next_id(),
            rng: state.rng.state(),
            turn_number: state.turn_number,
            config: state.config.clone(),
            statistics: state.statistics.clone(),
        }
    }

    /// Rebuilds a live game state from the snapshot.
    ///
    /// The light map is recomputed for the restored map and the UI starts in
    /// normal mode, or dead mode if the player was dead.
    pub fn restore(self) -> GloomResult<GameState> {
        let store = EntityStore::from_parts(self.entities, self.next_id)?;
        if !store.contains(self.player_id) {
            return Err(GloomError::Invariant(format!(
                "Saved player {} is missing",
                self.player_id
            )));
        }

        let mut state = GameState::assemble(
            store,
            self.map,
            self.player_id,
            GameRng::from_state(self.rng),
            self.config,
        );
        state.messages = self.messages;
        state.turn_number = self.turn_number;
        state.statistics = self.statistics;
        if state.player_dead()? {
            state.mode = UiMode::Dead;
        }
        state.refresh_fov()?;
        Ok(state)
    }
}

/// Serializes the game state to a JSON blob.
///
/// # Examples
///
/// ```
/// use gloom::{deserialize, serialize, GameState};
///
/// let state = GameState::new_game(3).unwrap();
/// let blob = serialize(&state).unwrap();
/// let restored = deserialize(&blob).unwrap();
/// assert_eq!(restored, state);
/// ```
pub fn serialize(state: &GameState) -> GloomResult<String> {
    let blob = serde_json::to_string(&SaveGame::capture(state))?;
    debug!("Serialized game state ({} bytes)", blob.len());
    Ok(blob)
}

/// Rebuilds a game state from a JSON blob.
pub fn deserialize(blob: &str) -> GloomResult<GameState> {
    let save: SaveGame = serde_json::from_str(blob)?;
    save.restore()
}

/// Storage for the single saved game.
pub trait SaveSlot {
    /// Replaces the stored blob.
    fn store(&mut self, blob: &str) -> GloomResult<()>;

    /// Returns the stored blob, or `None` if nothing was saved yet.
    fn fetch(&self) -> GloomResult<Option<String>>;
}

/// Save slot kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    blob: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveSlot for MemorySlot {
    fn store(&mut self, blob: &str) -> GloomResult<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn fetch(&self) -> GloomResult<Option<String>> {
        Ok(self.blob.clone())
    }
}

/// Save slot backed by a file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Creates a slot stored at `path`. Nothing is touched until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveSlot for FileSlot {
    fn store(&mut self, blob: &str) -> GloomResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, blob)?;
        info!("Saved game to {}", self.path.display());
        Ok(())
    }

    fn fetch(&self) -> GloomResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }
}
