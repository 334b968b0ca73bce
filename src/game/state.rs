//! # Game State Module
//!
//! Central game state management and coordination between all game systems.
//!
//! [`GameState`] is the single aggregate every operation receives: the entity
//! store, the current map, the player's id and light map, the message log,
//! the shared random source and the UI mode. It is created by a new game,
//! replaced wholesale by a load and rebuilt in part by a descent.

use crate::config::FOV_RADIUS;
use crate::game::{
    effective_max_hp, Entity, EntityId, EntityKind, EntityStore, GameMap, Location, MessageKind,
    MessageLog, PendingEffect, Position, SpawnOverrides,
};
use crate::generation::{populate_level, GenerationConfig, Generator, RoomCorridorGenerator};
use crate::input::InventoryPurpose;
use crate::utils::{GameRng, LightMap};
use crate::{GloomError, GloomResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Which overlay, if any, currently owns input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiMode {
    /// Playing on the map
    Normal,
    /// Choosing an inventory item
    Inventory(InventoryPurpose),
    /// An effect is waiting for a tile to be picked
    Targeting(PendingEffect),
    /// Character sheet
    Character,
    /// Level-up choice; must be answered before play continues
    Upgrade,
    /// The player is dead; only loading a game gets out of here
    Dead,
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Number of monsters the player killed
    pub enemies_defeated: u32,
    /// Number of items picked up
    pub items_collected: u32,
    /// Total damage dealt by the player
    pub damage_dealt: u64,
    /// Total damage taken by the player
    pub damage_taken: u64,
    /// Total steps taken
    pub steps_taken: u64,
    /// Deepest level reached
    pub max_depth_reached: u32,
}

/// Central game state containing all game data.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Every entity in the game
    pub store: EntityStore,
    /// The current level
    pub map: GameMap,
    /// The player entity
    pub player_id: EntityId,
    /// Player-facing message history
    pub messages: MessageLog,
    /// Shared random source for generation and monster behaviour
    pub rng: GameRng,
    /// What the player currently sees
    pub light_map: LightMap,
    /// Current UI mode
    pub mode: UiMode,
    /// Level-ups waiting for a stat choice
    pub pending_upgrades: u32,
    /// Draw the whole map regardless of exploration
    pub debug_reveal: bool,
    /// Transient overlay text, cleared by the next action
    pub notice: Option<String>,
    /// Level generation settings
    pub config: GenerationConfig,
    /// Number of completed turns
    pub turn_number: u64,
    /// Progress counters
    pub statistics: GameStatistics,
}

impl GameState {
    /// Starts a new game with default generation settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{GameState, UiMode};
    ///
    /// let state = GameState::new_game(12345).unwrap();
    /// assert_eq!(state.turn_number, 0);
    /// assert_eq!(state.map.depth, 1);
    /// assert_eq!(state.mode, UiMode::Normal);
    /// ```
    pub fn new_game(seed: u64) -> GloomResult<Self> {
        Self::new_game_with_config(GenerationConfig::new(seed))
    }

    /// Starts a new game: generates level 1, creates the player in its first
    /// room and populates it.
    pub fn new_game_with_config(config: GenerationConfig) -> GloomResult<Self> {
        let mut rng = GameRng::new(config.seed);
        let map = RoomCorridorGenerator::new().generate(&config, 1, &mut rng)?;
        let mut store = EntityStore::new();
        let player_id = populate_level(&mut store, &map, &mut rng, None)?;

        let mut state = Self::assemble(store, map, player_id, rng, config);
        state.log(
            "Hello and welcome, adventurer, to yet another dungeon!",
            MessageKind::Welcome,
        );
        state.refresh_fov()?;

        info!("Started new game with seed {}", state.config.seed);
        Ok(state)
    }

    /// Builds a game on a hand-made map with only the player on it.
    ///
    /// Useful for scripted scenarios; later descents generate levels with
    /// [`GenerationConfig::for_testing`].
    pub fn with_map(map: GameMap, player_pos: Position, seed: u64) -> GloomResult<Self> {
        let mut store = EntityStore::new();
        let player_id = store.create(
            EntityKind::Player,
            Location::Map(player_pos),
            SpawnOverrides::default(),
        )?;

        let mut state = Self::assemble(
            store,
            map,
            player_id,
            GameRng::new(seed),
            GenerationConfig::for_testing(seed),
        );
        state.refresh_fov()?;
        Ok(state)
    }

    pub(crate) fn assemble(
        store: EntityStore,
        map: GameMap,
        player_id: EntityId,
        rng: GameRng,
        config: GenerationConfig,
    ) -> Self {
        let depth = map.depth;
        Self {
            store,
            map,
            player_id,
            messages: MessageLog::new(),
            rng,
            light_map: LightMap::new(),
            mode: UiMode::Normal,
            pending_upgrades: 0,
            debug_reveal: false,
            notice: None,
            config,
            turn_number: 0,
            statistics: GameStatistics {
                max_depth_reached: depth,
                ..GameStatistics::default()
            },
        }
    }

    /// The player entity.
    pub fn player(&self) -> GloomResult<&Entity> {
        self.store.get(self.player_id)
    }

    /// The player's map position. A player off the map is a broken invariant.
    pub fn player_position(&self) -> GloomResult<Position> {
        self.player()?.position().ok_or_else(|| {
            GloomError::Invariant(format!("Player {} is not on the map", self.player_id))
        })
    }

    /// Whether the player has died.
    pub fn player_dead(&self) -> GloomResult<bool> {
        Ok(self.player()?.dead)
    }

    /// Recomputes the player's light map, marking newly seen tiles explored.
    pub fn refresh_fov(&mut self) -> GloomResult<()> {
        let origin = self.player_position()?;
        self.light_map = self.map.compute_light_map(origin, FOV_RADIUS);
        Ok(())
    }

    /// Whether the player currently sees the tile.
    pub fn is_lit(&self, pos: Position) -> bool {
        self.light_map.is_lit(pos)
    }

    /// Appends a message to the log.
    pub fn log(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.messages.add(text, kind);
    }

    /// Creates an entity of `kind` on the map with default stats.
    pub fn spawn(&mut self, kind: EntityKind, pos: Position) -> GloomResult<EntityId> {
        self.store
            .create(kind, Location::Map(pos), SpawnOverrides::default())
    }

    /// Whether `id` is carried or worn by the player.
    pub fn held_by_player(&self, id: EntityId) -> GloomResult<bool> {
        Ok(self.store.get(id)?.location.owner() == Some(self.player_id))
    }

    /// Moves the player one level down.
    ///
    /// Everything except the player and what the player carries or wears is
    /// discarded. The next level is generated and populated, and the player
    /// recovers half of their effective maximum hit points.
    pub fn descend(&mut self) -> GloomResult<()> {
        let player_id = self.player_id;
        let before = self.store.len();
        self.store
            .retain(|e| e.id == player_id || e.location.owner() == Some(player_id));
        let discarded = before - self.store.len();

        let depth = self.map.depth + 1;
        self.map = RoomCorridorGenerator::new().generate(&self.config, depth, &mut self.rng)?;
        populate_level(&mut self.store, &self.map, &mut self.rng, Some(player_id))?;

        let max_hp = effective_max_hp(&self.store, player_id)?.unwrap_or(0);
        let player = self.store.get_mut(player_id)?;
        if let Some(hp) = player.hp {
            player.hp = Some((hp + max_hp / 2).min(max_hp.max(hp)));
        }

        self.statistics.max_depth_reached = self.statistics.max_depth_reached.max(depth);
        self.log(
            "You take a moment to rest, and recover your strength.",
            MessageKind::Healing,
        );
        self.log(
            format!("After a rare moment of peace, you descend deeper into the heart of the dungeon, to level {}.", depth),
            MessageKind::Info,
        );
        self.refresh_fov()?;

        info!("Descended to depth {} ({} entities discarded)", depth, discarded);
        Ok(())
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store
            && self.map == other.map
            && self.player_id == other.player_id
            && self.messages == other.messages
            && self.rng.state() == other.rng.state()
            && self.mode == other.mode
            && self.turn_number == other.turn_number
            && self.statistics == other.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> GameMap {
        GameMap::from_rows(
            &[
                "##########",
                "#........#",
                "#........#",
                "#........#",
                "##########",
            ],
            1,
        )
    }

    #[test]
    fn test_new_game_places_player_in_first_room() {
        let state = GameState::new_game_with_config(GenerationConfig::for_testing(7)).unwrap();
        let pos = state.player_position().unwrap();
        assert_eq!(pos, state.map.rooms[0].center());
        assert!(state.is_lit(pos));
        assert!(state.map.is_explored(pos));
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages.last().unwrap().kind, MessageKind::Welcome);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = GameState::new_game_with_config(GenerationConfig::for_testing(31)).unwrap();
        let b = GameState::new_game_with_config(GenerationConfig::for_testing(31)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_with_map_lights_the_room() {
        let state = GameState::with_map(arena(), Position::new(2, 2), 1).unwrap();
        assert!(state.is_lit(Position::new(8, 2)));
        assert!(state.is_lit(Position::new(0, 0)));
        assert_eq!(state.player().unwrap().hp, Some(30));
    }

    #[test]
    fn test_descend_keeps_only_player_and_belongings() {
        let mut state = GameState::with_map(arena(), Position::new(2, 2), 5).unwrap();
        let player = state.player_id;
        let potion = state
            .store
            .create(
                EntityKind::HealingPotion,
                Location::Carried { owner: player, slot: 0 },
                SpawnOverrides::default(),
            )
            .unwrap();
        let orc = state.spawn(EntityKind::Orc, Position::new(5, 2)).unwrap();
        let used = state
            .store
            .create(EntityKind::LightningScroll, Location::Nowhere, SpawnOverrides::default())
            .unwrap();

        state.descend().unwrap();

        assert_eq!(state.map.depth, 2);
        assert!(state.store.contains(potion));
        assert!(!state.store.contains(orc));
        assert!(!state.store.contains(used));
        assert_eq!(state.player_position().unwrap(), state.map.rooms[0].center());
        assert_eq!(state.statistics.max_depth_reached, 2);
    }

    #[test]
    fn test_descend_heals_half_of_max_hp() {
        let mut state = GameState::with_map(arena(), Position::new(2, 2), 5).unwrap();
        state.store.get_mut(state.player_id).unwrap().hp = Some(4);
        state.descend().unwrap();
        assert_eq!(state.player().unwrap().hp, Some(19));

        state.store.get_mut(state.player_id).unwrap().hp = Some(25);
        state.descend().unwrap();
        assert_eq!(state.player().unwrap().hp, Some(30));
    }
}
