//! # Generation Module
//!
//! Procedural content generation for dungeon levels, monsters and items.
//!
//! A level is built in two passes: [`RoomCorridorGenerator`] carves the tile
//! grid and records its rooms, then [`populate_level`] places the player, the
//! stairs and a depth-scaled number of monsters and items in those rooms.
//! Both passes draw exclusively from the shared [`GameRng`], so the same
//! random state always yields the same level.

pub mod dungeon;
pub mod encounters;
pub mod loot;

pub use dungeon::*;
pub use encounters::*;
pub use loot::*;

use crate::game::{EntityId, EntityKind, EntityStore, GameMap, Location, Position, SpawnOverrides};
use crate::utils::GameRng;
use crate::{GloomError, GloomResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls the size of the level and of the rooms carved into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Level width in tiles
    pub width: u32,
    /// Level height in tiles
    pub height: u32,
    /// Minimum room size (floor tiles per side)
    pub min_room_size: u32,
    /// Maximum room size (floor tiles per side)
    pub max_room_size: u32,
    /// Number of room placement attempts per level
    pub max_rooms: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert!(config.min_room_size >= 3);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: crate::config::DEFAULT_DUNGEON_WIDTH,
            height: crate::config::DEFAULT_DUNGEON_HEIGHT,
            min_room_size: 4,
            max_room_size: 10,
            max_rooms: 30,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 40,
            height: 24,
            min_room_size: 3,
            max_room_size: 6,
            max_rooms: 12,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room. Bounds are the inclusive extent of its floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index of this room in generation order
    pub id: u32,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Room {
    /// Creates a room from its top-left floor tile and floor size.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{Position, Room};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.right(), 14);
    /// assert_eq!(room.bottom(), 12);
    /// assert_eq!(room.center(), Position::new(9, 8));
    /// ```
    pub fn new(id: u32, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            left: top_left.x,
            top: top_left.y,
            right: top_left.x + width as i32 - 1,
            bottom: top_left.y + height as i32 - 1,
        }
    }

    /// Leftmost floor column.
    pub fn left(&self) -> i32 {
        self.left
    }

    /// Rightmost floor column.
    pub fn right(&self) -> i32 {
        self.right
    }

    /// Topmost floor row.
    pub fn top(&self) -> i32 {
        self.top
    }

    /// Bottommost floor row.
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Floor width in tiles.
    pub fn width(&self) -> u32 {
        (self.right - self.left + 1) as u32
    }

    /// Floor height in tiles.
    pub fn height(&self) -> u32 {
        (self.bottom - self.top + 1) as u32
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    /// Checks if a position is on this room's floor.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.left && pos.x <= self.right && pos.y >= self.top && pos.y <= self.bottom
    }

    /// Checks if fewer than `margin` tiles separate this room's floor from
    /// another's. A margin of 1 lets neighbours share a single wall.
    pub fn overlaps(&self, other: &Room, margin: i32) -> bool {
        !(self.right + margin < other.left
            || other.right + margin < self.left
            || self.bottom + margin < other.top
            || other.bottom + margin < self.top)
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity((self.width() * self.height()) as usize);
        for y in self.top..=self.bottom {
            for x in self.left..=self.right {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// Picks a uniformly random floor position.
    pub fn random_position(&self, rng: &mut GameRng) -> Position {
        let x = rng.uniform_int(self.left, self.right);
        let y = rng.uniform_int(self.top, self.bottom);
        Position::new(x, y)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for the given dungeon depth.
    fn generate(&self, config: &GenerationConfig, depth: u32, rng: &mut GameRng) -> GloomResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> GloomResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Places the player, the stairs, monsters and items on a freshly generated map.
///
/// The player is created in the first room, or moved there if `player` names
/// an existing entity. The stairs go to the center of the last room. Returns
/// the player's id.
pub fn populate_level(
    store: &mut EntityStore,
    map: &GameMap,
    rng: &mut GameRng,
    player: Option<EntityId>,
) -> GloomResult<EntityId> {
    let first = map
        .rooms
        .first()
        .ok_or_else(|| GloomError::GenerationFailed("Level has no rooms".to_string()))?;
    let last = map
        .rooms
        .last()
        .ok_or_else(|| GloomError::GenerationFailed("Level has no rooms".to_string()))?;

    let start = Location::Map(first.center());
    let player_id = match player {
        Some(id) => {
            store.move_to(id, start)?;
            id
        }
        None => store.create(EntityKind::Player, start, SpawnOverrides::default())?,
    };

    store.create(
        EntityKind::Stairs,
        Location::Map(last.center()),
        SpawnOverrides::default(),
    )?;

    let mut monsters = 0;
    let mut items = 0;
    for room in &map.rooms {
        monsters += place_monsters(store, room, map.depth, rng)?;
        items += place_items(store, room, map.depth, rng)?;
    }

    debug!(
        "Populated depth {} with {} monsters and {} items across {} rooms",
        map.depth,
        monsters,
        items,
        map.rooms.len()
    );

    Ok(player_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert!(config.min_room_size >= 3);
        assert!(config.max_room_size >= config.min_room_size);
        assert!(config.max_rooms > 0);
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(1, Position::new(5, 5), 10, 8);

        assert_eq!(room.left(), 5);
        assert_eq!(room.top(), 5);
        assert_eq!(room.right(), 14);
        assert_eq!(room.bottom(), 12);
        assert_eq!(room.width(), 10);
        assert_eq!(room.height(), 8);
        assert_eq!(room.center(), Position::new(9, 8));

        assert!(room.contains(Position::new(7, 7)));
        assert!(room.contains(Position::new(5, 5)));
        assert!(room.contains(Position::new(14, 12)));
        assert!(!room.contains(Position::new(4, 5)));
        assert!(!room.contains(Position::new(15, 12)));
        assert_eq!(room.floor_positions().len(), 80);
    }

    #[test]
    fn test_room_overlap() {
        let room1 = Room::new(1, Position::new(5, 5), 10, 8);
        let room2 = Room::new(2, Position::new(10, 8), 6, 6);
        let room3 = Room::new(3, Position::new(20, 20), 5, 5);
        // Separated by a single shared wall column (x = 15).
        let room4 = Room::new(4, Position::new(16, 5), 3, 3);
        // Floor directly against room1's floor, with no wall between.
        let room5 = Room::new(5, Position::new(15, 5), 3, 3);

        assert!(room1.overlaps(&room2, 0));
        assert!(room2.overlaps(&room1, 0));
        assert!(!room1.overlaps(&room3, 1));

        // A margin of 1 lets two rooms share one wall column.
        assert!(!room1.overlaps(&room4, 0));
        assert!(!room1.overlaps(&room4, 1));
        assert!(!room4.overlaps(&room1, 1));
        assert!(room1.overlaps(&room4, 2));

        // Adjacent floors would merge the rooms, so margin 1 rejects them.
        assert!(!room1.overlaps(&room5, 0));
        assert!(room1.overlaps(&room5, 1));
    }

    #[test]
    fn test_random_position_stays_inside() {
        let room = Room::new(0, Position::new(2, 3), 4, 2);
        let mut rng = GameRng::new(8);
        for _ in 0..200 {
            assert!(room.contains(room.random_position(&mut rng)));
        }
    }

    #[test]
    fn test_populate_places_player_and_stairs() {
        let config = GenerationConfig::for_testing(77);
        let mut rng = GameRng::new(config.seed);
        let map = RoomCorridorGenerator::new()
            .generate(&config, 1, &mut rng)
            .unwrap();

        let mut store = EntityStore::new();
        let player = populate_level(&mut store, &map, &mut rng, None).unwrap();

        let first = map.rooms.first().unwrap();
        let last = map.rooms.last().unwrap();
        assert_eq!(store.get(player).unwrap().position(), Some(first.center()));
        assert!(store
            .all_at(last.center())
            .iter()
            .any(|e| e.kind == EntityKind::Stairs));
    }

    #[test]
    fn test_populate_relocates_existing_player() {
        let config = GenerationConfig::for_testing(78);
        let mut rng = GameRng::new(config.seed);
        let map = RoomCorridorGenerator::new()
            .generate(&config, 2, &mut rng)
            .unwrap();

        let mut store = EntityStore::new();
        let existing = store
            .create(
                EntityKind::Player,
                Location::Map(Position::new(0, 0)),
                SpawnOverrides::default(),
            )
            .unwrap();

        let player = populate_level(&mut store, &map, &mut rng, Some(existing)).unwrap();
        assert_eq!(player, existing);
        assert_eq!(
            store
                .iter()
                .filter(|e| e.kind == EntityKind::Player)
                .count(),
            1
        );
        assert_eq!(
            store.get(player).unwrap().position(),
            Some(map.rooms[0].center())
        );
    }

    #[test]
    fn test_population_never_stacks_blockers() {
        for seed in 0..20 {
            let config = GenerationConfig::for_testing(seed);
            let mut rng = GameRng::new(seed);
            let map = RoomCorridorGenerator::new()
                .generate(&config, 7, &mut rng)
                .unwrap();
            let mut store = EntityStore::new();
            populate_level(&mut store, &map, &mut rng, None).unwrap();

            for (pos, _) in map.tiles() {
                assert!(store.blocking_at(pos).is_ok(), "stacked blockers at {pos}");
            }
        }
    }
}
