//! # Dungeon Generation
//!
//! Procedural dungeon layout generation using a room-and-corridor algorithm.
//!
//! Rooms are placed at random with overlap rejection, each room is joined to
//! the previous one with an L-shaped corridor, and finally every walkable
//! cell is fenced in with walls. Coordinates never touched stay absent.

use crate::game::{GameMap, Position, Tile};
use crate::generation::{GenerationConfig, Generator, Room};
use crate::utils::GameRng;
use crate::{GloomError, GloomResult};
use log::debug;
use std::collections::{HashSet, VecDeque};

/// Primary dungeon generator using the room-and-corridor algorithm.
///
/// This generator creates dungeons by:
/// 1. Placing rooms randomly with collision detection
/// 2. Connecting consecutive rooms with L-shaped corridors
/// 3. Surrounding every floor tile with walls
#[derive(Debug, Clone)]
pub struct RoomCorridorGenerator {
    /// Minimum number of wall tiles kept between two rooms
    pub room_margin: i32,
}

impl RoomCorridorGenerator {
    /// Creates a new dungeon generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{GameRng, GenerationConfig, Generator, RoomCorridorGenerator};
    ///
    /// let config = GenerationConfig::for_testing(5);
    /// let mut rng = GameRng::new(config.seed);
    /// let map = RoomCorridorGenerator::new().generate(&config, 1, &mut rng).unwrap();
    /// assert!(!map.rooms.is_empty());
    /// assert_eq!(map.depth, 1);
    /// ```
    pub fn new() -> Self {
        Self { room_margin: 1 }
    }

    /// Places rooms, carving each one as soon as it is accepted.
    fn place_rooms(
        &self,
        map: &mut GameMap,
        config: &GenerationConfig,
        rng: &mut GameRng,
    ) -> GloomResult<Vec<Room>> {
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..config.max_rooms {
            let room = self.generate_room_candidate(map, config, rng, rooms.len() as u32);

            if !self.room_fits_in_level(map, &room) {
                continue;
            }
            if rooms
                .iter()
                .any(|existing| room.overlaps(existing, self.room_margin))
            {
                continue;
            }

            self.carve_room(map, &room)?;
            rooms.push(room);
        }

        if rooms.is_empty() {
            return Err(GloomError::GenerationFailed(
                "Failed to place any rooms".to_string(),
            ));
        }

        Ok(rooms)
    }

    /// Rolls a room size and a top-left corner inside the outer wall ring.
    fn generate_room_candidate(
        &self,
        map: &GameMap,
        config: &GenerationConfig,
        rng: &mut GameRng,
        room_id: u32,
    ) -> Room {
        let width = rng.uniform_int(config.min_room_size as i32, config.max_room_size as i32);
        let height = rng.uniform_int(config.min_room_size as i32, config.max_room_size as i32);
        let x = rng.uniform_int(1, map.width as i32 - width - 1);
        let y = rng.uniform_int(1, map.height as i32 - height - 1);

        Room::new(room_id, Position::new(x, y), width as u32, height as u32)
    }

    /// Checks that a room's floor leaves room for a wall on every side.
    fn room_fits_in_level(&self, map: &GameMap, room: &Room) -> bool {
        room.left() >= 1
            && room.top() >= 1
            && room.right() <= map.width as i32 - 2
            && room.bottom() <= map.height as i32 - 2
    }

    /// Carves out a room in the level by setting tiles to floor.
    fn carve_room(&self, map: &mut GameMap, room: &Room) -> GloomResult<()> {
        for pos in room.floor_positions() {
            map.set_tile(pos, Tile::floor())?;
        }
        Ok(())
    }

    /// Joins every room to the one placed before it.
    fn connect_rooms(&self, map: &mut GameMap, rooms: &[Room], rng: &mut GameRng) -> GloomResult<()> {
        for pair in rooms.windows(2) {
            let horizontal_first = rng.chance(0.5);
            self.carve_l_corridor(map, pair[0].center(), pair[1].center(), horizontal_first)?;
        }
        Ok(())
    }

    /// Carves an L-shaped corridor between two points.
    fn carve_l_corridor(
        &self,
        map: &mut GameMap,
        start: Position,
        end: Position,
        horizontal_first: bool,
    ) -> GloomResult<()> {
        let corner = if horizontal_first {
            Position::new(end.x, start.y)
        } else {
            Position::new(start.x, end.y)
        };
        self.carve_line(map, start, corner)?;
        self.carve_line(map, corner, end)
    }

    /// Carves a straight horizontal or vertical run, both ends included.
    fn carve_line(&self, map: &mut GameMap, from: Position, to: Position) -> GloomResult<()> {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                let pos = Position::new(x, y);
                if map.in_bounds(pos) && !map.is_walkable(pos) {
                    map.set_tile(pos, Tile::floor())?;
                }
            }
        }
        Ok(())
    }

    /// Puts a wall on every absent coordinate next to a walkable tile.
    fn add_walls(&self, map: &mut GameMap) -> GloomResult<()> {
        let floors: Vec<Position> = map
            .tiles()
            .filter(|(_, tile)| tile.walkable)
            .map(|(pos, _)| pos)
            .collect();

        for pos in floors {
            for neighbor in pos.adjacent_positions() {
                if map.in_bounds(neighbor) && map.tile(neighbor).is_none() {
                    map.set_tile(neighbor, Tile::wall())?;
                }
            }
        }
        Ok(())
    }

    /// Validates that every room floor is reachable from the first room.
    fn validate_connectivity(&self, map: &GameMap) -> GloomResult<()> {
        let Some(first) = map.rooms.first() else {
            return Ok(());
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(first.center());
        visited.insert(first.center());

        while let Some(pos) = queue.pop_front() {
            for adjacent_pos in pos.adjacent_positions() {
                if map.is_walkable(adjacent_pos) && visited.insert(adjacent_pos) {
                    queue.push_back(adjacent_pos);
                }
            }
        }

        for room in &map.rooms {
            if room.floor_positions().iter().any(|pos| !visited.contains(pos)) {
                return Err(GloomError::GenerationFailed(format!(
                    "Room {} is not connected to other rooms",
                    room.id
                )));
            }
        }
        Ok(())
    }
}

impl Generator<GameMap> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, depth: u32, rng: &mut GameRng) -> GloomResult<GameMap> {
        let mut map = GameMap::new(config.width, config.height, depth);

        let rooms = self.place_rooms(&mut map, config, rng)?;
        self.connect_rooms(&mut map, &rooms, rng)?;
        self.add_walls(&mut map)?;
        map.rooms = rooms;

        self.validate(&map, config)?;
        debug!(
            "{} carved depth {}: {} rooms, {} walkable tiles",
            self.generator_type(),
            depth,
            map.rooms.len(),
            map.walkable_count()
        );
        Ok(map)
    }

    fn validate(&self, map: &GameMap, _config: &GenerationConfig) -> GloomResult<()> {
        if map.rooms.is_empty() {
            return Err(GloomError::GenerationFailed("Level has no rooms".to_string()));
        }
        self.validate_connectivity(map)
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

impl Default for RoomCorridorGenerator {
    fn default() -> Self {
        Self::new()
    }
}
