//! # World
//!
//! The dungeon map: a bounded grid of optional tiles, the rooms carved into
//! it, and the level depth.
//!
//! Coordinates without a tile are outside the generated map. Every consumer
//! treats them as solid and unseeable.

use crate::game::Position;
use crate::generation::Room;
use crate::utils::{compute_light_map, LightMap};
use crate::{GloomError, GloomResult};
use serde::{Deserialize, Serialize};

/// One cell of the dungeon grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Whether actors can stand here (and light passes)
    pub walkable: bool,
    /// Whether the tile is drawn as a wall
    pub wall: bool,
    /// Whether the player has ever seen this tile; never reset
    pub explored: bool,
}

impl Tile {
    /// Creates an unexplored floor tile.
    pub fn floor() -> Self {
        Self {
            walkable: true,
            wall: false,
            explored: false,
        }
    }

    /// Creates an unexplored wall tile.
    pub fn wall() -> Self {
        Self {
            walkable: false,
            wall: true,
            explored: false,
        }
    }
}

/// A single dungeon level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    /// Width of the bounding grid
    pub width: u32,
    /// Height of the bounding grid
    pub height: u32,
    /// Dungeon level, starting at 1
    pub depth: u32,
    /// Rooms carved into the level, in generation order
    pub rooms: Vec<Room>,
    tiles: Vec<Option<Tile>>,
}

impl GameMap {
    /// Creates an empty map with no generated tiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{GameMap, Position};
    ///
    /// let map = GameMap::new(10, 10, 1);
    /// assert!(map.tile(Position::new(5, 5)).is_none());
    /// assert!(!map.is_walkable(Position::new(5, 5)));
    /// ```
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
            rooms: Vec::new(),
            tiles: vec![None; (width * height) as usize],
        }
    }

    /// Builds a map from text rows: `#` wall, `.` floor, anything else absent.
    ///
    /// Handy for hand-made levels and tests.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{GameMap, Position};
    ///
    /// let map = GameMap::from_rows(&["###", "#.#", "###"], 1);
    /// assert!(map.is_walkable(Position::new(1, 1)));
    /// assert!(map.tile(Position::new(0, 0)).unwrap().wall);
    /// ```
    pub fn from_rows(rows: &[&str], depth: u32) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as u32;
        let mut map = Self::new(width, height, depth);

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let index = y * width as usize + x;
                map.tiles[index] = match ch {
                    '#' => Some(Tile::wall()),
                    '.' => Some(Tile::floor()),
                    _ => None,
                };
            }
        }

        map
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Checks whether a coordinate lies inside the bounding grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Returns the tile at a coordinate, if one was generated there.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.tiles[i].as_ref())
    }

    /// Places a tile, replacing whatever was there.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> GloomResult<()> {
        let index = self
            .index(pos)
            .ok_or_else(|| GloomError::Invariant(format!("Tile {} is outside the map", pos)))?;
        self.tiles[index] = Some(tile);
        Ok(())
    }

    /// Whether actors can stand on the coordinate. Absent tiles are not walkable.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).map(|tile| tile.walkable).unwrap_or(false)
    }

    /// Whether the player has ever seen the coordinate.
    pub fn is_explored(&self, pos: Position) -> bool {
        self.tile(pos).map(|tile| tile.explored).unwrap_or(false)
    }

    /// Iterates over every generated tile with its coordinate.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        let width = self.width as usize;
        self.tiles.iter().enumerate().filter_map(move |(i, tile)| {
            tile.as_ref()
                .map(|t| (Position::new((i % width) as i32, (i / width) as i32), t))
        })
    }

    /// Number of walkable tiles.
    pub fn walkable_count(&self) -> usize {
        self.tiles().filter(|(_, tile)| tile.walkable).count()
    }

    /// Computes the light map from `origin` without touching exploration state.
    ///
    /// Coordinates with no tile are never lit, even next to open floor.
    pub fn light_map_from(&self, origin: Position, radius: i32) -> LightMap {
        let mut light = compute_light_map(origin, radius, |pos| self.is_walkable(pos));
        light.retain(|pos| self.tile(pos).is_some());
        light
    }

    /// Computes the light map from `origin` and marks every lit tile explored.
    pub fn compute_light_map(&mut self, origin: Position, radius: i32) -> LightMap {
        let light = self.light_map_from(origin, radius);
        for (pos, _) in light.iter() {
            if let Some(index) = self.index(pos) {
                if let Some(tile) = self.tiles[index].as_mut() {
                    tile.explored = true;
                }
            }
        }
        light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closet() -> GameMap {
        GameMap::from_rows(
            &[
                "#######", //
                "#.....#", //
                "#.....#", //
                "###.###", //
                "  #.#  ", //
                "  ###  ",
            ],
            1,
        )
    }

    #[test]
    fn test_absent_tiles_are_not_walkable() {
        let map = closet();
        assert!(map.tile(Position::new(0, 4)).is_none());
        assert!(!map.is_walkable(Position::new(0, 4)));
        assert!(!map.is_walkable(Position::new(-1, 0)));
        assert!(!map.is_walkable(Position::new(100, 100)));
        assert!(map.is_walkable(Position::new(3, 4)));
    }

    #[test]
    fn test_set_tile_out_of_bounds_fails() {
        let mut map = GameMap::new(4, 4, 1);
        assert!(map.set_tile(Position::new(4, 0), Tile::floor()).is_err());
        assert!(map.set_tile(Position::new(3, 3), Tile::floor()).is_ok());
        assert_eq!(map.walkable_count(), 1);
    }

    #[test]
    fn test_light_map_marks_explored() {
        let mut map = closet();
        assert!(!map.is_explored(Position::new(1, 1)));

        let light = map.compute_light_map(Position::new(3, 1), 8);
        assert!(light.is_lit(Position::new(1, 1)));
        assert!(map.is_explored(Position::new(1, 1)));
        assert!(map.is_explored(Position::new(3, 0)));
        // Absent tiles never become explored.
        assert!(!map.is_explored(Position::new(0, 5)));
    }

    #[test]
    fn test_unfenced_edges_stay_dark() {
        let map = GameMap::from_rows(&["#.. .#", "#....#"], 1);
        let light = map.light_map_from(Position::new(1, 1), 8);

        assert!(light.is_lit(Position::new(2, 0)));
        assert!(light.is_lit(Position::new(5, 1)));
        assert!(!light.is_lit(Position::new(3, 0)));
        assert!(!light.is_lit(Position::new(1, -1)));
        assert!(!light.is_lit(Position::new(2, 2)));
        assert!(light.iter().all(|(pos, _)| map.tile(pos).is_some()));
    }

    #[test]
    fn test_light_map_from_leaves_exploration_alone() {
        let map = closet();
        let light = map.light_map_from(Position::new(3, 1), 8);
        assert!(light.is_lit(Position::new(5, 2)));
        assert!(!map.is_explored(Position::new(5, 2)));
    }

    #[test]
    fn test_explored_is_monotonic() {
        let mut map = closet();
        map.compute_light_map(Position::new(3, 1), 8);
        assert!(map.is_explored(Position::new(5, 1)));

        // Looking from somewhere with a narrower view keeps earlier exploration.
        map.compute_light_map(Position::new(3, 4), 1);
        assert!(map.is_explored(Position::new(5, 1)));
    }
}
