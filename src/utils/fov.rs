//! # Field of View
//!
//! Precise shadowcasting over square rings around a viewpoint.
//!
//! Each ring cell covers an arc of the full circle. Cells that block light
//! add their arc to a sorted list of shadows; every cell reports the fraction
//! of its arc that is not yet in shadow. The result is a [`LightMap`] of
//! visibility fractions in `(0, 1]`.

use crate::game::Position;
use std::collections::HashMap;

/// Per-tile visibility fractions computed from one viewpoint.
///
/// Tiles with no recorded value have visibility 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightMap {
    cells: HashMap<Position, f64>,
}

impl LightMap {
    /// Creates an empty light map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visibility of a tile (0 when never reached).
    pub fn get(&self, pos: Position) -> f64 {
        self.cells.get(&pos).copied().unwrap_or(0.0)
    }

    /// Returns true if the tile receives any light.
    pub fn is_lit(&self, pos: Position) -> bool {
        self.get(pos) > 0.0
    }

    /// Records a visibility value for a tile.
    pub fn set(&mut self, pos: Position, visibility: f64) {
        self.cells.insert(pos, visibility);
    }

    /// Keeps only the tiles matching the predicate.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(Position) -> bool,
    {
        self.cells.retain(|pos, _| keep(*pos));
    }

    /// Iterates over every lit tile and its visibility.
    pub fn iter(&self) -> impl Iterator<Item = (Position, f64)> + '_ {
        self.cells.iter().map(|(pos, v)| (*pos, *v))
    }

    /// Number of lit tiles.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if nothing is lit.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An angle as a fraction of the full circle: `(numerator, denominator)`.
type Angle = (i64, i64);

/// Computes the light map seen from `origin` out to `radius` rings.
///
/// `light_passes` tells whether light can travel through a tile. Opaque tiles
/// are still lit themselves; they only shadow what lies behind them. An
/// opaque origin sees only itself.
///
/// # Examples
///
/// ```
/// use gloom::{compute_light_map, Position};
///
/// let origin = Position::new(0, 0);
/// let light = compute_light_map(origin, 2, |_| true);
/// assert_eq!(light.get(origin), 1.0);
/// assert!(light.is_lit(Position::new(2, -2)));
/// assert!(!light.is_lit(Position::new(3, 0)));
/// ```
pub fn compute_light_map<F>(origin: Position, radius: i32, light_passes: F) -> LightMap
where
    F: Fn(Position) -> bool,
{
    let mut light = LightMap::new();
    light.set(origin, 1.0);

    if !light_passes(origin) {
        return light;
    }

    let mut shadows: Vec<Angle> = Vec::new();

    for r in 1..=radius {
        let ring = ring_positions(origin, r);
        let count = ring.len() as i64;

        for (i, pos) in ring.into_iter().enumerate() {
            let i = i as i64;
            let a1 = if i > 0 {
                (2 * i - 1, 2 * count)
            } else {
                (2 * count - 1, 2 * count)
            };
            let a2 = (2 * i + 1, 2 * count);

            let blocks = !light_passes(pos);
            let visibility = check_visibility(a1, a2, blocks, &mut shadows);
            if visibility > 0.0 {
                light.set(pos, visibility);
            }

            // The whole circle is in shadow; nothing further can be seen.
            if shadows.len() == 2 && shadows[0].0 == 0 && shadows[1].0 == shadows[1].1 {
                return light;
            }
        }
    }

    light
}

/// Returns the square ring of cells at Chebyshev distance `r`, walked
/// counter-clockwise starting from the bottom-left corner.
fn ring_positions(center: Position, r: i32) -> Vec<Position> {
    const DIRS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

    let mut result = Vec::with_capacity((8 * r) as usize);
    let mut x = center.x - r;
    let mut y = center.y + r;

    for (dx, dy) in DIRS {
        for _ in 0..(2 * r) {
            result.push(Position::new(x, y));
            x += dx;
            y += dy;
        }
    }

    result
}

/// Returns the visible fraction of the arc `a1..a2` and, if the cell blocks
/// light, merges the arc into `shadows`.
///
/// `shadows` is a flat list of `[start, end, start, end, ...]` angles kept in
/// increasing order.
fn check_visibility(a1: Angle, a2: Angle, blocks: bool, shadows: &mut Vec<Angle>) -> f64 {
    // Arc wraps through angle 0: split it in two.
    if a1.0 > a2.0 {
        let v1 = check_visibility(a1, (a1.1, a1.1), blocks, shadows);
        let v2 = check_visibility((0, 1), a2, blocks, shadows);
        return (v1 + v2) / 2.0;
    }

    let mut index1 = 0usize;
    let mut edge1 = false;
    while index1 < shadows.len() {
        let old = shadows[index1];
        let diff = old.0 * a1.1 - a1.0 * old.1;
        if diff >= 0 {
            if diff == 0 && index1 % 2 == 0 {
                edge1 = true;
            }
            break;
        }
        index1 += 1;
    }

    let mut index2 = shadows.len() as isize;
    let mut edge2 = false;
    loop {
        if index2 == 0 {
            index2 = -1;
            break;
        }
        index2 -= 1;
        let old = shadows[index2 as usize];
        let diff = a2.0 * old.1 - old.0 * a2.1;
        if diff >= 0 {
            if diff == 0 && index2 % 2 == 1 {
                edge2 = true;
            }
            break;
        }
    }

    let i1 = index1 as isize;
    let hidden = (i1 == index2 && (edge1 || edge2))
        || (edge1 && edge2 && i1 + 1 == index2 && index2 % 2 == 1)
        || (i1 > index2 && i1 % 2 == 1);
    if hidden {
        return 0.0;
    }

    let remove = (index2 - i1 + 1).max(0) as usize;
    let replaced = index1..index1 + remove;

    let visible_length = if remove % 2 == 1 {
        if index1 % 2 == 1 {
            // Start of the arc is in shadow; its end is visible.
            let p = shadows[index1];
            let length = fraction(a2.0 * p.1 - p.0 * a2.1, p.1 * a2.1);
            if blocks {
                shadows.splice(replaced, [a2]);
            }
            length
        } else {
            // End of the arc is in shadow; its start is visible.
            let p = shadows[index2 as usize];
            let length = fraction(p.0 * a1.1 - a1.0 * p.1, a1.1 * p.1);
            if blocks {
                shadows.splice(replaced, [a1]);
            }
            length
        }
    } else if index1 % 2 == 1 {
        // Both ends are in shadow; only the gap between them is visible.
        let p1 = shadows[index1];
        let p2 = shadows[index2 as usize];
        let length = fraction(p2.0 * p1.1 - p1.0 * p2.1, p1.1 * p2.1);
        if blocks {
            shadows.drain(replaced);
        }
        length
    } else {
        // Both ends are lit.
        if blocks {
            shadows.splice(replaced, [a1, a2]);
        }
        return 1.0;
    };

    let arc_length = fraction(a2.0 * a1.1 - a1.0 * a2.1, a1.1 * a2.1);
    visible_length / arc_length
}

fn fraction(numerator: i64, denominator: i64) -> f64 {
    numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ring_sizes() {
        let center = Position::new(10, 10);
        for r in 1..5 {
            let ring = ring_positions(center, r);
            assert_eq!(ring.len(), (8 * r) as usize);
            let unique: HashSet<_> = ring.iter().collect();
            assert_eq!(unique.len(), ring.len());
            assert!(ring.iter().all(|p| {
                let d = (p.x - center.x).abs().max((p.y - center.y).abs());
                d == r
            }));
        }
    }

    #[test]
    fn test_open_field_is_fully_lit() {
        let origin = Position::new(0, 0);
        let light = compute_light_map(origin, 3, |_| true);
        assert_eq!(light.len(), 49);
        for (_, v) in light.iter() {
            assert_eq!(v, 1.0);
        }
    }

    #[test]
    fn test_opaque_origin_sees_only_itself() {
        let origin = Position::new(0, 0);
        let light = compute_light_map(origin, 5, |_| false);
        assert_eq!(light.len(), 1);
        assert!(light.is_lit(origin));
    }

    #[test]
    fn test_wall_casts_shadow_but_is_lit() {
        let origin = Position::new(0, 0);
        let wall = Position::new(2, 0);
        let light = compute_light_map(origin, 6, |p| p != wall);

        assert!(light.is_lit(wall));
        assert!(!light.is_lit(Position::new(5, 0)));
        assert!(!light.is_lit(Position::new(6, 0)));
        assert!(light.is_lit(Position::new(-5, 0)));
    }

    #[test]
    fn test_enclosed_room_stops_at_walls() {
        // A 3x3 floor area surrounded by walls.
        let passes = |p: Position| p.x.abs() <= 1 && p.y.abs() <= 1;
        let light = compute_light_map(Position::new(0, 0), 8, passes);

        assert!(light.is_lit(Position::new(2, 2)));
        assert!(light.is_lit(Position::new(-2, 0)));
        assert!(!light.is_lit(Position::new(3, 0)));
        assert!(!light.is_lit(Position::new(0, -4)));
    }

    #[test]
    fn test_visibility_fractions_are_in_range() {
        let pillar = Position::new(1, 1);
        let light = compute_light_map(Position::new(0, 0), 6, |p| p != pillar);
        for (_, v) in light.iter() {
            assert!(v > 0.0 && v <= 1.0, "visibility {v} out of range");
        }
    }
}
