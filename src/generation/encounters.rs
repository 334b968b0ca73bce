//! # Encounter Generation
//!
//! Level-scaled monster placement. Deeper levels get more monsters per room
//! and a growing share of trolls.

use crate::game::{EntityKind, EntityStore, Location, SpawnOverrides};
use crate::generation::Room;
use crate::utils::{step_value, GameRng, StepTable};
use crate::GloomResult;

/// Maximum monsters per room by dungeon level.
pub const MAX_MONSTERS_PER_ROOM: &StepTable = &[(1, 2), (4, 3), (6, 5)];

/// Orc spawn weight at every level.
pub const ORC_WEIGHT: u32 = 80;

/// Troll spawn weight by dungeon level.
pub const TROLL_WEIGHT: &StepTable = &[(3, 15), (5, 30), (7, 60)];

/// Spawn weights for every monster kind at the given level.
///
/// # Examples
///
/// ```
/// use gloom::{monster_weights, EntityKind};
///
/// assert_eq!(monster_weights(1), vec![(EntityKind::Orc, 80), (EntityKind::Troll, 0)]);
/// assert_eq!(monster_weights(5)[1], (EntityKind::Troll, 30));
/// ```
pub fn monster_weights(depth: u32) -> Vec<(EntityKind, u32)> {
    vec![
        (EntityKind::Orc, ORC_WEIGHT),
        (EntityKind::Troll, step_value(TROLL_WEIGHT, depth)),
    ]
}

/// Places up to the level's per-room maximum of monsters in a room.
///
/// Rolls that land on a tile already holding a blocker are skipped. Returns
/// the number of monsters actually placed.
pub fn place_monsters(
    store: &mut EntityStore,
    room: &Room,
    depth: u32,
    rng: &mut GameRng,
) -> GloomResult<usize> {
    let count = rng.uniform_int(0, step_value(MAX_MONSTERS_PER_ROOM, depth) as i32);
    let weights = monster_weights(depth);

    let mut placed = 0;
    for _ in 0..count {
        let pos = room.random_position(rng);
        if store.blocking_at(pos)?.is_some() {
            continue;
        }
        let Some(kind) = rng.weighted_choice(&weights) else {
            continue;
        };
        store.create(kind, Location::Map(pos), SpawnOverrides::default())?;
        placed += 1;
    }
    Ok(placed)
}
