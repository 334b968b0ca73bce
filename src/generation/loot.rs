//! # Item Generation
//!
//! Level-scaled loot placement: consumables from the first level, stronger
//! scrolls and equipment as the player goes deeper.

use crate::game::{EntityKind, EntityStore, Location, SpawnOverrides};
use crate::generation::Room;
use crate::utils::{step_value, GameRng, StepTable};
use crate::GloomResult;

/// Maximum items per room by dungeon level.
pub const MAX_ITEMS_PER_ROOM: &StepTable = &[(1, 1), (4, 2)];

/// Spawn weight tables for every item kind.
pub const ITEM_WEIGHTS: &[(EntityKind, &StepTable)] = &[
    (EntityKind::HealingPotion, &[(1, 35)]),
    (EntityKind::LightningScroll, &[(4, 25)]),
    (EntityKind::FireballScroll, &[(6, 25)]),
    (EntityKind::ConfusionScroll, &[(2, 10)]),
    (EntityKind::Sword, &[(4, 5)]),
    (EntityKind::ChainMail, &[(8, 15)]),
    (EntityKind::Dagger, &[(1, 5)]),
    (EntityKind::LeatherArmor, &[(1, 5)]),
];

/// Spawn weights for every item kind at the given level.
pub fn item_weights(depth: u32) -> Vec<(EntityKind, u32)> {
    ITEM_WEIGHTS
        .iter()
        .map(|(kind, table)| (*kind, step_value(table, depth)))
        .collect()
}

/// Places up to the level's per-room maximum of items in a room.
///
/// Items only go on tiles with no entity at all. Returns the number of items
/// actually placed.
pub fn place_items(
    store: &mut EntityStore,
    room: &Room,
    depth: u32,
    rng: &mut GameRng,
) -> GloomResult<usize> {
    let count = rng.uniform_int(0, step_value(MAX_ITEMS_PER_ROOM, depth) as i32);
    let weights = item_weights(depth);

    let mut placed = 0;
    for _ in 0..count {
        let pos = room.random_position(rng);
        if !store.all_at(pos).is_empty() {
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
