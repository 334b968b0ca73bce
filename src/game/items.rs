//! # Item Effects
//!
//! Using, targeting and equipping carried items.
//!
//! Effects that need a tile (fireball, confusion) do not run immediately:
//! using them yields a [`PendingEffect`] that the turn engine parks in
//! [`UiMode::Targeting`](crate::game::UiMode) until a tile is supplied.

use crate::config::{
    CONFUSION_TURNS, FIREBALL_DAMAGE, FIREBALL_RADIUS, HEALING_AMOUNT, LIGHTNING_DAMAGE,
    LIGHTNING_RANGE,
};
use crate::game::{
    effective_max_hp, heal, take_damage, Ai, EntityId, EntityKind, GameState, Location,
    MessageKind, Position,
};
use crate::{GloomError, GloomResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// An item effect waiting for a target tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingEffect {
    Fireball { item: EntityId },
    Confusion { item: EntityId },
}

impl PendingEffect {
    /// The scroll that will be consumed when the effect resolves.
    pub fn item(self) -> EntityId {
        match self {
            PendingEffect::Fireball { item } | PendingEffect::Confusion { item } => item,
        }
    }
}

/// Result of trying to use an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// The item took effect and is gone
    Consumed,
    /// The item was put on
    Equipped,
    /// Nothing happened; a warning was logged
    Failed,
    /// A target tile is needed before anything happens
    NeedsTarget(PendingEffect),
}

/// Uses an item from the player's inventory.
pub fn use_item(state: &mut GameState, item: EntityId) -> GloomResult<UseOutcome> {
    if !state.held_by_player(item)? {
        return Err(GloomError::InvalidAction(format!(
            "{} is not carried by the player",
            item
        )));
    }

    let entity = state.store.get(item)?;
    let kind = entity.kind;
    let name = entity.name.clone();
    debug!("Player uses {} ({:?})", item, kind);

    match kind {
        EntityKind::HealingPotion => drink_healing(state, item),
        EntityKind::LightningScroll => cast_lightning(state, item),
        EntityKind::FireballScroll => {
            state.log(
                "Select a target location for the fireball.",
                MessageKind::Info,
            );
            Ok(UseOutcome::NeedsTarget(PendingEffect::Fireball { item }))
        }
        EntityKind::ConfusionScroll => {
            state.log("Select an enemy to confuse.", MessageKind::Info);
            Ok(UseOutcome::NeedsTarget(PendingEffect::Confusion { item }))
        }
        _ if kind.traits().equip_slot.is_some() => equip_item(state, item),
        _ => {
            state.log(format!("You cannot use the {}.", name), MessageKind::Warning);
            Ok(UseOutcome::Failed)
        }
    }
}

/// Resolves a pending effect at the chosen tile.
///
/// The tile must be currently visible to the player.
pub fn resolve_target(
    state: &mut GameState,
    effect: PendingEffect,
    target: Position,
) -> GloomResult<UseOutcome> {
    if !state.is_lit(target) {
        state.log(
            "You cannot target a location you cannot see.",
            MessageKind::Warning,
        );
        return Ok(UseOutcome::Failed);
    }

    match effect {
        PendingEffect::Fireball { item } => cast_fireball(state, item, target),
        PendingEffect::Confusion { item } => cast_confusion(state, item, target),
    }
}

/// Puts on a carried piece of equipment, swapping out whatever was worn.
pub fn equip_item(state: &mut GameState, item: EntityId) -> GloomResult<UseOutcome> {
    let entity = state.store.get(item)?;
    let name = entity.name.clone();
    if entity.traits().equip_slot.is_none() {
        state.log(
            format!("The {} cannot be equipped.", name),
            MessageKind::Warning,
        );
        return Ok(UseOutcome::Failed);
    }

    let removed = state.store.swap_equipment(item)?;
    if let Some(previous) = removed {
        let previous_name = state.store.get(previous)?.name.clone();
        state.log(format!("You remove the {}.", previous_name), MessageKind::Info);
    }
    state.log(format!("You equip the {}.", name), MessageKind::Info);
    Ok(UseOutcome::Equipped)
}

fn drink_healing(state: &mut GameState, item: EntityId) -> GloomResult<UseOutcome> {
    let player = state.player_id;
    let entity = state.store.get(player)?;
    let max_hp = effective_max_hp(&state.store, player)?.unwrap_or(0);
    if entity.hp.unwrap_or(0) >= max_hp {
        state.log("Your health is already full.", MessageKind::Warning);
        return Ok(UseOutcome::Failed);
    }

    let recovered = heal(state, player, HEALING_AMOUNT)?;
    state.log(
        format!("You consume the healing potion, and recover {} hit points!", recovered),
        MessageKind::Healing,
    );
    consume(state, item)?;
    Ok(UseOutcome::Consumed)
}

/// Strikes the closest visible enemy within range. Ties go to the lower id.
fn cast_lightning(state: &mut GameState, item: EntityId) -> GloomResult<UseOutcome> {
    let origin = state.player_position()?;
    let player = state.player_id;

    let mut best: Option<(f64, EntityId)> = None;
    for entity in state.store.iter() {
        if entity.id == player || !entity.is_damageable() {
            continue;
        }
        let Some(pos) = entity.position() else {
            continue;
        };
        if !state.is_lit(pos) {
            continue;
        }
        let distance = origin.euclidean_distance(pos);
        if distance > LIGHTNING_RANGE {
            continue;
        }
        if best.map(|(d, _)| distance < d).unwrap_or(true) {
            best = Some((distance, entity.id));
        }
    }

    let Some((_, target)) = best else {
        state.log("No enemy is close enough to strike.", MessageKind::Warning);
        return Ok(UseOutcome::Failed);
    };

    let name = state.store.get(target)?.name.clone();
    state.log(
        format!(
            "A lightning bolt strikes the {} with a loud thunder, for {} damage!",
            name, LIGHTNING_DAMAGE
        ),
        MessageKind::Magic,
    );
    take_damage(state, target, LIGHTNING_DAMAGE, Some(player))?;
    consume(state, item)?;
    Ok(UseOutcome::Consumed)
}

/// Burns everything near `target` that both the caster and the blast point
/// can see. Damage ignores defense and can catch the caster.
fn cast_fireball(state: &mut GameState, item: EntityId, target: Position) -> GloomResult<UseOutcome> {
    let blast = state.map.light_map_from(target, FIREBALL_RADIUS);
    let radius = FIREBALL_RADIUS as f64;

    let victims: Vec<EntityId> = state
        .store
        .iter()
        .filter(|e| e.is_damageable())
        .filter(|e| {
            e.position()
                .map(|pos| {
                    target.euclidean_distance(pos) <= radius
                        && state.is_lit(pos)
                        && blast.is_lit(pos)
                })
                .unwrap_or(false)
        })
        .map(|e| e.id)
        .collect();

    state.log(
        format!(
            "The fireball explodes, burning everything within {} tiles!",
            FIREBALL_RADIUS
        ),
        MessageKind::Magic,
    );

    let player = state.player_id;
    for victim in victims {
        let name = state.store.get(victim)?.name.clone();
        state.log(
            format!("The {} gets burned for {} hit points.", name, FIREBALL_DAMAGE),
            MessageKind::Magic,
        );
        take_damage(state, victim, FIREBALL_DAMAGE, Some(player))?;
    }

    consume(state, item)?;
    Ok(UseOutcome::Consumed)
}

/// Confuses the monster standing on `target`.
fn cast_confusion(state: &mut GameState, item: EntityId, target: Position) -> GloomResult<UseOutcome> {
    let victim = state
        .store
        .blocking_at(target)?
        .filter(|id| *id != state.player_id);

    let Some(victim) = victim else {
        state.log("You must select an enemy to target.", MessageKind::Warning);
        return Ok(UseOutcome::Failed);
    };

    let entity = state.store.get_mut(victim)?;
    if entity.ai.is_none() {
        state.log("You must select an enemy to target.", MessageKind::Warning);
        return Ok(UseOutcome::Failed);
    }
    entity.ai = Some(Ai::Confused {
        turns_remaining: CONFUSION_TURNS,
    });
    let name = entity.name.clone();

    state.log(
        format!(
            "The eyes of the {} look vacant, as it starts to stumble around!",
            name
        ),
        MessageKind::Magic,
    );
    consume(state, item)?;
    Ok(UseOutcome::Consumed)
}

/// Removes a used item from the world.
fn consume(state: &mut GameState, item: EntityId) -> GloomResult<()> {
    state.store.move_to(item, Location::Nowhere)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameMap, SpawnOverrides};

    fn hall() -> GameMap {
        GameMap::from_rows(
            &[
                "##############",
                "#............#",
                "#............#",
                "#............#",
                "#............#",
                "#............#",
                "#............#",
                "##############",
            ],
            1,
        )
    }

    fn carried(state: &mut GameState, kind: EntityKind, slot: usize) -> EntityId {
        let owner = state.player_id;
        state
            .store
            .create(kind, Location::Carried { owner, slot }, SpawnOverrides::default())
            .unwrap()
    }

    #[test]
    fn test_healing_potion() {
        let mut state = GameState::with_map(hall(), Position::new(2, 2), 1).unwrap();
        let potion = carried(&mut state, EntityKind::HealingPotion, 0);

        assert_eq!(use_item(&mut state, potion).unwrap(), UseOutcome::Failed);
        assert!(state.held_by_player(potion).unwrap());

        state.store.get_mut(state.player_id).unwrap().hp = Some(20);
        assert_eq!(use_item(&mut state, potion).unwrap(), UseOutcome::Consumed);
        assert_eq!(state.player().unwrap().hp, Some(24));
        assert_eq!(state.store.get(potion).unwrap().location, Location::Nowhere);
    }

    #[test]
    fn test_lightning_hits_closest_visible_enemy() {
        let mut state = GameState::with_map(hall(), Position::new(2, 2), 1).unwrap();
        let scroll = carried(&mut state, EntityKind::LightningScroll, 0);
        let far = state.spawn(EntityKind::Troll, Position::new(6, 2)).unwrap();
        let near = state.spawn(EntityKind::Orc, Position::new(4, 2)).unwrap();

        assert_eq!(use_item(&mut state, scroll).unwrap(), UseOutcome::Consumed);
        assert!(state.store.get(near).unwrap().dead);
        assert_eq!(state.store.get(far).unwrap().hp, Some(16));
    }

    #[test]
    fn test_lightning_needs_target_in_range() {
        let mut state = GameState::with_map(hall(), Position::new(1, 1), 1).unwrap();
        let scroll = carried(&mut state, EntityKind::LightningScroll, 0);
        let troll = state.spawn(EntityKind::Troll, Position::new(12, 6)).unwrap();

        assert_eq!(use_item(&mut state, scroll).unwrap(), UseOutcome::Failed);
        assert_eq!(state.store.get(troll).unwrap().hp, Some(16));
        assert!(state.held_by_player(scroll).unwrap());
    }

    #[test]
    fn test_fireball_requires_target() {
        let mut state = GameState::with_map(hall(), Position::new(2, 2), 1).unwrap();
        let scroll = carried(&mut state, EntityKind::FireballScroll, 0);

        let outcome = use_item(&mut state, scroll).unwrap();
        assert_eq!(
            outcome,
            UseOutcome::NeedsTarget(PendingEffect::Fireball { item: scroll })
        );
        assert!(state.held_by_player(scroll).unwrap());
    }

    #[test]
    fn test_fireball_burns_within_radius() {
        let mut state = GameState::with_map(hall(), Position::new(1, 1), 1).unwrap();
        let scroll = carried(&mut state, EntityKind::FireballScroll, 0);
        let center = Position::new(8, 4);
        let a = state.spawn(EntityKind::Orc, Position::new(8, 4)).unwrap();
        let b = state.spawn(EntityKind::Orc, Position::new(9, 5)).unwrap();
        let c = state.spawn(EntityKind::Troll, Position::new(6, 4)).unwrap();
        let out = state.spawn(EntityKind::Orc, Position::new(12, 4)).unwrap();

        let effect = PendingEffect::Fireball { item: scroll };
        assert_eq!(
            resolve_target(&mut state, effect, center).unwrap(),
            UseOutcome::Consumed
        );
        for id in [a, b, c] {
            let victim = state.store.get(id).unwrap();
            assert!(victim.hp.unwrap() <= 0);
            assert_eq!(victim.kind, EntityKind::Corpse);
        }
        assert_eq!(state.store.get(out).unwrap().hp, Some(10));
        assert_eq!(state.player().unwrap().hp, Some(30));
    }

    #[test]
    fn test_unseen_target_is_rejected() {
        let mut state = GameState::with_map(hall(), Position::new(2, 2), 1).unwrap();
        let scroll = carried(&mut state, EntityKind::ConfusionScroll, 0);
        let effect = PendingEffect::Confusion { item: scroll };
        assert_eq!(
            resolve_target(&mut state, effect, Position::new(30, 30)).unwrap(),
            UseOutcome::Failed
        );
        assert!(state.held_by_player(scroll).unwrap());
    }

    #[test]
    fn test_fireball_cannot_target_off_the_map() {
        // No wall fences the east edge of this room.
        let map = GameMap::from_rows(&["#####", "#....", "#####"], 1);
        let mut state = GameState::with_map(map, Position::new(1, 1), 1).unwrap();
        let scroll = carried(&mut state, EntityKind::FireballScroll, 0);
        let effect = PendingEffect::Fireball { item: scroll };

        assert!(!state.is_lit(Position::new(5, 1)));
        assert_eq!(
            resolve_target(&mut state, effect, Position::new(5, 1)).unwrap(),
            UseOutcome::Failed
        );
        assert!(state.held_by_player(scroll).unwrap());
    }

    #[test]
    fn test_confusion_needs_a_monster() {
        let mut state = GameState::with_map(hall(), Position::new(2, 2), 1).unwrap();
        let scroll = carried(&mut state, EntityKind::ConfusionScroll, 0);
        let effect = PendingEffect::Confusion { item: scroll };

        assert_eq!(
            resolve_target(&mut state, effect, Position::new(5, 5)).unwrap(),
            UseOutcome::Failed
        );

        let orc = state.spawn(EntityKind::Orc, Position::new(5, 5)).unwrap();
        assert_eq!(
            resolve_target(&mut state, effect, Position::new(5, 5)).unwrap(),
            UseOutcome::Consumed
        );
        assert_eq!(
            state.store.get(orc).unwrap().ai,
            Some(Ai::Confused { turns_remaining: CONFUSION_TURNS })
        );
    }

    #[test]
    fn test_using_equipment_equips_it() {
        let mut state = GameState::with_map(hall(), Position::new(2, 2), 1).unwrap();
        let dagger = carried(&mut state, EntityKind::Dagger, 3);
        assert_eq!(use_item(&mut state, dagger).unwrap(), UseOutcome::Equipped);
        assert_eq!(
            state.store.get(dagger).unwrap().location,
            Location::Equipped { owner: state.player_id, slot: 0 }
        );
    }
}
