//! # Combat
//!
//! Derived stats, melee attacks, damage, death, healing and leveling.
//!
//! Effective stats are never stored: they are recomputed from the base stat
//! plus the bonuses of everything the entity currently wears.

use crate::config::LEVEL_UP_HP_BONUS;
use crate::game::{EntityId, EntityKind, EntityStore, GameState, MessageKind, UiMode};
use crate::input::UpgradeChoice;
use crate::utils::capitalize;
use crate::{GloomError, GloomResult};
use log::debug;

/// Base power plus the power bonus of every worn item.
pub fn effective_power(store: &EntityStore, id: EntityId) -> GloomResult<i32> {
    let bonus: i32 = store
        .equipped_items(id)?
        .iter()
        .map(|item| item.traits().bonus_power)
        .sum();
    Ok(store.get(id)?.base_power + bonus)
}

/// Base defense plus the defense bonus of every worn item.
pub fn effective_defense(store: &EntityStore, id: EntityId) -> GloomResult<i32> {
    let bonus: i32 = store
        .equipped_items(id)?
        .iter()
        .map(|item| item.traits().bonus_defense)
        .sum();
    Ok(store.get(id)?.base_defense + bonus)
}

/// Base max hp plus the max hp bonus of every worn item. `None` for entities
/// that cannot be damaged.
pub fn effective_max_hp(store: &EntityStore, id: EntityId) -> GloomResult<Option<i32>> {
    let Some(base) = store.get(id)?.base_max_hp else {
        return Ok(None);
    };
    let bonus: i32 = store
        .equipped_items(id)?
        .iter()
        .map(|item| item.traits().bonus_max_hp)
        .sum();
    Ok(Some(base + bonus))
}

/// Experience needed to advance from `level` to the next one.
///
/// The figure is cumulative: it is compared against total experience.
///
/// # Examples
///
/// ```
/// use gloom::xp_to_next_level;
///
/// assert_eq!(xp_to_next_level(1), 350);
/// assert_eq!(xp_to_next_level(2), 850);
/// ```
pub fn xp_to_next_level(level: u32) -> u32 {
    200 * level + 150 * level * (level + 1) / 2
}

/// Resolves a melee attack. Damage is power minus defense; non-positive
/// damage leaves the defender untouched.
pub fn attack(state: &mut GameState, attacker: EntityId, defender: EntityId) -> GloomResult<()> {
    if !state.store.get(defender)?.is_damageable() {
        return Err(GloomError::Invariant(format!(
            "{} attacked {} which cannot take damage",
            attacker, defender
        )));
    }

    let damage = effective_power(&state.store, attacker)? - effective_defense(&state.store, defender)?;
    let attacker_name = capitalize(&state.store.get(attacker)?.name);
    let defender_name = state.store.get(defender)?.name.clone();
    let kind = if attacker == state.player_id {
        MessageKind::PlayerAttack
    } else {
        MessageKind::EnemyAttack
    };

    if damage > 0 {
        state.log(
            format!("{} attacks {} for {} hit points.", attacker_name, defender_name, damage),
            kind,
        );
        take_damage(state, defender, damage, Some(attacker))
    } else {
        state.log(
            format!("{} attacks {} but does no damage.", attacker_name, defender_name),
            kind,
        );
        Ok(())
    }
}

/// Subtracts `amount` hit points, killing the entity at zero or below.
///
/// Entities without hit points and the already dead are ignored.
pub fn take_damage(
    state: &mut GameState,
    target: EntityId,
    amount: i32,
    source: Option<EntityId>,
) -> GloomResult<()> {
    if amount <= 0 {
        return Ok(());
    }

    let entity = state.store.get_mut(target)?;
    if !entity.is_damageable() {
        return Ok(());
    }
    let hp = entity.hp.unwrap_or(0) - amount;
    entity.hp = Some(hp);

    let player = state.player_id;
    if target == player {
        state.statistics.damage_taken += amount as u64;
    } else if source == Some(player) {
        state.statistics.damage_dealt += amount as u64;
    }

    if hp <= 0 {
        kill(state, target, source)?;
    }
    Ok(())
}

/// Turns an entity into a corpse in place and rewards the killer.
pub fn kill(state: &mut GameState, victim: EntityId, killer: Option<EntityId>) -> GloomResult<()> {
    let entity = state.store.get_mut(victim)?;
    let award = entity.traits().xp_award;
    let name = entity.name.clone();

    entity.dead = true;
    entity.kind = EntityKind::Corpse;
    entity.name = format!("{}'s corpse", name);
    entity.ai = None;
    debug!("{} ({}) died", victim, name);

    if victim == state.player_id {
        state.log("You died!", MessageKind::Death);
        state.mode = UiMode::Dead;
        return Ok(());
    }

    state.log(format!("{} is dead!", capitalize(&name)), MessageKind::Death);

    let Some(killer) = killer else {
        return Ok(());
    };
    if killer == state.player_id {
        state.statistics.enemies_defeated += 1;
    }
    let killer_entity = state.store.get(killer)?;
    if let Some(xp) = award {
        if killer_entity.traits().gains_xp && !killer_entity.dead {
            grant_xp(state, killer, xp)?;
        }
    }
    Ok(())
}

/// Restores up to `amount` hit points without exceeding effective max hp.
/// Returns the number of points actually recovered.
pub fn heal(state: &mut GameState, id: EntityId, amount: i32) -> GloomResult<i32> {
    let Some(max_hp) = effective_max_hp(&state.store, id)? else {
        return Ok(0);
    };
    let entity = state.store.get_mut(id)?;
    let Some(hp) = entity.hp else {
        return Ok(0);
    };
    let healed = (hp + amount.max(0)).min(max_hp.max(hp));
    entity.hp = Some(healed);
    Ok(healed - hp)
}

/// Adds experience and levels up as many times as the total allows.
///
/// Each level gained by the player queues one stat upgrade.
pub fn grant_xp(state: &mut GameState, id: EntityId, amount: u32) -> GloomResult<()> {
    state.store.get_mut(id)?.xp += amount;
    if id == state.player_id {
        state.log(
            format!("You gain {} experience points.", amount),
            MessageKind::Info,
        );
    }

    loop {
        let entity = state.store.get_mut(id)?;
        if entity.xp < xp_to_next_level(entity.level) {
            break;
        }
        entity.level += 1;
        let level = entity.level;

        if id == state.player_id {
            state.pending_upgrades += 1;
            state.log(
                format!("You advance to level {}!", level),
                MessageKind::LevelUp,
            );
        }
    }
    Ok(())
}

/// Applies one queued stat upgrade to the player.
pub fn apply_upgrade(state: &mut GameState, choice: UpgradeChoice) -> GloomResult<()> {
    if state.pending_upgrades == 0 {
        return Err(GloomError::InvalidAction(
            "No level up is waiting for a choice".to_string(),
        ));
    }

    let player = state.store.get_mut(state.player_id)?;
    let text = match choice {
        UpgradeChoice::Hp => {
            player.base_max_hp = player.base_max_hp.map(|max| max + LEVEL_UP_HP_BONUS);
            player.hp = player.hp.map(|hp| hp + LEVEL_UP_HP_BONUS);
            "Your health improves!"
        }
        UpgradeChoice::Power => {
            player.base_power += 1;
            "You feel stronger!"
        }
        UpgradeChoice::Defense => {
            player.base_defense += 1;
            "Your movements are getting swifter!"
        }
    };

    state.pending_upgrades -= 1;
    state.log(text, MessageKind::LevelUp);
    Ok(())
}
