//! # Monster AI
//!
//! The enemy phase: every entity with a behaviour acts once, in id order.
//!
//! Monsters only notice the player while standing on a tile the player can
//! currently see. Visibility is treated as symmetric, so there is no separate
//! field of view per monster.

use crate::game::{attack, Ai, EntityId, GameState, Location, MessageKind, Position};
use crate::GloomResult;
use log::debug;

/// Runs one enemy phase. Stops early if the player dies.
pub fn run_enemy_phase(state: &mut GameState) -> GloomResult<()> {
    for id in state.store.ids() {
        if state.player_dead()? {
            break;
        }

        let entity = state.store.get(id)?;
        if entity.dead || id == state.player_id {
            continue;
        }
        let ai = entity.ai;
        match ai {
            Some(Ai::MoveToPlayer) => move_to_player(state, id)?,
            Some(Ai::Confused { turns_remaining }) => stumble(state, id, turns_remaining)?,
            None => {}
        }
    }
    Ok(())
}

/// Steps one tile toward the player along a randomly weighted axis, or
/// attacks if that step lands on the player.
fn move_to_player(state: &mut GameState, id: EntityId) -> GloomResult<()> {
    let Some(pos) = state.store.get(id)?.position() else {
        return Ok(());
    };
    if !state.is_lit(pos) {
        return Ok(());
    }

    let target = state.player_position()?;
    let dx = target.x - pos.x;
    let dy = target.y - pos.y;
    if dx == 0 && dy == 0 {
        return Ok(());
    }

    let horizontal_share = dx.abs() as f64 / (dx.abs() + dy.abs()) as f64;
    let step = if state.rng.chance(horizontal_share) {
        Position::new(pos.x + dx.signum(), pos.y)
    } else {
        Position::new(pos.x, pos.y + dy.signum())
    };

    if step == target {
        let player = state.player_id;
        return attack(state, id, player);
    }
    if !state.map.is_walkable(step) || state.store.blocking_at(step)?.is_some() {
        debug!("{} waits, {} is blocked", id, step);
        return Ok(());
    }
    state.store.move_to(id, Location::Map(step))
}

/// Wanders one random step (possibly staying put) and counts down the
/// confusion.
fn stumble(state: &mut GameState, id: EntityId, turns_remaining: u32) -> GloomResult<()> {
    let dx = state.rng.uniform_int(-1, 1);
    let dy = state.rng.uniform_int(-1, 1);

    if let Some(pos) = state.store.get(id)?.position() {
        let step = pos.offset(dx, dy);
        if step != pos
            && state.map.is_walkable(step)
            && state.store.blocking_at(step)?.is_none()
        {
            state.store.move_to(id, Location::Map(step))?;
        }
    }

    let remaining = turns_remaining.saturating_sub(1);
    let entity = state.store.get_mut(id)?;
    if remaining == 0 {
        entity.ai = Some(Ai::MoveToPlayer);
        let name = entity.name.clone();
        state.log(
            format!("The {} is no longer confused!", name),
            MessageKind::Info,
        );
    } else {
        entity.ai = Some(Ai::Confused {
            turns_remaining: remaining,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFUSION_TURNS;
    use crate::game::{EntityKind, GameMap};

    fn split_level() -> GameMap {
        // Two rooms joined by nothing; the right one is never visible from the left.
        GameMap::from_rows(
            &[
                "#################",
                "#.....###.......#",
                "#.....###.......#",
                "#.....###.......#",
                "#################",
            ],
            1,
        )
    }

    #[test]
    fn test_unseen_monster_does_nothing() {
        let mut state = GameState::with_map(split_level(), Position::new(2, 2), 9).unwrap();
        let orc = state.spawn(EntityKind::Orc, Position::new(10, 2)).unwrap();
        assert!(!state.is_lit(Position::new(10, 2)));

        for _ in 0..20 {
            run_enemy_phase(&mut state).unwrap();
        }
        assert_eq!(
            state.store.get(orc).unwrap().position(),
            Some(Position::new(10, 2))
        );
        assert_eq!(state.player().unwrap().hp, Some(30));
    }

    #[test]
    fn test_visible_monster_closes_in_and_attacks() {
        let mut state = GameState::with_map(split_level(), Position::new(1, 2), 9).unwrap();
        let orc = state.spawn(EntityKind::Orc, Position::new(3, 2)).unwrap();

        run_enemy_phase(&mut state).unwrap();
        assert_eq!(
            state.store.get(orc).unwrap().position(),
            Some(Position::new(2, 2))
        );

        state.refresh_fov().unwrap();
        run_enemy_phase(&mut state).unwrap();
        // Orc power 3 against player defense 2.
        assert_eq!(state.player().unwrap().hp, Some(29));
    }

    #[test]
    fn test_confusion_wears_off_after_its_turns() {
        let mut state = GameState::with_map(split_level(), Position::new(2, 2), 4).unwrap();
        let orc = state.spawn(EntityKind::Orc, Position::new(11, 2)).unwrap();
        state.store.get_mut(orc).unwrap().ai = Some(Ai::Confused {
            turns_remaining: CONFUSION_TURNS,
        });

        for _ in 0..(CONFUSION_TURNS - 1) {
            run_enemy_phase(&mut state).unwrap();
            assert!(matches!(
                state.store.get(orc).unwrap().ai,
                Some(Ai::Confused { .. })
            ));
        }
        run_enemy_phase(&mut state).unwrap();

        assert_eq!(state.store.get(orc).unwrap().ai, Some(Ai::MoveToPlayer));
        assert_eq!(state.messages.count_containing("no longer confused"), 1);

        let pos = state.store.get(orc).unwrap().position().unwrap();
        assert!(state.map.is_walkable(pos));
    }

    #[test]
    fn test_phase_stops_when_player_dies() {
        let mut state = GameState::with_map(split_level(), Position::new(2, 2), 4).unwrap();
        state.store.get_mut(state.player_id).unwrap().hp = Some(1);
        let troll = state.spawn(EntityKind::Troll, Position::new(2, 3)).unwrap();
        state.store.get_mut(troll).unwrap().base_power = 10;
        // Would attack next, straight along the row.
        state.spawn(EntityKind::Orc, Position::new(1, 2)).unwrap();

        run_enemy_phase(&mut state).unwrap();
        assert!(state.player_dead().unwrap());
        assert_eq!(state.messages.count_containing("You died!"), 1);
        let enemy_attacks = state
            .messages
            .iter()
            .filter(|m| m.kind == MessageKind::EnemyAttack)
            .count();
        assert_eq!(enemy_attacks, 1);
    }

    #[test]
    fn test_blocked_chaser_forfeits_its_move() {
        for seed in 0..50 {
            let mut state = GameState::with_map(split_level(), Position::new(2, 1), seed).unwrap();
            let orc = state.spawn(EntityKind::Orc, Position::new(2, 3)).unwrap();
            // An inert blocker on the only step the orc may take.
            let statue = state.spawn(EntityKind::Troll, Position::new(2, 2)).unwrap();
            state.store.get_mut(statue).unwrap().ai = None;

            run_enemy_phase(&mut state).unwrap();
            assert_eq!(
                state.store.get(orc).unwrap().position(),
                Some(Position::new(2, 3)),
                "seed {seed}"
            );
            assert_eq!(state.player().unwrap().hp, Some(30));
        }
    }

    #[test]
    fn test_chaser_on_a_shared_axis_never_strays() {
        for seed in 0..50 {
            let mut state = GameState::with_map(split_level(), Position::new(2, 1), seed).unwrap();
            let below = state.spawn(EntityKind::Orc, Position::new(2, 3)).unwrap();
            let beside = state.spawn(EntityKind::Orc, Position::new(5, 1)).unwrap();

            run_enemy_phase(&mut state).unwrap();
            assert_eq!(
                state.store.get(below).unwrap().position(),
                Some(Position::new(2, 2)),
                "seed {seed}"
            );
            assert_eq!(
                state.store.get(beside).unwrap().position(),
                Some(Position::new(4, 1)),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn test_chaser_favours_the_longer_axis() {
        let mut horizontal = 0;
        for seed in 0..400 {
            let mut state = GameState::with_map(split_level(), Position::new(1, 1), seed).unwrap();
            let orc = state.spawn(EntityKind::Orc, Position::new(4, 2)).unwrap();

            run_enemy_phase(&mut state).unwrap();
            match state.store.get(orc).unwrap().position() {
                Some(pos) if pos == Position::new(3, 2) => horizontal += 1,
                Some(pos) => assert_eq!(pos, Position::new(4, 1), "seed {seed}"),
                None => panic!("orc left the map"),
            }
        }
        // Three columns against one row: about three in four steps go sideways.
        assert!((240..=360).contains(&horizontal), "{horizontal} of 400");
    }
}
