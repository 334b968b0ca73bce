//! # Turn Engine
//!
//! Turns one player [`Action`] into a full turn: the player's move, then the
//! enemy phase, then the bookkeeping that decides which UI mode comes next.
//!
//! Only world-mutating successes hand the turn to the monsters. UI actions
//! and soft failures (walking into a wall, nothing to pick up) leave the
//! world exactly as it was. Actions that make no sense in the current mode
//! are ignored.

use crate::game::{
    apply_upgrade, attack, deserialize, resolve_target, run_enemy_phase, serialize, use_item,
    EntityId, GameState, Location, MessageKind, SaveSlot, UiMode, UseOutcome,
};
use crate::input::{key_to_action, Action, Input};
use crate::GloomResult;
use log::{debug, info, warn};

/// What applying an action amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Only the UI changed
    Idle,
    /// Nothing happened; usually a warning was logged
    Failed,
    /// The player acted and the enemy phase ran
    TurnTaken,
    /// An item is waiting for a target tile
    AwaitingTarget,
    /// The player leveled up; the monsters wait until the upgrade is chosen
    AwaitingUpgrade,
}

/// A running game: the state plus the slot it saves to.
pub struct Game {
    /// Everything the game knows
    pub state: GameState,
    slot: Box<dyn SaveSlot>,
}

impl Game {
    /// Wraps an existing state.
    pub fn new(state: GameState, slot: Box<dyn SaveSlot>) -> Self {
        Self { state, slot }
    }

    /// Starts a fresh game from a seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{Action, Game, MemorySlot, TurnOutcome};
    ///
    /// let mut game = Game::new_game(7, Box::new(MemorySlot::new())).unwrap();
    /// assert_eq!(game.apply(Action::OpenCharacter).unwrap(), TurnOutcome::Idle);
    /// assert_eq!(game.apply(Action::Cancel).unwrap(), TurnOutcome::Idle);
    /// assert_eq!(game.state().turn_number, 0);
    /// ```
    pub fn new_game(seed: u64, slot: Box<dyn SaveSlot>) -> GloomResult<Self> {
        Ok(Self::new(GameState::new_game(seed)?, slot))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Maps a raw input through the current mode and applies it. Unbound
    /// inputs do nothing.
    pub fn handle_input(&mut self, input: &Input) -> GloomResult<TurnOutcome> {
        match key_to_action(&self.state.mode, input) {
            Some(action) => self.apply(action),
            None => Ok(TurnOutcome::Idle),
        }
    }

    /// Applies one action.
    pub fn apply(&mut self, action: Action) -> GloomResult<TurnOutcome> {
        self.state.notice = None;
        if !action_allowed(&self.state.mode, &action) {
            debug!("Ignoring {} in {:?} mode", action, self.state.mode);
            return Ok(TurnOutcome::Idle);
        }

        match action {
            Action::Save => self.save(),
            Action::Load => self.load(),
            _ => perform(&mut self.state, action),
        }
    }

    /// Writes the current state to the save slot.
    pub fn save(&mut self) -> GloomResult<TurnOutcome> {
        let blob = serialize(&self.state)?;
        self.slot.store(&blob)?;
        self.state.notice = Some("Game saved.".to_string());
        info!("Saved game at turn {}", self.state.turn_number);
        Ok(TurnOutcome::Idle)
    }

    /// Replaces the current state with the saved one.
    pub fn load(&mut self) -> GloomResult<TurnOutcome> {
        let Some(blob) = self.slot.fetch()? else {
            warn!("Load requested but the save slot is empty");
            self.state.notice = Some("There is no saved game to load.".to_string());
            return Ok(TurnOutcome::Failed);
        };

        self.state = deserialize(&blob)?;
        self.state.notice = Some("Game loaded.".to_string());
        info!(
            "Loaded game at depth {}, turn {}",
            self.state.map.depth, self.state.turn_number
        );
        Ok(TurnOutcome::Idle)
    }
}

/// Whether `action` is accepted in `mode`.
pub fn action_allowed(mode: &UiMode, action: &Action) -> bool {
    match mode {
        UiMode::Normal => !matches!(action, Action::Target(_) | Action::Upgrade(_)),
        UiMode::Inventory(_) => matches!(
            action,
            Action::Use(_) | Action::Drop(_) | Action::Equip(_) | Action::Cancel
        ),
        UiMode::Character => matches!(action, Action::Cancel),
        UiMode::Targeting(_) => matches!(action, Action::Target(_) | Action::Cancel),
        UiMode::Upgrade => matches!(action, Action::Upgrade(_)),
        UiMode::Dead => matches!(action, Action::Load | Action::Save),
    }
}

/// Resolves a state-only action and, if it used up the player's turn, runs
/// the rest of the turn.
fn perform(state: &mut GameState, action: Action) -> GloomResult<TurnOutcome> {
    let outcome = match action {
        Action::Move { dx, dy } => move_or_attack(state, dx, dy)?,
        Action::PickUp => pick_up(state)?,
        Action::Drop(slot) => {
            state.mode = UiMode::Normal;
            drop_item(state, slot)?
        }
        Action::Use(slot) | Action::Equip(slot) => {
            state.mode = UiMode::Normal;
            use_slot(state, slot, matches!(action, Action::Equip(_)))?
        }
        Action::Descend => descend(state)?,
        Action::OpenInventory(purpose) => {
            state.mode = UiMode::Inventory(purpose);
            TurnOutcome::Idle
        }
        Action::OpenCharacter => {
            state.mode = UiMode::Character;
            TurnOutcome::Idle
        }
        Action::Cancel => {
            state.mode = UiMode::Normal;
            TurnOutcome::Idle
        }
        Action::ToggleDebug => {
            state.debug_reveal = !state.debug_reveal;
            TurnOutcome::Idle
        }
        Action::Target(pos) => {
            let UiMode::Targeting(effect) = state.mode else {
                return Ok(TurnOutcome::Idle);
            };
            state.mode = UiMode::Normal;
            match resolve_target(state, effect, pos)? {
                UseOutcome::Failed => TurnOutcome::Failed,
                _ => TurnOutcome::TurnTaken,
            }
        }
        Action::Upgrade(choice) => {
            apply_upgrade(state, choice)?;
            if state.pending_upgrades > 0 {
                return Ok(TurnOutcome::AwaitingUpgrade);
            }
            end_turn(state)?;
            return Ok(TurnOutcome::TurnTaken);
        }
        Action::Save | Action::Load => TurnOutcome::Idle,
    };

    if outcome == TurnOutcome::TurnTaken {
        return finish_turn(state);
    }
    Ok(outcome)
}

/// Runs everything that follows a successful player action.
///
/// A level-up parks the rest of the turn in `Upgrade` mode. The enemy phase
/// runs once the last pending upgrade has been chosen.
fn finish_turn(state: &mut GameState) -> GloomResult<TurnOutcome> {
    state.refresh_fov()?;
    if state.pending_upgrades > 0 && !state.player_dead()? {
        state.mode = UiMode::Upgrade;
        return Ok(TurnOutcome::AwaitingUpgrade);
    }

    end_turn(state)?;
    Ok(TurnOutcome::TurnTaken)
}

/// The enemy phase and the bookkeeping that closes a turn.
fn end_turn(state: &mut GameState) -> GloomResult<()> {
    run_enemy_phase(state)?;
    state.turn_number += 1;
    state.mode = if state.player_dead()? {
        UiMode::Dead
    } else {
        UiMode::Normal
    };
    Ok(())
}

fn move_or_attack(state: &mut GameState, dx: i32, dy: i32) -> GloomResult<TurnOutcome> {
    if dx == 0 && dy == 0 {
        return Ok(TurnOutcome::TurnTaken);
    }

    let player = state.player_id;
    let target = state.player_position()?.offset(dx, dy);
    if !state.map.is_walkable(target) {
        return Ok(TurnOutcome::Failed);
    }

    if let Some(blocker) = state.store.blocking_at(target)? {
        if blocker != player {
            attack(state, player, blocker)?;
            return Ok(TurnOutcome::TurnTaken);
        }
    }

    state.store.move_to(player, Location::Map(target))?;
    state.statistics.steps_taken += 1;
    Ok(TurnOutcome::TurnTaken)
}

fn pick_up(state: &mut GameState) -> GloomResult<TurnOutcome> {
    let player = state.player_id;
    let pos = state.player_position()?;
    let Some(item) = state.store.item_at(pos) else {
        state.log("There is nothing here to pick up.", MessageKind::Warning);
        return Ok(TurnOutcome::Failed);
    };
    let Some(slot) = state.store.free_inventory_slot(player)? else {
        state.log("Your inventory is full.", MessageKind::Warning);
        return Ok(TurnOutcome::Failed);
    };

    state
        .store
        .move_to(item, Location::Carried { owner: player, slot })?;
    let name = state.store.get(item)?.name.clone();
    state.log(format!("You picked up the {}!", name), MessageKind::Info);
    state.statistics.items_collected += 1;
    Ok(TurnOutcome::TurnTaken)
}

fn drop_item(state: &mut GameState, slot: usize) -> GloomResult<TurnOutcome> {
    let Some(item) = carried_item(state, slot)? else {
        state.log("You have nothing in that slot.", MessageKind::Warning);
        return Ok(TurnOutcome::Failed);
    };

    let pos = state.player_position()?;
    state.store.move_to(item, Location::Map(pos))?;
    let name = state.store.get(item)?.name.clone();
    state.log(format!("You dropped the {}.", name), MessageKind::Info);
    Ok(TurnOutcome::TurnTaken)
}

fn use_slot(state: &mut GameState, slot: usize, equip: bool) -> GloomResult<TurnOutcome> {
    let Some(item) = carried_item(state, slot)? else {
        state.log("You have nothing in that slot.", MessageKind::Warning);
        return Ok(TurnOutcome::Failed);
    };

    let result = if equip {
        crate::game::equip_item(state, item)?
    } else {
        use_item(state, item)?
    };

    Ok(match result {
        UseOutcome::Consumed | UseOutcome::Equipped => TurnOutcome::TurnTaken,
        UseOutcome::Failed => TurnOutcome::Failed,
        UseOutcome::NeedsTarget(effect) => {
            state.mode = UiMode::Targeting(effect);
            TurnOutcome::AwaitingTarget
        }
    })
}

fn descend(state: &mut GameState) -> GloomResult<TurnOutcome> {
    let pos = state.player_position()?;
    let on_stairs = state
        .store
        .all_at(pos)
        .iter()
        .any(|e| e.kind == crate::game::EntityKind::Stairs);
    if !on_stairs {
        state.log("There are no stairs here.", MessageKind::Warning);
        return Ok(TurnOutcome::Failed);
    }

    state.descend()?;
    Ok(TurnOutcome::TurnTaken)
}

/// The item in the player's inventory slot, if any. Slots past the end of
/// the inventory are simply empty.
fn carried_item(state: &GameState, slot: usize) -> GloomResult<Option<EntityId>> {
    Ok(state
        .player()?
        .inventory
        .as_ref()
        .and_then(|inventory| inventory.get(slot).copied().flatten()))
}
