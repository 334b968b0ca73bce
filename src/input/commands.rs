//! # Command Definitions
//!
//! Action tokens produced by input handling and consumed by the turn engine.

use crate::game::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an open inventory overlay will do with the chosen item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryPurpose {
    Use,
    Drop,
    Equip,
}

impl InventoryPurpose {
    /// Overlay title for this purpose.
    pub fn title(self) -> &'static str {
        match self {
            InventoryPurpose::Use => "Select an item to use",
            InventoryPurpose::Drop => "Select an item to drop",
            InventoryPurpose::Equip => "Select an item to equip",
        }
    }
}

/// Stat raised when the player levels up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeChoice {
    /// +20 maximum and current hit points
    Hp,
    /// +1 power
    Power,
    /// +1 defense
    Defense,
}

impl UpgradeChoice {
    /// Every choice, in menu order.
    pub const ALL: [UpgradeChoice; 3] = [
        UpgradeChoice::Hp,
        UpgradeChoice::Power,
        UpgradeChoice::Defense,
    ];

    /// Key that picks this choice in the level-up menu.
    pub fn key(self) -> &'static str {
        match self {
            UpgradeChoice::Hp => "a",
            UpgradeChoice::Power => "b",
            UpgradeChoice::Defense => "c",
        }
    }
}

/// A single player action token.
///
/// Slot numbers index the player's inventory array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step by a delta; `(0, 0)` waits a turn
    Move { dx: i32, dy: i32 },
    PickUp,
    Drop(usize),
    Use(usize),
    Equip(usize),
    Descend,
    OpenInventory(InventoryPurpose),
    OpenCharacter,
    /// Close any overlay or abandon targeting
    Cancel,
    /// Supply the tile a pending effect is waiting for
    Target(Position),
    Upgrade(UpgradeChoice),
    Save,
    Load,
    ToggleDebug,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { dx, dy } => write!(f, "move({dx}, {dy})"),
            Action::PickUp => write!(f, "pick up"),
            Action::Drop(slot) => write!(f, "drop slot {slot}"),
            Action::Use(slot) => write!(f, "use slot {slot}"),
            Action::Equip(slot) => write!(f, "equip slot {slot}"),
            Action::Descend => write!(f, "descend"),
            Action::OpenInventory(purpose) => write!(f, "open inventory ({purpose:?})"),
            Action::OpenCharacter => write!(f, "open character sheet"),
            Action::Cancel => write!(f, "cancel"),
            Action::Target(pos) => write!(f, "target {pos}"),
            Action::Upgrade(choice) => write!(f, "upgrade {choice:?}"),
            Action::Save => write!(f, "save"),
            Action::Load => write!(f, "load"),
            Action::ToggleDebug => write!(f, "toggle debug"),
        }
    }
}
