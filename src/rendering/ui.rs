//! # User Interface Elements
//!
//! Overlays drawn on top of the map: inventory menus, the targeting prompt,
//! the character sheet, the level-up menu and one-off notices.

use crate::game::{
    effective_defense, effective_max_hp, effective_power, xp_to_next_level, GameState, UiMode,
};
use crate::config::LEVEL_UP_HP_BONUS;
use crate::input::{slot_letter, UpgradeChoice};
use crate::GloomResult;

/// The overlay currently shown over the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Item menu; one `(letter) name` line per filled slot
    Inventory {
        title: &'static str,
        entries: Vec<String>,
    },
    /// Waiting for a tile
    Targeting { prompt: String },
    /// Character sheet
    Character {
        level: u32,
        xp: u32,
        xp_to_next: u32,
        max_hp: i32,
        power: i32,
        defense: i32,
        equipped: Vec<String>,
    },
    /// Level-up stat choice
    Upgrade { options: Vec<String> },
    /// Plain message box
    Notice(String),
}

impl Overlay {
    /// Builds the overlay for the state's current mode, if it has one.
    ///
    /// A pending notice wins over every mode.
    pub fn from_state(state: &GameState) -> GloomResult<Option<Overlay>> {
        if let Some(notice) = &state.notice {
            return Ok(Some(Overlay::Notice(notice.clone())));
        }

        let player_id = state.player_id;
        let overlay = match state.mode {
            UiMode::Normal => None,
            UiMode::Inventory(purpose) => {
                let mut entries = Vec::new();
                for (slot, item) in state.store.inventory_items(player_id)? {
                    let name = &state.store.get(item)?.name;
                    entries.push(format!("({}) {}", slot_letter(slot), name));
                }
                Some(Overlay::Inventory {
                    title: purpose.title(),
                    entries,
                })
            }
            UiMode::Targeting(_) => Some(Overlay::Targeting {
                prompt: "Select a target location.".to_string(),
            }),
            UiMode::Character => {
                let player = state.player()?;
                let equipped = state
                    .store
                    .equipped_items(player_id)?
                    .iter()
                    .map(|item| {
                        let slot = item
                            .traits()
                            .equip_slot
                            .map(|s| s.label())
                            .unwrap_or("gear");
                        format!("{}: {}", slot, item.name)
                    })
                    .collect();
                Some(Overlay::Character {
                    level: player.level,
                    xp: player.xp,
                    xp_to_next: xp_to_next_level(player.level),
                    max_hp: effective_max_hp(&state.store, player_id)?.unwrap_or(0),
                    power: effective_power(&state.store, player_id)?,
                    defense: effective_defense(&state.store, player_id)?,
                    equipped,
                })
            }
            UiMode::Upgrade => {
                let player = state.player()?;
                let options = UpgradeChoice::ALL
                    .into_iter()
                    .map(|choice| {
                        let text = match choice {
                            UpgradeChoice::Hp => format!(
                                "Constitution (+{} HP, from {})",
                                LEVEL_UP_HP_BONUS,
                                player.base_max_hp.unwrap_or(0)
                            ),
                            UpgradeChoice::Power => {
                                format!("Strength (+1 attack, from {})", player.base_power)
                            }
                            UpgradeChoice::Defense => {
                                format!("Agility (+1 defense, from {})", player.base_defense)
                            }
                        };
                        format!("({}) {}", choice.key(), text)
                    })
                    .collect();
                Some(Overlay::Upgrade { options })
            }
            UiMode::Dead => Some(Overlay::Notice(
                "You died! Press L to load your last save.".to_string(),
            )),
        };
        Ok(overlay)
    }

    /// Text lines of the overlay, title first.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Overlay::Inventory { title, entries } => {
                let mut lines = vec![title.to_string()];
                if entries.is_empty() {
                    lines.push("(Empty)".to_string());
                } else {
                    lines.extend(entries.iter().cloned());
                }
                lines
            }
            Overlay::Targeting { prompt } => vec![prompt.clone()],
            Overlay::Character {
                level,
                xp,
                xp_to_next,
                max_hp,
                power,
                defense,
                equipped,
            } => {
                let mut lines = vec![
                    "Character Information".to_string(),
                    format!("Level: {}", level),
                    format!("XP: {}", xp),
                    format!("XP for next Level: {}", xp_to_next),
                    format!("Max HP: {}", max_hp),
                    format!("Attack: {}", power),
                    format!("Defense: {}", defense),
                ];
                lines.extend(equipped.iter().cloned());
                lines
            }
            Overlay::Upgrade { options } => {
                let mut lines = vec!["Level Up! Select an attribute to increase.".to_string()];
                lines.extend(options.iter().cloned());
                lines
            }
            Overlay::Notice(text) => vec![text.clone()],
        }
    }
}
