//! # Input Module
//!
//! Input handling and command parsing for player interactions.
//!
//! Mapping input to an action is a pure function of the current UI mode and
//! the key or click; applying the action is the turn engine's job.

pub mod commands;

pub use commands::*;

use crate::game::{Position, UiMode};
use crate::{GloomError, GloomResult};

/// A discrete input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A named key: single characters (`"h"`, `">"`) or names such as
    /// `"ArrowUp"`, `"Escape"`
    Key(String),
    /// A pointer click on a map tile
    Click(Position),
}

impl Input {
    /// Shorthand for a key input.
    pub fn key(name: &str) -> Self {
        Input::Key(name.to_string())
    }

    /// Parses a text token: `@x,y` is a click on that tile, anything else a
    /// key name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{Input, Position};
    ///
    /// assert_eq!(Input::parse("@6,3").unwrap(), Input::Click(Position::new(6, 3)));
    /// assert_eq!(Input::parse("Escape").unwrap(), Input::key("Escape"));
    /// ```
    pub fn parse(token: &str) -> GloomResult<Self> {
        let Some(coords) = token.strip_prefix('@') else {
            return Ok(Input::key(token));
        };

        let invalid = || GloomError::InvalidAction(format!("Bad click token '{}'", token));
        let (x, y) = coords.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Input::Click(Position::new(x, y)))
    }
}

/// Input handler for processing player commands.
///
/// Converts keys and clicks into action tokens for the current UI mode.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjklyubn)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{Action, Input, InputHandler, UiMode};
    ///
    /// let handler = InputHandler::new();
    /// assert_eq!(
    ///     handler.key_to_action(&UiMode::Normal, &Input::key("l")),
    ///     Some(Action::Move { dx: 1, dy: 0 })
    /// );
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Maps an input to an action for the given mode. Unbound inputs map to
    /// `None`.
    pub fn key_to_action(&self, mode: &UiMode, input: &Input) -> Option<Action> {
        match mode {
            UiMode::Normal => match input {
                Input::Key(key) => self.normal_key(key),
                Input::Click(_) => None,
            },
            UiMode::Inventory(purpose) => match input {
                Input::Key(key) if key == "Escape" => Some(Action::Cancel),
                Input::Key(key) => letter_slot(key).map(|slot| match purpose {
                    InventoryPurpose::Use => Action::Use(slot),
                    InventoryPurpose::Drop => Action::Drop(slot),
                    InventoryPurpose::Equip => Action::Equip(slot),
                }),
                Input::Click(_) => None,
            },
            UiMode::Targeting(_) => match input {
                Input::Click(pos) => Some(Action::Target(*pos)),
                Input::Key(key) if key == "Escape" => Some(Action::Cancel),
                Input::Key(_) => None,
            },
            UiMode::Character => match input {
                Input::Key(key) if key == "Escape" || key == "c" => Some(Action::Cancel),
                _ => None,
            },
            UiMode::Upgrade => match input {
                Input::Key(key) => UpgradeChoice::ALL
                    .into_iter()
                    .find(|choice| choice.key() == key.as_str())
                    .map(Action::Upgrade),
                Input::Click(_) => None,
            },
            UiMode::Dead => match input {
                Input::Key(key) if key == "L" => Some(Action::Load),
                _ => None,
            },
        }
    }

    fn normal_key(&self, key: &str) -> Option<Action> {
        if let Some((dx, dy)) = self.movement_delta(key) {
            return Some(Action::Move { dx, dy });
        }

        match key {
            "g" | "," => Some(Action::PickUp),
            "i" => Some(Action::OpenInventory(InventoryPurpose::Use)),
            "d" => Some(Action::OpenInventory(InventoryPurpose::Drop)),
            "e" => Some(Action::OpenInventory(InventoryPurpose::Equip)),
            ">" => Some(Action::Descend),
            "c" => Some(Action::OpenCharacter),
            "S" => Some(Action::Save),
            "L" => Some(Action::Load),
            "`" => Some(Action::ToggleDebug),
            "Escape" => Some(Action::Cancel),
            _ => None,
        }
    }

    fn movement_delta(&self, key: &str) -> Option<(i32, i32)> {
        let delta = match key {
            "ArrowUp" => (0, -1),
            "ArrowDown" => (0, 1),
            "ArrowLeft" => (-1, 0),
            "ArrowRight" => (1, 0),
            "." | "5" => (0, 0),
            _ => return self.vi_delta(key),
        };
        Some(delta)
    }

    fn vi_delta(&self, key: &str) -> Option<(i32, i32)> {
        if !self.vi_keys_enabled {
            return None;
        }
        match key {
            "h" => Some((-1, 0)),
            "j" => Some((0, 1)),
            "k" => Some((0, -1)),
            "l" => Some((1, 0)),
            "y" => Some((-1, -1)),
            "u" => Some((1, -1)),
            "b" => Some((-1, 1)),
            "n" => Some((1, 1)),
            _ => None,
        }
    }
}

/// Maps an input to an action using the default key bindings.
pub fn key_to_action(mode: &UiMode, input: &Input) -> Option<Action> {
    InputHandler::new().key_to_action(mode, input)
}

/// Converts an inventory letter (`a`..`z`) to a slot index.
pub fn letter_slot(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'a'..='z'), None) => Some((c as u8 - b'a') as usize),
        _ => None,
    }
}

/// Converts a slot index to its inventory letter.
pub fn slot_letter(slot: usize) -> char {
    (b'a' + (slot % 26) as u8) as char
}
