//! # Display Management
//!
//! Builds a renderer-independent [`Frame`] from the game state.
//!
//! Visibility rules live here: tiles never explored are never drawn, and
//! entities only show on tiles the player currently sees, except kinds
//! flagged always-visible (stairs), which stay on explored tiles. The debug
//! reveal flag lifts both restrictions without touching exploration state.

use crate::game::{effective_max_hp, xp_to_next_level, GameState, Message, Position};
use crate::rendering::Overlay;
use crate::GloomResult;
use std::fmt::Write;

/// Number of log lines included in a frame.
pub const FRAME_MESSAGE_LINES: usize = 5;

const WALL_LIT: &str = "rgb(130,110,50)";
const WALL_DARK: &str = "rgb(0,0,100)";
const FLOOR_LIT: &str = "rgb(200,180,50)";
const FLOOR_DARK: &str = "rgb(50,50,150)";

/// One drawn map cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    /// Glyph colour (CSS-style)
    pub color: &'static str,
    /// Visibility fraction of the tile, 0 when out of sight
    pub light: f64,
}

/// Player status shown under the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub hp: i32,
    pub max_hp: i32,
    pub depth: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub turn: u64,
}

/// Everything a renderer needs to draw one screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    cells: Vec<Option<Cell>>,
    pub status: Status,
    /// Most recent messages, oldest first
    pub messages: Vec<Message>,
    pub overlay: Option<Overlay>,
}

impl Frame {
    /// Captures the current state as a frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{Frame, GameState};
    ///
    /// let state = GameState::new_game(9).unwrap();
    /// let frame = Frame::capture(&state).unwrap();
    /// let player = state.player_position().unwrap();
    /// assert_eq!(frame.cell_at(player).unwrap().glyph, '@');
    /// assert_eq!(frame.status.depth, 1);
    /// ```
    pub fn capture(state: &GameState) -> GloomResult<Frame> {
        let map = &state.map;
        let reveal = state.debug_reveal;
        let mut cells = vec![None; (map.width * map.height) as usize];

        for (pos, tile) in map.tiles() {
            if !tile.explored && !reveal {
                continue;
            }
            let light = state.light_map.get(pos);
            let lit = light > 0.0;
            let (glyph, color) = match (tile.wall, lit) {
                (true, true) => ('#', WALL_LIT),
                (true, false) => ('#', WALL_DARK),
                (false, true) => ('.', FLOOR_LIT),
                (false, false) => ('.', FLOOR_DARK),
            };
            cells[index(map.width, pos)] = Some(Cell {
                glyph,
                color,
                light,
            });
        }

        for entity in state.store.render_order() {
            let Some(pos) = entity.position() else {
                continue;
            };
            let visible = reveal
                || state.is_lit(pos)
                || (entity.traits().always_visible && map.is_explored(pos));
            if !visible || !map.in_bounds(pos) {
                continue;
            }
            if let Some(cell) = cells[index(map.width, pos)].as_mut() {
                cell.glyph = entity.traits().glyph;
                cell.color = entity.traits().color;
            }
        }

        let player = state.player()?;
        let status = Status {
            hp: player.hp.unwrap_or(0),
            max_hp: effective_max_hp(&state.store, state.player_id)?.unwrap_or(0),
            depth: map.depth,
            level: player.level,
            xp: player.xp,
            xp_to_next: xp_to_next_level(player.level),
            turn: state.turn_number,
        };

        Ok(Frame {
            width: map.width,
            height: map.height,
            cells,
            status,
            messages: state
                .messages
                .recent(FRAME_MESSAGE_LINES)
                .into_iter()
                .cloned()
                .collect(),
            overlay: Overlay::from_state(state)?,
        })
    }

    /// The drawn cell at a coordinate, if anything is drawn there.
    pub fn cell_at(&self, pos: Position) -> Option<&Cell> {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.width || pos.y as u32 >= self.height {
            return None;
        }
        self.cells[index(self.width, pos)].as_ref()
    }

    /// Renders the frame as plain text: map rows, status, messages, overlay.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height as i32 {
            let row: String = (0..self.width as i32)
                .map(|x| self.cell_at(Position::new(x, y)).map_or(' ', |c| c.glyph))
                .collect();
            out.push_str(row.trim_end());
            out.push('\n');
        }

        let s = &self.status;
        let _ = writeln!(
            out,
            "HP: {}/{}  Dungeon level: {}  Level: {}  XP: {}/{}  Turn: {}",
            s.hp, s.max_hp, s.depth, s.level, s.xp, s.xp_to_next, s.turn
        );
        for message in &self.messages {
            let _ = writeln!(out, "{}", message.text);
        }
        if let Some(overlay) = &self.overlay {
            out.push_str("--\n");
            for line in overlay.lines() {
                let _ = writeln!(out, "{}", line);
            }
        }
        out
    }
}

fn index(width: u32, pos: Position) -> usize {
    pos.y as usize * width as usize + pos.x as usize
}
