//! # Rendering Module
//!
//! Renderer-independent screen description.
//!
//! The core never draws anything itself. [`Frame::capture`] turns the game
//! state into cells, a status line, the message tail and the active overlay,
//! and [`Frame::to_text`] gives a plain text dump for terminals and tests.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
