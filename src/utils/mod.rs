//! # Utilities Module
//!
//! Randomness, field-of-view and level-scaling helpers shared by the generator
//! and the turn engine.

pub mod fov;
pub mod math;
pub mod random;

pub use fov::*;
pub use math::*;
pub use random::*;
