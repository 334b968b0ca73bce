//! # Random Source
//!
//! Seeded, save/restorable random number generation.
//!
//! Every random decision in the game (dungeon layout, population, monster
//! steps) draws from one [`GameRng`]. Its full internal state can be captured
//! with [`GameRng::state`] and put back with [`GameRng::set_state`], which is
//! what makes a loaded game continue exactly like the saved one would have.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

/// Captured internal state of a [`GameRng`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState(Pcg64);

/// The game's shared random source.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: Pcg64,
}

impl GameRng {
    /// Creates a generator from a seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::GameRng;
    ///
    /// let mut a = GameRng::new(7);
    /// let mut b = GameRng::new(7);
    /// assert_eq!(a.uniform_int(0, 100), b.uniform_int(0, 100));
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64::seed_from_u64(seed),
        }
    }

    /// Rebuilds a generator from a captured state.
    pub fn from_state(state: RngState) -> Self {
        Self { inner: state.0 }
    }

    /// Returns a uniformly distributed integer in `lo..=hi`.
    ///
    /// A degenerate range (`hi <= lo`) returns `lo` without consuming randomness.
    pub fn uniform_int(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// Returns true with probability `p`, clamped to `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::GameRng;
    ///
    /// let mut rng = GameRng::new(4);
    /// assert!(rng.chance(1.0));
    /// assert!(!rng.chance(0.0));
    /// ```
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen_bool(p.max(0.0).min(1.0))
    }

    /// Picks one option with probability proportional to its weight.
    ///
    /// Options with weight 0 are never picked. Returns `None` when every
    /// weight is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::GameRng;
    ///
    /// let mut rng = GameRng::new(1);
    /// assert_eq!(rng.weighted_choice(&[("never", 0), ("always", 5)]), Some("always"));
    /// assert_eq!(rng.weighted_choice::<&str>(&[]), None);
    /// ```
    pub fn weighted_choice<T: Clone>(&mut self, options: &[(T, u32)]) -> Option<T> {
        let total: u32 = options.iter().map(|(_, weight)| *weight).sum();
        if total == 0 {
            return None;
        }

        let mut roll = self.inner.gen_range(0..total);
        for (option, weight) in options {
            if roll < *weight {
                return Some(option.clone());
            }
            roll -= weight;
        }
        None
    }

    /// Captures the generator's internal state.
    pub fn state(&self) -> RngState {
        RngState(self.inner.clone())
    }

    /// Restores a previously captured state.
    pub fn set_state(&mut self, state: RngState) {
        self.inner = state.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_int_stays_in_range() {
        let mut rng = GameRng::new(12345);
        for _ in 0..1000 {
            let value = rng.uniform_int(-1, 1);
            assert!((-1..=1).contains(&value));
        }
    }

    #[test]
    fn test_degenerate_range_returns_low_bound() {
        let mut rng = GameRng::new(12345);
        assert_eq!(rng.uniform_int(4, 4), 4);
        assert_eq!(rng.uniform_int(4, 2), 4);
    }

    #[test]
    fn test_state_round_trip_repeats_draws() {
        let mut rng = GameRng::new(99);
        rng.uniform_int(0, 10);

        let saved = rng.state();
        let first: Vec<i32> = (0..20).map(|_| rng.uniform_int(0, 1000)).collect();

        rng.set_state(saved.clone());
        let second: Vec<i32> = (0..20).map(|_| rng.uniform_int(0, 1000)).collect();
        assert_eq!(first, second);

        let mut rebuilt = GameRng::from_state(saved);
        let third: Vec<i32> = (0..20).map(|_| rebuilt.uniform_int(0, 1000)).collect();
        assert_eq!(first, third);
    }

    #[test]
    fn test_state_survives_json() {
        let mut rng = GameRng::new(5);
        let json = serde_json::to_string(&rng.state()).unwrap();
        let restored: RngState = serde_json::from_str(&json).unwrap();

        let mut other = GameRng::from_state(restored);
        assert_eq!(rng.uniform_int(0, 1_000_000), other.uniform_int(0, 1_000_000));
    }

    #[test]
    fn test_chance_follows_probability() {
        let mut rng = GameRng::new(17);
        let hits = (0..1000).filter(|_| rng.chance(0.25)).count();
        assert!((150..350).contains(&hits), "{hits} hits out of 1000");
        assert!((0..50).all(|_| !rng.chance(-1.0)));
        assert!((0..50).all(|_| rng.chance(2.0)));
    }

    #[test]
    fn test_weighted_choice_respects_weights() {
        let mut rng = GameRng::new(3);
        let mut heavy = 0;
        for _ in 0..1000 {
            if rng.weighted_choice(&[("heavy", 90), ("light", 10)]) == Some("heavy") {
                heavy += 1;
            }
        }
        assert!(heavy > 800, "heavy option picked only {heavy} times");
    }
}
