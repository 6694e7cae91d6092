//! Deterministic, tick-synchronised random number source.
//!
//! Every random choice in the simulation (navigation targets, spawn points,
//! NPC waypoints) draws from the single [`DeterministicRng`] resource so that
//! replicated runs with the same seed make identical choices.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::numeric::{index_from_u32, saturating_len_u32};

/// Seeded xorshift32 generator stored as a world resource.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u32,
}

impl DeterministicRng {
    /// Creates a generator from `seed`. A zero seed is replaced by one, since
    /// xorshift never leaves the all-zero state.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Returns the raw next value of the sequence.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns an integer in `[min, max)`. Returns `min` for empty ranges.
    ///
    /// # Examples
    /// ```
    /// use kcc_sim::DeterministicRng;
    /// let mut rng = DeterministicRng::new(7);
    /// let value = rng.next(2, 5);
    /// assert!((2..5).contains(&value));
    /// ```
    pub fn next(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i128::from(max) - i128::from(min);
        let scaled = (i128::from(self.next_u32()) * span) >> 32;
        i32::try_from(i128::from(min) + scaled).unwrap_or(min)
    }

    /// Returns a uniformly chosen index into a collection of `len` items.
    pub fn next_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let span = u64::from(saturating_len_u32(len));
        let scaled = (u64::from(self.next_u32()) * span) >> 32;
        let index = index_from_u32(u32::try_from(scaled).unwrap_or(0));
        Some(index)
    }

    /// Picks a uniformly random element of `items`.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.next_index(items.len()).and_then(|index| items.get(index))
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(crate::DEFAULT_RNG_SEED)
    }
}
