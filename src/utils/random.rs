//! # Random Source
//!
//! Uniform integer sampling over inclusive ranges.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniform random integers.
pub trait RandomSource {
    /// Returns an integer in `min..=max`. The bounds may be given in either order.
    fn random_int(&mut self, min: i32, max: i32) -> i32;
}

impl RandomSource for StdRng {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        self.gen_range(low..=high)
    }
}

/// Creates a reproducible random source from a seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Replays a fixed sequence of values.
///
/// Each value is clamped into the requested range. Once the script runs out
/// every draw returns the lower bound.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<i32>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        match self.values.pop_front() {
            Some(value) => value.clamp(low, high),
            None => low,
        }
    }
}
