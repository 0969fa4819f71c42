//! The single random primitive every stochastic decision goes through.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform integer in `min..=max`. Returns `min` when the range is empty.
    fn range(&mut self, min: i32, max: i32) -> i32;
}

/// ChaCha8-backed source; the same seed replays the same decisions.
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRandom {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        let offset = self.rng.next_u64() % span;
        (i64::from(min) + offset as i64) as i32
    }
}

/// Replays a fixed script of values, clamped into each requested range, then
/// keeps answering `min`. Meant for tests that need exact control over choices.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    script: VecDeque<i32>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self { script: values.into_iter().collect() }
    }
}

impl RandomSource for ScriptedRandom {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        match self.script.pop_front() {
            Some(value) => value.clamp(min, max.max(min)),
            None => min,
        }
    }
}
