//! Random number generation for level building
//!
//! Uses a seeded ChaCha RNG so a (seed, config) pair always yields the same level.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generation random number generator
///
/// Wraps ChaCha8Rng. Every generation step takes it by `&mut` so draws are
/// consumed in a fixed order.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1, or 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform draw in `lo..=hi`. A reversed range collapses to `lo`.
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Bernoulli trial: true with probability `p` (clamped to 0..=1).
    ///
    /// `chance(1.0)` is always true and `chance(0.0)` always false.
    pub fn chance(&mut self, p: f32) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.rng.gen_bool(f64::from(p))
    }

    /// Uniform sign, `1.0` or `-1.0`.
    pub fn sign(&mut self) -> f32 {
        if self.rn2(2) == 0 { 1.0 } else { -1.0 }
    }

    /// Uniform float in `lo..hi`. An empty range returns `lo`.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Weighted index draw. `None` when the weights are empty, negative or all zero.
    pub fn weighted_index(&mut self, weights: &[f32]) -> Option<usize> {
        let dist = WeightedIndex::<f32>::new(weights).ok()?;
        Some(dist.sample(&mut self.rng))
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rn2(items.len() as u32) as usize])
        }
    }
}
