//! Injectable random source
//!
//! Every random decision in the simulation (spawn sizes, lanes, jitter, drop
//! rolls, upgrade picks, cosmetic scatter) goes through `RandomSource`, so a
//! run can be seeded for reproducibility and tests can script exact outcomes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform samples in [0, 1)
pub trait RandomSource {
    /// Next uniform sample in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Uniform sample in [min, max)
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform index in [0, len); 0 when `len` is 0
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }
}

/// Seeded PCG generator (the default source)
#[derive(Debug, Clone)]
pub struct PcgRandom {
    rng: Pcg32,
}

impl PcgRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Scripted source that replays a fixed sequence of samples, cycling
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedRandom {
    /// Replays `values` in order; an empty list behaves like a constant 0.0
    pub fn new(values: Vec<f32>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Always returns the same sample
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

/// Pick an index by cumulative-probability sampling over `weights`
///
/// Weights need not sum to 1. Non-positive weights are never picked unless
/// every weight is non-positive, in which case index 0 is returned.
pub fn weighted_index(rng: &mut dyn RandomSource, weights: &[f32]) -> usize {
    let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return 0;
    }
    let roll = rng.next_f32() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = i;
        if roll < cumulative {
            return i;
        }
    }
    // Float rounding can leave roll == total
    last_positive
}
