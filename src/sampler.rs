//! Uniform random sources for the noise applied to projected months.

use rand::rngs::{StdRng, ThreadRng};
use rand::{thread_rng, Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

/// Source of uniform draws in `[0, 1)`.
pub trait UniformSampler {
    fn sample(&mut self) -> f64;
}

/// Draws from a `rand` generator.
pub struct RngSampler<R: Rng> {
    rng: R,
    unit: Uniform<f64>,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            unit: Uniform::new(0.0, 1.0),
        }
    }
}

impl RngSampler<ThreadRng> {
    pub fn thread() -> Self {
        Self::new(thread_rng())
    }
}

impl RngSampler<StdRng> {
    /// Reproducible sampler for repeatable runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformSampler for RngSampler<R> {
    fn sample(&mut self) -> f64 {
        self.unit.sample(&mut self.rng)
    }
}

/// Always returns the same value. `0.5` yields zero noise.
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler(pub f64);

impl UniformSampler for FixedSampler {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed list of draws; an empty list behaves like `FixedSampler(0.5)`.
#[derive(Debug, Clone)]
pub struct SequenceSampler {
    values: Vec<f64>,
    next: usize,
}

impl SequenceSampler {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl UniformSampler for SequenceSampler {
    fn sample(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
