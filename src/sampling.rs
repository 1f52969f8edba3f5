//! Index sampling used to seed and re-seed centroids
//!
//! The engine never touches a global random source. Callers pass an
//! [`IndexSampler`], which keeps runs reproducible whenever the sampler is.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly drawn point indices.
pub trait IndexSampler {
    /// Return an index in `0..len`. `len` is always at least 1.
    fn sample_index(&mut self, len: usize) -> usize;
}

impl<S: IndexSampler + ?Sized> IndexSampler for &mut S {
    fn sample_index(&mut self, len: usize) -> usize {
        (**self).sample_index(len)
    }
}

/// Uniform sampling with replacement backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomSampler<R> {
    rng: R,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RandomSampler<StdRng> {
    /// Reproducible sampler for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> IndexSampler for RandomSampler<R> {
    fn sample_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed sequence of indices, wrapping around when exhausted.
///
/// Each scripted value is reduced modulo the requested length, so any script
/// is valid for any point set. An empty script always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedSampler {
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// Number of indices handed out so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl IndexSampler for ScriptedSampler {
    fn sample_index(&mut self, len: usize) -> usize {
        let value = match self.script.len() {
            0 => 0,
            n => self.script[self.cursor % n],
        };
        self.cursor += 1;
        value % len
    }
}
