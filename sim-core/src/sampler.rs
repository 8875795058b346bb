//! Random sampling used for scenario generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Uniform and normal sampling on top of any [`Rng`].
///
/// Normal values come from the trigonometric Box–Muller transform, which
/// yields two independent standard-normal values per evaluation. The
/// second one is parked in a single-slot cache and handed out on the next
/// call, so only every other call pays for `ln`, `sqrt` and `sin_cos`.
/// The cache belongs to this instance alone.
#[derive(Debug, Clone)]
pub struct RandomSampler<R = StdRng> {
    rng: R,
    cached: Option<f64>,
}

impl RandomSampler<StdRng> {
    /// Deterministic sampler: the same seed always yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, cached: None }
    }

    /// Uniform draw in `[lower, upper)`.
    #[inline]
    pub fn uniform(&mut self, lower: f64, upper: f64) -> f64 {
        lower + (upper - lower) * self.rng.random::<f64>()
    }

    /// Standard-normal draw (mean 0, standard deviation 1).
    pub fn standard_normal(&mut self) -> f64 {
        if let Some(z) = self.cached.take() {
            return z;
        }

        // `1 - u` maps [0, 1) onto (0, 1], keeping `ln` finite.
        let u = 1.0 - self.rng.random::<f64>();
        let v = self.rng.random::<f64>();
        let r = (-2.0 * u.ln()).sqrt();
        let (sin, cos) = (TAU * v).sin_cos();

        self.cached = Some(r * sin);
        r * cos
    }

    /// Normal draw: a standard-normal value scaled by `scale` and shifted
    /// by `mean`.
    #[inline]
    pub fn normal(&mut self, mean: f64, scale: f64) -> f64 {
        self.standard_normal() * scale + mean
    }

    /// Drops the cached half of the last Box–Muller pair.
    pub fn reset(&mut self) {
        self.cached = None;
    }

    pub fn has_cached(&self) -> bool {
        self.cached.is_some()
    }
}
