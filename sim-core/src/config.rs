//! Simulation-wide constants and the configuration they feed.
//!
//! Every tunable number lives here under a name. The defaults are the
//! canonical values; the alternatives are kept as named constants because
//! they were tuned by eye and are worth switching between.

use serde::Deserialize;

use crate::error::SimError;
use crate::scenario::OrbitScenario;

/// Gravitational constant in simulation units (pixels, seconds, mass units).
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 6.67408;

/// `radius = mass^(1/12)`: sub-linear so heavy bodies don't swamp the canvas.
pub const DEFAULT_RADIUS_EXPONENT: f64 = 1.0 / 12.0;

/// Flatter alternative, `radius = mass^(1/15)`.
pub const COMPACT_RADIUS_EXPONENT: f64 = 1.0 / 15.0;

/// Scale applied to the sum of radii before the devour proximity test.
pub const DEFAULT_ROCHE_COEFFICIENT: f64 = 1.0;

/// Tighter proximity scale: bodies have to overlap before devouring.
pub const TIGHT_ROCHE_COEFFICIENT: f64 = 0.88;

/// Looser proximity scale: bodies devour just before touching.
pub const LOOSE_ROCHE_COEFFICIENT: f64 = 1.0134;

/// Floor on the squared distance in the gravity sum.
pub const DEFAULT_MIN_DISTANCE_SQUARED: f64 = 1e-6;

/// Default canvas edge in pixels.
pub const DEFAULT_CANVAS_SIZE: f64 = 960.0;

/// Downward acceleration of the default [`crate::effector::Field`].
pub const STANDARD_FIELD_ACCELERATION: f64 = 9.8;

/// Configuration for a [`crate::system::ParticleSystem`].
///
/// Fixed at construction; nothing here changes in the middle of a step.
/// Missing fields fall back to [`SimConfig::default`] when deserializing.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Canvas width in pixels (off-screen culling, scenario seeding).
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Gravitational constant `G`.
    pub gravitational_constant: f64,
    /// `radius = mass^radius_exponent`.
    pub radius_exponent: f64,
    /// Devour proximity coefficient `k`.
    pub roche_coefficient: f64,
    /// Lower bound on `d²` in the gravity sum.
    pub min_distance_squared: f64,
    /// Seed for the scenario sampler; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Parameters of [`crate::system::ParticleSystem::emit_scenario`].
    pub scenario: OrbitScenario,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
            gravitational_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            radius_exponent: DEFAULT_RADIUS_EXPONENT,
            roche_coefficient: DEFAULT_ROCHE_COEFFICIENT,
            min_distance_squared: DEFAULT_MIN_DISTANCE_SQUARED,
            seed: None,
            scenario: OrbitScenario::default(),
        }
    }
}

impl SimConfig {
    /// Same configuration on a `width` × `height` canvas.
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every value for the ranges the simulation relies on.
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.width) || !positive(self.height) {
            return Err(SimError::InvalidConfig("canvas size must be positive"));
        }
        if !self.gravitational_constant.is_finite() {
            return Err(SimError::InvalidConfig("gravitational constant must be finite"));
        }
        if !positive(self.radius_exponent) {
            return Err(SimError::InvalidConfig("radius exponent must be positive"));
        }
        if !positive(self.roche_coefficient) {
            return Err(SimError::InvalidConfig("roche coefficient must be positive"));
        }
        if !positive(self.min_distance_squared) {
            return Err(SimError::InvalidConfig("minimum squared distance must be positive"));
        }
        self.scenario.validate(self.width, self.height)
    }
}
