//! Per-step forces and constraints applied to each particle.
//!
//! An effector only ever touches a particle's velocity. The system applies
//! every registered effector to every particle, in registration order,
//! before resolving collisions and gravity.

use std::fmt;

use crate::config::STANDARD_FIELD_ACCELERATION;
use crate::particle::Particle;
use crate::types::Vector2;

/// A force or constraint acting on one particle at a time.
pub trait Effector {
    fn apply(&self, particle: &mut Particle);
}

/// Axis-aligned reflecting box.
///
/// When a particle's bounding circle crosses a wall, the velocity
/// component along that axis is negated and scaled by `restitution`.
/// Positions are left alone: a body may sit past the wall until the next
/// integration carries it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChamberBox {
    pub min: Vector2,
    pub max: Vector2,
    /// `1` is elastic, below `1` loses energy, above `1` gains it.
    pub restitution: f64,
}

impl ChamberBox {
    /// Elastic box spanning `(x1, y1)`–`(x2, y2)`.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min: Vector2::new(x1, y1),
            max: Vector2::new(x2, y2),
            restitution: 1.0,
        }
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }
}

impl Effector for ChamberBox {
    fn apply(&self, particle: &mut Particle) {
        let p = particle.position;
        let r = particle.radius();

        if p.x - r < self.min.x || p.x + r > self.max.x {
            particle.velocity.x = -self.restitution * particle.velocity.x;
        }
        if p.y - r < self.min.y || p.y + r > self.max.y {
            particle.velocity.y = -self.restitution * particle.velocity.y;
        }
    }
}

type FieldFn = Box<dyn Fn(Vector2) -> Vector2 + Send + Sync>;

/// Acceleration field sampled at each particle's position.
///
/// Adds `acceleration(position) * dt` to the velocity every step. `dt` is
/// fixed when the field is built and is not the `dt` passed to
/// [`crate::system::ParticleSystem::simulate`]; build the field with the
/// same step the host simulates with, or its push drifts out of step with
/// the integrator.
pub struct Field {
    dt: f64,
    acceleration: FieldFn,
}

impl Field {
    pub fn new<F>(dt: f64, acceleration: F) -> Self
    where
        F: Fn(Vector2) -> Vector2 + Send + Sync + 'static,
    {
        Self {
            dt,
            acceleration: Box::new(acceleration),
        }
    }

    /// Same acceleration everywhere.
    pub fn uniform(dt: f64, acceleration: Vector2) -> Self {
        Self::new(dt, move |_| acceleration)
    }

    /// Constant pull towards the bottom of the screen (y-down).
    pub fn downward(dt: f64) -> Self {
        Self::uniform(dt, Vector2::new(0.0, STANDARD_FIELD_ACCELERATION))
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("dt", &self.dt).finish_non_exhaustive()
    }
}

impl Effector for Field {
    fn apply(&self, particle: &mut Particle) {
        particle.velocity += (self.acceleration)(particle.position) * self.dt;
    }
}
