//! Seeding a rough orbital disk around a fixed central mass.
//!
//! Bodies get a tangential velocity with a normally distributed speed.
//! That is not an exact circular orbit, but it settles into a visually
//! stable swirl without solving for each body's orbital speed.

use std::f64::consts::FRAC_PI_2;

use rand::Rng;
use serde::Deserialize;

use crate::color::Color;
use crate::error::SimError;
use crate::particle::Particle;
use crate::sampler::RandomSampler;
use crate::types::Vector2;
use crate::vector::Vector2Ext;

/// Parameters of the orbit-disk scenario.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitScenario {
    /// Gap between the disk edge and the nearest canvas edge, in pixels.
    pub margin: f64,
    /// Mean of the orbital speed distribution.
    pub orbit_speed_mean: f64,
    /// Standard deviation of the orbital speed distribution.
    pub orbit_speed_scale: f64,
    /// Body masses are uniform in `[min_body_mass, max_body_mass)`.
    pub min_body_mass: f64,
    pub max_body_mass: f64,
}

impl Default for OrbitScenario {
    fn default() -> Self {
        Self {
            margin: 50.0,
            orbit_speed_mean: 400.0,
            orbit_speed_scale: 200.0,
            min_body_mass: 10.0,
            max_body_mass: 1000.0,
        }
    }
}

impl OrbitScenario {
    /// Radius of the seeding disk on a `width` × `height` canvas.
    pub fn disk_radius(&self, width: f64, height: f64) -> f64 {
        width.min(height) / 2.0 - self.margin
    }

    pub fn validate(&self, width: f64, height: f64) -> Result<(), SimError> {
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(SimError::InvalidConfig("scenario margin must be non-negative"));
        }
        if self.disk_radius(width, height) <= 0.0 {
            return Err(SimError::InvalidConfig("scenario margin leaves no room for the disk"));
        }
        if !(self.orbit_speed_mean.is_finite() && self.orbit_speed_scale.is_finite()) {
            return Err(SimError::InvalidConfig("orbit speed parameters must be finite"));
        }
        if !(self.min_body_mass.is_finite() && self.min_body_mass > 0.0) {
            return Err(SimError::InvalidConfig("minimum body mass must be positive"));
        }
        if !(self.max_body_mass.is_finite() && self.max_body_mass >= self.min_body_mass) {
            return Err(SimError::InvalidConfig("maximum body mass must not be below the minimum"));
        }
        Ok(())
    }

    /// Builds the central anchor followed by `count` orbiting bodies.
    ///
    /// The anchor is an invisible stasis body of mass `center_mass` at the
    /// canvas centre. Every body is framed by the canvas for off-screen
    /// checks.
    pub fn generate<R: Rng>(
        &self,
        width: f64,
        height: f64,
        count: usize,
        center_mass: f64,
        sampler: &mut RandomSampler<R>,
    ) -> Vec<Particle> {
        let center = Vector2::new(width / 2.0, height / 2.0);
        let radius = self.disk_radius(width, height);

        let mut bodies = Vec::with_capacity(count + 1);
        bodies.push(Particle::anchor(center, Color::RED, center_mass).with_bounds(width, height));

        for _ in 0..count {
            // Resample until the tangent is defined.
            let (position, direction) = loop {
                let p = random_in_disk(sampler, center, radius);
                if let Some(dir) = tangent_direction(center, p) {
                    break (p, dir);
                }
            };

            let speed = sampler.normal(self.orbit_speed_mean, self.orbit_speed_scale);
            let color = Color::random(sampler);
            let mass = sampler.uniform(self.min_body_mass, self.max_body_mass);

            bodies.push(
                Particle::new(position, direction * speed, color, mass).with_bounds(width, height),
            );
        }

        bodies
    }
}

/// Point inside the disk of `radius` around `center`.
///
/// `x` is uniform across the diameter, then `y` is uniform across the
/// chord at that `x`.
pub fn random_in_disk<R: Rng>(
    sampler: &mut RandomSampler<R>,
    center: Vector2,
    radius: f64,
) -> Vector2 {
    let x = sampler.uniform(center.x - radius, center.x + radius);
    let dx = x - center.x;
    let half_chord = (radius * radius - dx * dx).max(0.0).sqrt();
    let y = sampler.uniform(center.y - half_chord, center.y + half_chord);
    Vector2::new(x, y)
}

/// Unit vector perpendicular to the line from `position` to `center`.
///
/// `None` when the two coincide and the direction is undefined.
pub fn tangent_direction(center: Vector2, position: Vector2) -> Option<Vector2> {
    let radial = center - position;
    if radial.length_squared() == 0.0 {
        return None;
    }
    Some(radial.rotate_about(FRAC_PI_2, Vector2::ZERO).normalize())
}
