//! A single point-mass body and the pairwise rules between bodies.

use crate::color::Color;
use crate::config::{DEFAULT_CANVAS_SIZE, DEFAULT_RADIUS_EXPONENT};
use crate::error::SimError;
use crate::types::Vector2;

/// Radius of a body of the given mass: `mass^exponent`.
#[inline]
pub fn mass_to_radius(mass: f64, exponent: f64) -> f64 {
    mass.powf(exponent)
}

/// Squared distance between the centres of two bodies.
#[inline]
pub fn distance_squared(a: &Particle, b: &Particle) -> f64 {
    a.position.distance_squared(b.position)
}

/// Squared devour threshold: `((ra + rb) * k)²`.
#[inline]
pub fn roche_limit_squared(a: &Particle, b: &Particle, k: f64) -> f64 {
    let reach = (a.radius + b.radius) * k;
    reach * reach
}

/// A mutable physical body.
///
/// `mass`, `radius` and the tombstone flag are private: mass only changes
/// through [`Particle::devour`], which recomputes the radius in the same
/// call, so the two never disagree.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    pub color: Color,

    mass: f64,
    radius: f64,
    radius_exponent: f64,

    /// Immovable and immune to every force.
    pub stasis: bool,
    /// Skipped by rendering, still simulated.
    pub visible: bool,
    /// UI selection; the simulation never reads it.
    pub is_selected: bool,

    dead: bool,

    /// Frame used by [`Particle::out_of_screen`].
    pub bounds_width: f64,
    pub bounds_height: f64,
}

impl Particle {
    pub fn new(position: Vector2, velocity: Vector2, color: Color, mass: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2::ZERO,
            color,
            mass,
            radius: mass_to_radius(mass, DEFAULT_RADIUS_EXPONENT),
            radius_exponent: DEFAULT_RADIUS_EXPONENT,
            stasis: false,
            visible: true,
            is_selected: false,
            dead: false,
            bounds_width: DEFAULT_CANVAS_SIZE,
            bounds_height: DEFAULT_CANVAS_SIZE,
        }
    }

    /// Invisible, stationary body in stasis: a fixed central mass.
    pub fn anchor(position: Vector2, color: Color, mass: f64) -> Self {
        let mut p = Self::new(position, Vector2::ZERO, color, mass).with_stasis(true);
        p.visible = false;
        p
    }

    pub fn with_stasis(mut self, stasis: bool) -> Self {
        self.stasis = stasis;
        self
    }

    pub fn with_bounds(mut self, width: f64, height: f64) -> Self {
        self.bounds_width = width;
        self.bounds_height = height;
        self
    }

    /// Switches the mass→radius mapping and recomputes the radius.
    pub fn with_radius_exponent(mut self, exponent: f64) -> Self {
        self.set_radius_exponent(exponent);
        self
    }

    pub(crate) fn set_radius_exponent(&mut self, exponent: f64) {
        self.radius_exponent = exponent;
        self.radius = mass_to_radius(self.mass, exponent);
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn radius_exponent(&self) -> f64 {
        self.radius_exponent
    }

    /// `true` once this body has been devoured and awaits removal.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[inline]
    pub fn momentum(&self) -> Vector2 {
        self.velocity * self.mass
    }

    /// Rejects bodies that would corrupt later steps.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SimError::InvalidMass(self.mass));
        }
        for (field, v) in [("position", self.position), ("velocity", self.velocity)] {
            if !v.is_finite() {
                return Err(SimError::NonFinite { field, x: v.x, y: v.y });
            }
        }
        Ok(())
    }

    /// Absorbs `other` if it is strictly lighter and both are alive.
    ///
    /// Momentum is conserved: `v' = (m1 v1 + m2 v2) / (m1 + m2)`. The
    /// masses add, the radius follows, the colors blend and `other` is
    /// tombstoned. Calling it on the lighter body is a no-op, so checking
    /// both orderings of a pair never counts a merge twice.
    ///
    /// Returns whether the merge happened.
    pub fn devour(&mut self, other: &mut Particle) -> bool {
        if other.mass >= self.mass || self.dead || other.dead {
            return false;
        }

        let total = self.mass + other.mass;
        self.velocity = (self.momentum() + other.momentum()) / total;
        self.mass = total;
        self.radius = mass_to_radius(self.mass, self.radius_exponent);
        self.color = self.color.blend(other.color);
        other.dead = true;
        true
    }

    /// `true` when the bounding circle lies entirely outside the frame on
    /// either axis. Only used to skip drawing.
    pub fn out_of_screen(&self) -> bool {
        let Vector2 { x, y } = self.position;
        let r = self.radius;
        x + r < 0.0 || x - r > self.bounds_width || y + r < 0.0 || y - r > self.bounds_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::COMPACT_RADIUS_EXPONENT;

    fn body(x: f64, y: f64, vx: f64, vy: f64, mass: f64) -> Particle {
        Particle::new(Vector2::new(x, y), Vector2::new(vx, vy), Color::WHITE, mass)
    }

    #[test]
    fn radius_follows_mass() {
        let p = body(0.0, 0.0, 0.0, 0.0, 4096.0);
        assert_eq!(p.radius(), 4096f64.powf(1.0 / 12.0));

        let q = p.clone().with_radius_exponent(COMPACT_RADIUS_EXPONENT);
        assert_eq!(q.radius(), 4096f64.powf(1.0 / 15.0));
    }

    #[test]
    fn devour_conserves_momentum_and_mass() {
        let mut big = body(0.0, 0.0, 2.0, -1.0, 30.0);
        let mut small = body(1.0, 0.0, -4.0, 5.0, 10.0);
        let before = big.momentum() + small.momentum();

        assert!(big.devour(&mut small));

        let expected = (Vector2::new(2.0, -1.0) * 30.0 + Vector2::new(-4.0, 5.0) * 10.0) / 40.0;
        assert!((big.velocity - expected).length() < 1e-12);
        assert!((big.momentum() - before).length() < 1e-9);
        assert_eq!(big.mass(), 40.0);
        assert_eq!(big.radius(), mass_to_radius(40.0, DEFAULT_RADIUS_EXPONENT));
        assert!(small.is_dead());
        assert!(!big.is_dead());
    }

    #[test]
    fn devour_blends_colors() {
        let mut big = body(0.0, 0.0, 0.0, 0.0, 3.0);
        big.color = Color::RED;
        let mut small = body(0.0, 0.0, 0.0, 0.0, 1.0);
        small.color = Color::BLUE;

        big.devour(&mut small);
        assert_eq!(big.color, Color::RED.blend(Color::BLUE));
    }

    #[test]
    fn devour_is_one_directional() {
        let mut big = body(0.0, 0.0, 0.0, 0.0, 30.0);
        let mut small = body(0.0, 0.0, 0.0, 0.0, 10.0);

        assert!(!small.devour(&mut big));
        assert_eq!(small.mass(), 10.0);
        assert!(!big.is_dead());

        let mut twin = body(0.0, 0.0, 0.0, 0.0, 30.0);
        assert!(!big.devour(&mut twin), "equal masses never merge");
    }

    #[test]
    fn dead_bodies_neither_eat_nor_get_eaten() {
        let mut a = body(0.0, 0.0, 0.0, 0.0, 100.0);
        let mut b = body(0.0, 0.0, 0.0, 0.0, 10.0);
        let mut c = body(0.0, 0.0, 0.0, 0.0, 50.0);

        assert!(a.devour(&mut b));
        assert!(!c.devour(&mut b), "b is already dead");
        assert_eq!(c.mass(), 50.0);
    }

    #[test]
    fn roche_limit_scales_sum_of_radii() {
        let a = body(0.0, 0.0, 0.0, 0.0, 1.0);
        let b = body(3.0, 4.0, 0.0, 0.0, 1.0);
        assert_eq!(distance_squared(&a, &b), 25.0);
        assert_eq!(roche_limit_squared(&a, &b, 1.0), 4.0);
        assert!((roche_limit_squared(&a, &b, 0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_screen_checks_each_edge() {
        let on = body(480.0, 480.0, 0.0, 0.0, 1.0);
        assert!(!on.out_of_screen());

        // Radius of a unit mass is 1, so the body straddles x = 0 here.
        assert!(!body(-0.5, 10.0, 0.0, 0.0, 1.0).out_of_screen());
        assert!(body(-1.5, 10.0, 0.0, 0.0, 1.0).out_of_screen());
        assert!(body(961.5, 10.0, 0.0, 0.0, 1.0).out_of_screen());
        assert!(body(10.0, -2.0, 0.0, 0.0, 1.0).out_of_screen());
        assert!(body(10.0, 962.0, 0.0, 0.0, 1.0).out_of_screen());

        let small_frame = body(150.0, 50.0, 0.0, 0.0, 1.0).with_bounds(100.0, 100.0);
        assert!(small_frame.out_of_screen());
    }

    #[test]
    fn validate_rejects_bad_bodies() {
        assert_eq!(
            body(0.0, 0.0, 0.0, 0.0, 0.0).validate(),
            Err(SimError::InvalidMass(0.0))
        );
        assert!(body(0.0, 0.0, 0.0, 0.0, -1.0).validate().is_err());
        assert!(matches!(
            body(f64::NAN, 0.0, 0.0, 0.0, 1.0).validate(),
            Err(SimError::NonFinite { field: "position", .. })
        ));
        assert!(matches!(
            body(0.0, 0.0, f64::INFINITY, 0.0, 1.0).validate(),
            Err(SimError::NonFinite { field: "velocity", .. })
        ));
        assert!(body(1.0, 2.0, 3.0, 4.0, 5.0).validate().is_ok());
    }

    #[test]
    fn anchor_is_invisible_and_in_stasis() {
        let a = Particle::anchor(Vector2::new(5.0, 5.0), Color::RED, 1e6);
        assert!(a.stasis);
        assert!(!a.visible);
        assert_eq!(a.velocity, Vector2::ZERO);
        assert_eq!(a.mass(), 1e6);
    }
}
