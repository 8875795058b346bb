//! The four phases of one simulation step.
//!
//! [`crate::system::ParticleSystem::simulate`] runs them in this order:
//! 1. [`effector_phase`]: every effector nudges every particle's velocity.
//! 2. [`devour_phase`]: heavier bodies absorb lighter ones in reach, and
//!    the absorbed bodies are removed.
//! 3. [`gravitation_phase`]: each particle's acceleration is recomputed
//!    from the pull of all others.
//! 4. [`integration_phase`]: semi-implicit Euler update of positions and
//!    velocities.
//!
//! Phases 2 and 3 can be switched off by the system's control flags.

use log::{debug, trace};

use crate::{
    accel_buffer::AccelBuffer,
    effector::Effector,
    particle::{Particle, distance_squared, roche_limit_squared},
    types::{ParticleIndex, Vector2},
};

/// Boxed effector as stored by the system.
pub type DynEffector = Box<dyn Effector + Send + Sync>;

/// Applies every effector, in order, to every particle.
pub fn effector_phase(particles: &mut [Particle], effectors: &[DynEffector]) {
    for effector in effectors {
        for p in particles.iter_mut() {
            effector.apply(p);
        }
    }
}

/// Lets heavy bodies absorb lighter ones within their Roche limit.
///
/// 1. Sorts by descending mass. The sort is stable, so equal masses keep
///    their insertion order.
/// 2. For each living particle `p`, in that order, scans every other
///    living `q` lighter than `p`. If
///    `distance_squared(p, q) < roche_limit_squared(p, q, k)`,
///    `p` devours `q` and `q`'s index is recorded in `eaten`.
/// 3. Once the scan is over, removes the recorded indices from the highest
///    down with [`remove_dead`], so each swap pulls in a particle that
///    has already been checked.
/// 4. Sweeps once more for any dead particle left behind.
///
/// Nothing is removed during the scan, so indices stay valid throughout.
///
/// ### Parameters
/// - `particles` - The live collection; reordered and shrunk in place.
/// - `roche_coefficient` - Proximity scale `k` for the devour test.
/// - `eaten` - Scratch list for the recorded indices; cleared on entry.
///
/// ### Returns
/// The number of particles removed, which equals the number of merges.
pub fn devour_phase(
    particles: &mut Vec<Particle>,
    roche_coefficient: f64,
    eaten: &mut Vec<ParticleIndex>,
) -> usize {
    eaten.clear();
    particles.sort_by(|a, b| b.mass().total_cmp(&a.mass()));

    let n = particles.len();
    for i in 0..n {
        if particles[i].is_dead() {
            continue;
        }
        for j in 0..n {
            if i == j {
                continue;
            }
            let (p, q) = pair_mut(particles, i, j);
            if q.is_dead() || q.mass() >= p.mass() {
                continue;
            }
            if distance_squared(p, q) < roche_limit_squared(p, q, roche_coefficient)
                && p.devour(q)
            {
                eaten.push(j);
            }
        }
    }

    eaten.sort_unstable();
    eaten.dedup();

    let mut removed = 0;
    for &index in eaten.iter().rev() {
        if remove_dead(particles, index).is_some() {
            removed += 1;
        }
    }

    let mut index = particles.len();
    while index > 0 {
        index -= 1;
        if remove_dead(particles, index).is_some() {
            removed += 1;
        }
    }

    if removed > 0 {
        debug!("devoured {removed} particle(s), {} remain", particles.len());
    }
    removed
}

/// Removes the particle at `index` if it exists and is dead.
///
/// The last particle is swapped into the freed slot, so removal is O(1)
/// and does not preserve order. A missing index or a living particle is
/// left alone and yields `None`.
pub fn remove_dead(particles: &mut Vec<Particle>, index: ParticleIndex) -> Option<Particle> {
    match particles.get(index) {
        Some(p) if p.is_dead() => Some(particles.swap_remove(index)),
        _ => None,
    }
}

/// Recomputes every particle's acceleration from Newtonian gravity.
///
/// For each particle not in stasis:
/// `a = Σ G * m_q / max(d², min_d2) * unit(q - p)` over all other `q`.
/// Particles at the exact same position contribute nothing, since the
/// direction between them is undefined. Stasis particles still pull on
/// others but receive zero acceleration.
///
/// The sums are gathered in `acc` while `particles` is only read, then
/// written back.
pub fn gravitation_phase(
    particles: &mut [Particle],
    gravitational_constant: f64,
    min_distance_squared: f64,
    acc: &mut AccelBuffer,
) {
    acc.ensure_len(particles.len());

    for (i, p) in particles.iter().enumerate() {
        if p.stasis {
            continue;
        }
        for (j, q) in particles.iter().enumerate() {
            if i == j {
                continue;
            }
            let delta = q.position - p.position;
            let d2 = delta.length_squared().max(min_distance_squared);
            let magnitude = gravitational_constant * q.mass() / d2;
            acc.add(i, delta.normalize_or_zero() * magnitude);
        }
    }

    for (p, a) in particles.iter_mut().zip(acc.iter()) {
        p.acceleration = a;
    }
}

/// Advances positions and velocities by `dt` with semi-implicit Euler.
///
/// The position moves with the velocity from *before* this step, and only
/// then does the velocity pick up the acceleration. Stasis particles have
/// velocity and acceleration forced to zero and never move.
pub fn integration_phase(particles: &mut [Particle], dt: f64) {
    for p in particles.iter_mut() {
        if p.stasis {
            p.velocity = Vector2::ZERO;
            p.acceleration = Vector2::ZERO;
            continue;
        }
        p.position += p.velocity * dt;
        p.velocity += p.acceleration * dt;
    }
    trace!("integrated {} particle(s) over dt = {dt}", particles.len());
}

/// Two distinct mutable elements of one slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::Color, effector::ChamberBox, effector::Field};

    fn body(x: f64, y: f64, mass: f64) -> Particle {
        Particle::new(Vector2::new(x, y), Vector2::ZERO, Color::WHITE, mass)
    }

    #[test]
    fn effector_phase_applies_in_registration_order() {
        let effectors: Vec<DynEffector> = vec![
            Box::new(Field::uniform(1.0, Vector2::new(3.0, 0.0))),
            Box::new(ChamberBox::new(0.0, 0.0, 10.0, 10.0).with_restitution(0.5)),
        ];
        let mut particles = vec![body(9.5, 5.0, 1.0), body(5.0, 5.0, 1.0)];

        effector_phase(&mut particles, &effectors);

        // Pushed to +3, then reflected at half strength.
        assert_eq!(particles[0].velocity, Vector2::new(-1.5, 0.0));
        assert_eq!(particles[1].velocity, Vector2::new(3.0, 0.0));
    }

    #[test]
    fn devour_phase_merges_overlapping_pair() {
        let mut particles = vec![body(0.0, 0.0, 10.0), body(0.5, 0.0, 100.0)];
        let mut eaten = Vec::new();

        let removed = devour_phase(&mut particles, 1.0, &mut eaten);

        assert_eq!(removed, 1);
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].mass(), 110.0);
        assert!(!particles[0].is_dead());
    }

    #[test]
    fn devour_phase_ignores_distant_bodies() {
        let mut particles = vec![body(0.0, 0.0, 10.0), body(50.0, 0.0, 100.0)];
        let mut eaten = Vec::new();

        assert_eq!(devour_phase(&mut particles, 1.0, &mut eaten), 0);
        assert_eq!(particles.len(), 2);
    }

    #[test]
    fn devour_phase_skips_equal_masses() {
        let mut particles = vec![body(0.0, 0.0, 10.0), body(0.1, 0.0, 10.0)];
        let mut eaten = Vec::new();

        assert_eq!(devour_phase(&mut particles, 1.0, &mut eaten), 0);
        assert_eq!(particles.len(), 2);
    }

    #[test]
    fn devour_phase_sorts_heaviest_first_stably() {
        let mut a = body(0.0, 0.0, 5.0);
        a.color = Color::RED;
        let mut b = body(100.0, 0.0, 5.0);
        b.color = Color::BLUE;
        let mut particles = vec![body(200.0, 0.0, 1.0), a, b, body(300.0, 0.0, 9.0)];
        let mut eaten = Vec::new();

        devour_phase(&mut particles, 1.0, &mut eaten);

        let masses: Vec<f64> = particles.iter().map(|p| p.mass()).collect();
        assert_eq!(masses, vec![9.0, 5.0, 5.0, 1.0]);
        assert_eq!(particles[1].color, Color::RED);
        assert_eq!(particles[2].color, Color::BLUE);
    }

    #[test]
    fn remove_dead_is_noop_for_live_or_missing() {
        let mut particles = vec![body(0.0, 0.0, 1.0), body(1.0, 0.0, 1.0)];
        assert!(remove_dead(&mut particles, 0).is_none());
        assert!(remove_dead(&mut particles, 7).is_none());
        assert_eq!(particles.len(), 2);
    }

    #[test]
    fn remove_dead_swaps_last_into_slot() {
        let mut big = body(0.0, 0.0, 10.0);
        let mut victim = body(0.0, 0.0, 1.0);
        big.devour(&mut victim);

        let mut particles = vec![victim, body(5.0, 0.0, 2.0), body(9.0, 0.0, 3.0)];
        let removed = remove_dead(&mut particles, 0);

        assert!(removed.is_some_and(|p| p.is_dead()));
        assert_eq!(particles.len(), 2);
        assert_eq!(particles[0].mass(), 3.0);
        assert!(remove_dead(&mut particles, 0).is_none(), "second removal is a no-op");
    }

    #[test]
    fn gravitation_points_towards_heavy_body() {
        let g = 2.0;
        let mut particles = vec![body(0.0, 0.0, 10.0), body(10.0, 0.0, 1000.0)];
        let mut acc = AccelBuffer::default();

        gravitation_phase(&mut particles, g, 1e-6, &mut acc);

        let light = particles[0].acceleration;
        assert!((light.length() - g * 1000.0 / 100.0).abs() < 1e-9);
        assert!(light.normalize().abs_diff_eq(Vector2::X, 1e-12));

        let heavy = particles[1].acceleration;
        assert!((heavy.length() - g * 10.0 / 100.0).abs() < 1e-9);
        assert!(heavy.x < 0.0);
    }

    #[test]
    fn gravitation_survives_coincident_bodies() {
        let mut particles = vec![body(3.0, 3.0, 10.0), body(3.0, 3.0, 20.0)];
        let mut acc = AccelBuffer::default();

        gravitation_phase(&mut particles, 6.67, 1e-6, &mut acc);

        for p in &particles {
            assert!(p.acceleration.is_finite());
        }
    }

    #[test]
    fn gravitation_leaves_stasis_unaccelerated_but_attracting() {
        let anchor = Particle::anchor(Vector2::ZERO, Color::RED, 1000.0);
        let mut particles = vec![anchor, body(0.0, 10.0, 1.0)];
        let mut acc = AccelBuffer::default();

        gravitation_phase(&mut particles, 1.0, 1e-6, &mut acc);

        assert_eq!(particles[0].acceleration, Vector2::ZERO);
        assert!(particles[1].acceleration.y < 0.0, "pulled up towards the anchor");
    }

    #[test]
    fn integration_moves_with_old_velocity_first() {
        let mut p = body(0.0, 0.0, 1.0);
        p.velocity = Vector2::new(1.0, 0.0);
        p.acceleration = Vector2::new(0.0, 2.0);
        let mut particles = vec![p];

        integration_phase(&mut particles, 0.5);

        assert_eq!(particles[0].position, Vector2::new(0.5, 0.0));
        assert_eq!(particles[0].velocity, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn integration_pins_stasis_bodies() {
        let mut anchor = Particle::anchor(Vector2::new(4.0, 4.0), Color::RED, 10.0);
        anchor.velocity = Vector2::new(9.0, 9.0);
        anchor.acceleration = Vector2::new(1.0, 1.0);
        let mut particles = vec![anchor];

        integration_phase(&mut particles, 1.0);

        assert_eq!(particles[0].position, Vector2::new(4.0, 4.0));
        assert_eq!(particles[0].velocity, Vector2::ZERO);
        assert_eq!(particles[0].acceleration, Vector2::ZERO);
    }
}
