use glam::DVec2;

/// Two-dimensional `f64` vector used for positions, velocities and
/// accelerations.
///
/// Coordinates are pixels in a y-down frame: `x` grows to the right and
/// `y` grows towards the bottom of the drawing surface.
pub type Vector2 = DVec2;

/// Index of a particle in [`crate::system::ParticleSystem::particles`].
///
/// Indices are only meaningful until the next removal, because removal
/// swaps the last particle into the freed slot.
pub type ParticleIndex = usize;
