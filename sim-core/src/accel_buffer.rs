use crate::types::{ParticleIndex, Vector2};

/// Scratch buffer that accumulates one acceleration per particle.
///
/// The gravity phase reads every particle while summing pairwise pulls,
/// so the sums land here first and are written back in a second pass.
/// The buffer lives inside the system and is reused between steps.
///
/// `acc[i]` corresponds to the particle at index `i`.
#[derive(Debug, Default)]
pub struct AccelBuffer {
    acc: Vec<Vector2>,
}

impl AccelBuffer {
    /// Creates a buffer of `len` zeroed entries.
    pub fn with_len(len: usize) -> Self {
        Self {
            acc: vec![Vector2::ZERO; len],
        }
    }

    /// Resizes to exactly `len` entries and zeroes all of them.
    ///
    /// Entries are cleared even when the length was already right.
    pub fn ensure_len(&mut self, len: usize) {
        if self.acc.len() != len {
            self.acc.resize(len, Vector2::ZERO);
        }
        self.clear();
    }

    /// Zeroes every entry, keeping the length.
    pub fn clear(&mut self) {
        self.acc.fill(Vector2::ZERO);
    }

    /// Adds one contribution to particle `id`.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: ParticleIndex, a: Vector2) {
        self.acc[id] += a;
    }

    #[inline]
    pub fn get(&self, id: ParticleIndex) -> Vector2 {
        self.acc[id]
    }

    pub fn len(&self) -> usize {
        self.acc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acc.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.acc.iter().copied()
    }
}
