use thiserror::Error;

/// Errors raised when a particle or a configuration fails validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Particle mass must be strictly positive and finite.
    #[error("particle mass must be positive and finite, got {0}")]
    InvalidMass(f64),

    /// A kinematic vector had a NaN or infinite component.
    #[error("particle {field} must be finite, got ({x}, {y})")]
    NonFinite {
        field: &'static str,
        x: f64,
        y: f64,
    },

    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
