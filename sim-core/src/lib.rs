//! Core 2-D gravitational n-body simulation library.
//!
//! Main components:
//! - [`particle`]: bodies, their mass/radius law and the devour merge.
//! - [`system`]: the particle system and its per-step pipeline.
//! - [`phases`]: the individual simulation phases.
//! - [`effector`]: per-particle velocity modifiers (walls, fields).
//! - [`scenario`]: the orbit-disk initial condition.
//! - [`render`]: backend-agnostic draw requests and render styles.
//! - [`config`]: simulation constants and configuration.
//! - [`sampler`], [`color`], [`vector`]: small numeric helpers.
//! - [`frame_timer`]: rolling frame-interval statistics.
//! - [`accel_buffer`]: scratch storage for accumulated accelerations.
//! - [`types`]: shared type aliases.

pub mod accel_buffer;
pub mod color;
pub mod config;
pub mod effector;
pub mod error;
pub mod frame_timer;
pub mod particle;
pub mod phases;
pub mod render;
pub mod sampler;
pub mod scenario;
pub mod system;
pub mod types;
pub mod vector;

pub use color::Color;
pub use config::SimConfig;
pub use effector::{ChamberBox, Effector, Field};
pub use error::SimError;
pub use particle::Particle;
pub use render::{RenderSink, RenderStyle};
pub use sampler::RandomSampler;
pub use system::ParticleSystem;
pub use types::Vector2;
