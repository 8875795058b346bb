//! Boundary between the simulation and whatever draws it.
//!
//! The system never rasterizes anything itself. It walks its particles and
//! hands plain draw requests to a [`RenderSink`]. Coordinates are pixels
//! in a y-down frame matching the configured canvas width and height.

use crate::color::Color;
use crate::types::Vector2;

/// Filled circle for one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleDraw {
    pub center: Vector2,
    pub radius: f64,
    pub fill: Color,
    pub alpha: f64,
}

/// Filled triangle joining three particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleDraw {
    pub vertices: [Vector2; 3],
    pub fill: Color,
    pub alpha: f64,
}

/// A drawing surface that accepts draw requests.
pub trait RenderSink {
    fn fill_circle(&mut self, circle: &CircleDraw);
    fn fill_triangle(&mut self, triangle: &TriangleDraw);
}

/// How [`crate::system::ParticleSystem::render`] presents the particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// One filled circle per visible, on-screen particle.
    #[default]
    PointCloud,
    /// Translucent triangles between nearest unused neighbours.
    Triangle,
}

impl RenderStyle {
    /// The style that follows this one when cycling.
    pub fn next(self) -> Self {
        match self {
            RenderStyle::PointCloud => RenderStyle::Triangle,
            RenderStyle::Triangle => RenderStyle::PointCloud,
        }
    }
}

/// Sink that stores every request, for tests and headless hosts.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub circles: Vec<CircleDraw>,
    pub triangles: Vec<TriangleDraw>,
}

impl RenderSink for RecordingSink {
    fn fill_circle(&mut self, circle: &CircleDraw) {
        self.circles.push(*circle);
    }

    fn fill_triangle(&mut self, triangle: &TriangleDraw) {
        self.triangles.push(*triangle);
    }
}
